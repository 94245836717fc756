// src/routes/queries.rs
//! Aggregate query endpoints: `POST /query/` and
//! `GET /sensors/{sensor_id}/weekly-averages/`.

use axum::{
    extract::{rejection::PathRejection, rejection::QueryRejection, Path, Query, State},
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;
use tracing::{info, info_span, Instrument};
use uuid::Uuid;

use super::extract::{path_rejection, query_rejection, ValidatedJson};
use crate::error::{ApiError, ApiResult, FieldError};
use crate::models::MetricType;
use crate::query::{self, QueryRequest, QueryResult, WeeklyAverages, DEFAULT_WEEKLY_METRICS};
use crate::store::SharedStore;

// ---

pub fn router() -> Router<SharedStore> {
    // ---
    Router::new()
        .route("/query/", post(query_metrics))
        .route("/sensors/{sensor_id}/weekly-averages/", get(weekly_averages))
}

async fn query_metrics(
    State(store): State<SharedStore>,
    ValidatedJson(request): ValidatedJson<QueryRequest>,
) -> ApiResult<Json<Vec<QueryResult>>> {
    // ---
    let span = info_span!("query", request_id = %Uuid::new_v4());
    let results = query::run_query(store.as_ref(), &request, Utc::now())
        .instrument(span.clone())
        .await?;

    span.in_scope(|| info!("POST /query/ returning {} results", results.len()));
    Ok(Json(results))
}

/// Collect repeated `metrics=` parameters, defaulting when none are given.
fn requested_metrics(params: &[(String, String)]) -> ApiResult<Vec<MetricType>> {
    // ---
    let mut metric_types = Vec::new();
    let mut errors = Vec::new();

    for (key, value) in params.iter().filter(|(key, _)| key == "metrics") {
        match value.parse::<MetricType>() {
            Ok(metric_type) => metric_types.push(metric_type),
            Err(err) => errors.push(FieldError::new(&["query", key.as_str()], err.to_string(), "enum")),
        }
    }

    if !errors.is_empty() {
        return Err(ApiError::Validation(errors));
    }
    if metric_types.is_empty() {
        metric_types.extend(DEFAULT_WEEKLY_METRICS);
    }
    Ok(metric_types)
}

async fn weekly_averages(
    State(store): State<SharedStore>,
    sensor_id: Result<Path<i64>, PathRejection>,
    params: Result<Query<Vec<(String, String)>>, QueryRejection>,
) -> ApiResult<Json<WeeklyAverages>> {
    // ---
    let Path(sensor_id) = sensor_id.map_err(|e| path_rejection("sensor_id", e))?;
    let Query(params) = params.map_err(query_rejection)?;
    let metric_types = requested_metrics(&params)?;

    let span = info_span!("weekly_averages", request_id = %Uuid::new_v4());
    let averages = query::weekly_averages(store.as_ref(), sensor_id, &metric_types, Utc::now())
        .instrument(span)
        .await?;
    Ok(Json(averages))
}

#[cfg(test)]
mod tests {
    // ---
    use super::*;

    fn pairs(raw: &[(&str, &str)]) -> Vec<(String, String)> {
        raw.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn test_default_metrics_when_absent() {
        // ---
        let metric_types = requested_metrics(&pairs(&[("unrelated", "1")])).unwrap();
        assert_eq!(metric_types, DEFAULT_WEEKLY_METRICS.to_vec());
    }

    #[test]
    fn test_repeated_metrics_keep_order() {
        // ---
        let metric_types =
            requested_metrics(&pairs(&[("metrics", "rainfall"), ("metrics", "pressure")])).unwrap();
        assert_eq!(metric_types, vec![MetricType::Rainfall, MetricType::Pressure]);
    }

    #[test]
    fn test_unknown_metric_rejected() {
        // ---
        let err = requested_metrics(&pairs(&[("metrics", "visibility")])).unwrap_err();
        assert!(matches!(err, ApiError::Validation(ref e) if e[0].loc == vec!["query", "metrics"]));
    }
}
