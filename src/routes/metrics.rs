// src/routes/metrics.rs
//! Reading ingestion and listing: `POST /metrics/`, `GET /metrics/`.

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    http::StatusCode,
    routing::post,
    Json, Router,
};
use serde::Deserialize;
use tracing::{debug, warn};

use super::extract::{query_rejection, ValidatedJson};
use super::sensors::{default_limit, Paging};
use crate::error::{ApiError, ApiResult, SENSOR_NOT_FOUND};
use crate::models::{Metric, NewMetric};
use crate::store::SharedStore;

// ---

pub fn router() -> Router<SharedStore> {
    // ---
    Router::new().route("/metrics/", post(create_metric).get(list_metrics))
}

// Fields are spelled out rather than flattening `Paging`: flattened numbers
// arrive as strings from the query-string decoder and fail to parse.
#[derive(Debug, Deserialize)]
struct MetricsQuery {
    #[serde(default)]
    skip: i64,
    #[serde(default = "default_limit")]
    limit: i64,
    sensor_id: Option<i64>,
}

async fn create_metric(
    State(store): State<SharedStore>,
    ValidatedJson(metric): ValidatedJson<NewMetric>,
) -> ApiResult<(StatusCode, Json<Metric>)> {
    // ---
    if store.get_sensor(metric.sensor_id).await?.is_none() {
        warn!("Rejected {} reading for unknown sensor {}", metric.metric_type, metric.sensor_id);
        return Err(ApiError::NotFound(SENSOR_NOT_FOUND));
    }

    let stored = store.insert_metric(metric).await?;
    debug!(
        "Stored {} = {} for sensor {} at {}",
        stored.metric_type, stored.value, stored.sensor_id, stored.timestamp
    );
    Ok((StatusCode::CREATED, Json(stored)))
}

async fn list_metrics(
    State(store): State<SharedStore>,
    params: Result<Query<MetricsQuery>, QueryRejection>,
) -> ApiResult<Json<Vec<Metric>>> {
    // ---
    let Query(params) = params.map_err(query_rejection)?;
    let paging = Paging {
        skip: params.skip,
        limit: params.limit,
    };
    paging.check()?;

    let metrics = store
        .list_metrics(params.sensor_id, paging.skip, paging.limit)
        .await?;
    Ok(Json(metrics))
}
