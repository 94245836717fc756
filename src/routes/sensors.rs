// src/routes/sensors.rs
//! Sensor registration and lookup: `POST /sensors/`, `GET /sensors/`,
//! `GET /sensors/{sensor_id}`.

use axum::{
    extract::{rejection::PathRejection, rejection::QueryRejection, Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use tracing::info;

use super::extract::{path_rejection, query_rejection, ValidatedJson};
use crate::error::{ApiError, ApiResult, SENSOR_NOT_FOUND};
use crate::models::{NewSensor, Sensor};
use crate::store::SharedStore;

// ---

pub fn router() -> Router<SharedStore> {
    // ---
    Router::new()
        .route("/sensors/", post(create_sensor).get(list_sensors))
        .route("/sensors/{sensor_id}", get(get_sensor))
}

/// `skip`/`limit` paging shared by the list endpoints.
#[derive(Debug, Deserialize)]
pub struct Paging {
    #[serde(default)]
    pub skip: i64,
    #[serde(default = "default_limit")]
    pub limit: i64,
}

pub(super) fn default_limit() -> i64 {
    100
}

impl Paging {
    pub fn check(&self) -> ApiResult<()> {
        // ---
        if self.skip < 0 || self.limit < 0 {
            return Err(ApiError::validation(
                &["query"],
                "skip and limit must not be negative",
                "value_error",
            ));
        }
        Ok(())
    }
}

async fn create_sensor(
    State(store): State<SharedStore>,
    ValidatedJson(sensor): ValidatedJson<NewSensor>,
) -> ApiResult<(StatusCode, Json<Sensor>)> {
    // ---
    let created = store.insert_sensor(sensor).await?;
    info!("Created sensor {} ({})", created.id, created.name);
    Ok((StatusCode::CREATED, Json(created)))
}

async fn list_sensors(
    State(store): State<SharedStore>,
    paging: Result<Query<Paging>, QueryRejection>,
) -> ApiResult<Json<Vec<Sensor>>> {
    // ---
    let Query(paging) = paging.map_err(query_rejection)?;
    paging.check()?;
    Ok(Json(store.list_sensors(paging.skip, paging.limit).await?))
}

async fn get_sensor(
    State(store): State<SharedStore>,
    sensor_id: Result<Path<i64>, PathRejection>,
) -> ApiResult<Json<Sensor>> {
    // ---
    let Path(sensor_id) = sensor_id.map_err(|e| path_rejection("sensor_id", e))?;
    store
        .get_sensor(sensor_id)
        .await?
        .map(Json)
        .ok_or(ApiError::NotFound(SENSOR_NOT_FOUND))
}
