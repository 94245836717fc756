// src/routes/sample_data.rs
//! `POST /test/create-sample-data/`: seed a demo sensor with a week of readings.

use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
use chrono::{Duration, Utc};
use serde::Serialize;
use tracing::info;

use crate::error::ApiResult;
use crate::models::NewSensor;
use crate::query::{DateWindow, WEEKLY_LOOKBACK_DAYS};
use crate::sample_data::{
    generate_readings, SAMPLE_INTERVAL_HOURS, SAMPLE_SENSOR_LOCATION, SAMPLE_SENSOR_NAME,
};
use crate::store::SharedStore;

// ---

pub fn router() -> Router<SharedStore> {
    // ---
    Router::new().route("/test/create-sample-data/", post(create_sample_data))
}

#[derive(Debug, Serialize)]
struct SampleDataSummary {
    message: &'static str,
    sensor_id: i64,
    metrics_count: usize,
    date_range: DateWindow,
}

async fn create_sample_data(
    State(store): State<SharedStore>,
) -> ApiResult<(StatusCode, Json<SampleDataSummary>)> {
    // ---
    let sensor = store
        .insert_sensor(NewSensor {
            name: SAMPLE_SENSOR_NAME.to_string(),
            location: SAMPLE_SENSOR_LOCATION.to_string(),
        })
        .await?;

    let window = DateWindow::lookback(Utc::now(), WEEKLY_LOOKBACK_DAYS);
    let readings = generate_readings(sensor.id, window, Duration::hours(SAMPLE_INTERVAL_HOURS));
    let metrics_count = store.insert_metrics(readings).await?;

    info!("Created sample sensor {} with {} readings", sensor.id, metrics_count);
    Ok((
        StatusCode::CREATED,
        Json(SampleDataSummary {
            message: "Sample data created successfully",
            sensor_id: sensor.id,
            metrics_count,
            date_range: window,
        }),
    ))
}
