// src/routes/health.rs
//! Liveness and welcome endpoints: `GET /health` and `GET /`.
//!
//! Neither handler touches the store, so both answer even while the
//! database is unreachable.

use axum::{routing::get, Json, Router};
use serde::Serialize;

/// JSON response body for the `/health` endpoint.
#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
}

/// JSON response body for the `/` endpoint.
#[derive(Serialize)]
struct WelcomeResponse {
    message: &'static str,
}

/// Handle `GET /health`.
async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

/// Handle `GET /`.
async fn root() -> Json<WelcomeResponse> {
    Json(WelcomeResponse {
        message: "Welcome to the Weather Sensor API",
    })
}

/// Subrouter for `/` and `/health`, generic over the gateway's state.
pub fn router<S>() -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
}
