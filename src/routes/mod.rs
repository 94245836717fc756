use axum::Router;

use crate::store::SharedStore;

mod extract;
mod health;
mod metrics;
mod queries;
mod sample_data;
mod sensors;

// ---

pub fn router(store: SharedStore) -> Router {
    // ---
    Router::new()
        .merge(sensors::router())
        .merge(metrics::router())
        .merge(queries::router())
        .merge(sample_data::router())
        .merge(health::router())
        .with_state(store)
}
