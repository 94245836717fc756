//! Weather sensor ingestion and aggregate query service.
//!
//! Module gateway following the Explicit Module Boundary Pattern (EMBP):
//! sibling modules reach each other through the re-exports below rather than
//! through each other's internals, and `main.rs` only needs `Config`,
//! `schema`, `PgStore`, and `routes::router`.

pub mod config;
pub mod error;
pub mod models;
pub mod query;
pub mod routes;
pub mod sample_data;
pub mod schema;
pub mod store;
pub mod validate;

pub use config::Config;
pub use error::{ApiError, ApiResult, FieldError};
pub use models::{Metric, MetricType, NewMetric, NewSensor, Sensor, Statistic};
pub use store::{EntityStore, MemoryStore, PgStore, SharedStore, StoreError};
