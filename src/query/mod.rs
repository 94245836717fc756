//! Aggregate query subsystem.
//!
//! Request validation → per-metric scan → statistic → result shape. Routes
//! only see what this gateway re-exports.

mod date_range;
mod orchestrator;
mod request;
mod shaper;
mod statistics;

pub use date_range::{
    validate_range, DateWindow, RangeError, DEFAULT_LOOKBACK_DAYS, MAX_SPAN_DAYS, MIN_SPAN_DAYS,
    WEEKLY_LOOKBACK_DAYS,
};
pub use orchestrator::{
    run_query, weekly_averages, WeeklyAverageRow, WeeklyAverages, DEFAULT_WEEKLY_METRICS,
    METRIC_ERROR_MESSAGE, NO_METRIC_DATA_MESSAGE, NO_WEEKLY_DATA_MESSAGE,
};
pub use request::{QueryRequest, ValidatedQuery};
pub use shaper::{shape, MultiSensorResult, QueryResult, ShapeError, SingleSensorResult};
pub use statistics::{compute, contributing_sensors, Aggregate, StatisticError};
