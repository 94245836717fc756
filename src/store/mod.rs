//! Entity store interface for sensors and metrics.
//!
//! The query subsystem only talks to storage through [`EntityStore`], so the
//! PostgreSQL backend used in production and the in-process backend used by
//! the test suites are interchangeable behind an `Arc<dyn EntityStore>`.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::models::{Metric, MetricType, NewMetric, NewSensor, Sensor};

mod memory;
mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

// ---

/// Failures reported by a store backend.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("store unavailable: {0}")]
    Unavailable(String),

    #[error("corrupt row: {0}")]
    Corrupt(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Scope of a metric scan.
///
/// `start` is inclusive. `end` is inclusive when present; an absent `end`
/// leaves the window open towards the future.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricFilter {
    /// `None` scans every sensor.
    pub sensor_ids: Option<Vec<i64>>,
    pub metric_type: MetricType,
    pub start: DateTime<Utc>,
    pub end: Option<DateTime<Utc>>,
}

impl MetricFilter {
    pub fn matches(&self, metric: &Metric) -> bool {
        // ---
        let in_scope = self
            .sensor_ids
            .as_ref()
            .map_or(true, |ids| ids.contains(&metric.sensor_id));

        in_scope
            && metric.metric_type == self.metric_type
            && metric.timestamp >= self.start
            && self.end.map_or(true, |end| metric.timestamp <= end)
    }
}

/// Create/read operations over the two persisted entities.
#[async_trait]
pub trait EntityStore: Send + Sync {
    /// Cheap round trip proving the backend is reachable.
    async fn ping(&self) -> StoreResult<()>;

    async fn insert_sensor(&self, sensor: NewSensor) -> StoreResult<Sensor>;

    /// Sensors ordered by id.
    async fn list_sensors(&self, skip: i64, limit: i64) -> StoreResult<Vec<Sensor>>;

    async fn get_sensor(&self, id: i64) -> StoreResult<Option<Sensor>>;

    /// Persist a metric. The caller has already checked that the sensor exists.
    async fn insert_metric(&self, metric: NewMetric) -> StoreResult<Metric>;

    /// Persist a batch of metrics atomically, returning how many were written.
    async fn insert_metrics(&self, metrics: Vec<NewMetric>) -> StoreResult<usize>;

    /// Metrics ordered by id, optionally restricted to one sensor.
    async fn list_metrics(
        &self,
        sensor_id: Option<i64>,
        skip: i64,
        limit: i64,
    ) -> StoreResult<Vec<Metric>>;

    /// Metrics matching `filter`, ordered by (timestamp, id).
    async fn find_metrics(&self, filter: &MetricFilter) -> StoreResult<Vec<Metric>>;
}

/// Shared handle used as router state.
pub type SharedStore = Arc<dyn EntityStore>;

#[cfg(test)]
mod tests {
    // ---
    use super::*;
    use chrono::{Duration, TimeZone};

    fn metric(sensor_id: i64, metric_type: MetricType, timestamp: DateTime<Utc>) -> Metric {
        Metric {
            id: 1,
            sensor_id,
            metric_type,
            value: 1.0,
            timestamp,
        }
    }

    #[test]
    fn test_filter_bounds_are_inclusive() {
        // ---
        let start = Utc.with_ymd_and_hms(2025, 3, 1, 0, 0, 0).unwrap();
        let end = start + Duration::days(2);
        let filter = MetricFilter {
            sensor_ids: None,
            metric_type: MetricType::Temperature,
            start,
            end: Some(end),
        };

        assert!(filter.matches(&metric(1, MetricType::Temperature, start)));
        assert!(filter.matches(&metric(1, MetricType::Temperature, end)));
        assert!(!filter.matches(&metric(1, MetricType::Temperature, end + Duration::seconds(1))));
        assert!(!filter.matches(&metric(1, MetricType::Temperature, start - Duration::seconds(1))));
        assert!(!filter.matches(&metric(1, MetricType::Humidity, start)));
    }

    #[test]
    fn test_filter_open_end_and_sensor_scope() {
        // ---
        let start = Utc.with_ymd_and_hms(2025, 3, 1, 0, 0, 0).unwrap();
        let filter = MetricFilter {
            sensor_ids: Some(vec![2, 3]),
            metric_type: MetricType::Pressure,
            start,
            end: None,
        };

        assert!(filter.matches(&metric(2, MetricType::Pressure, start + Duration::days(400))));
        assert!(!filter.matches(&metric(1, MetricType::Pressure, start)));
    }
}
