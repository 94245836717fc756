//! Result shaper: turns an aggregate into the wire shape its statistic dictates.
//!
//! `min`/`max` produce [`SingleSensorResult`] (a `sensor_id` field), `sum`/`avg`
//! produce [`MultiSensorResult`] (a `sensor_ids` field). [`shape`] is the only
//! constructor used by the query paths, so no result ever carries both.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::date_range::DateWindow;
use super::statistics::Aggregate;
use crate::models::{MetricType, Statistic};

// ---

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SingleSensorResult {
    pub metric_type: MetricType,
    pub statistic: Statistic,
    pub value: f64,
    pub sensor_id: i64,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MultiSensorResult {
    pub metric_type: MetricType,
    pub statistic: Statistic,
    pub value: f64,
    /// May be empty; always serialized.
    pub sensor_ids: Vec<i64>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
}

/// One entry of a `POST /query/` response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum QueryResult {
    SingleSensor(SingleSensorResult),
    MultiSensor(MultiSensorResult),
}

impl QueryResult {
    pub fn metric_type(&self) -> MetricType {
        match self {
            QueryResult::SingleSensor(r) => r.metric_type,
            QueryResult::MultiSensor(r) => r.metric_type,
        }
    }

    pub fn value(&self) -> f64 {
        match self {
            QueryResult::SingleSensor(r) => r.value,
            QueryResult::MultiSensor(r) => r.value,
        }
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ShapeError {
    /// The statistic cannot be expressed with the contributor information given.
    #[error("statistic '{statistic}' cannot be shaped from {provided}")]
    UnsupportedStatistic {
        statistic: Statistic,
        provided: &'static str,
    },
}

/// Build the result for `statistic` over `metric_type`, echoing `window`.
pub fn shape(
    statistic: Statistic,
    metric_type: MetricType,
    aggregate: Aggregate,
    window: Option<DateWindow>,
) -> Result<QueryResult, ShapeError> {
    // ---
    let start_date = window.map(|w| w.start);
    let end_date = window.map(|w| w.end);

    match (statistic, aggregate) {
        (Statistic::Min | Statistic::Max, Aggregate::Extreme { value, sensor_id }) => {
            Ok(QueryResult::SingleSensor(SingleSensorResult {
                metric_type,
                statistic,
                value,
                sensor_id,
                start_date,
                end_date,
            }))
        }
        (Statistic::Sum | Statistic::Avg, Aggregate::Combined { value, sensor_ids }) => {
            Ok(QueryResult::MultiSensor(MultiSensorResult {
                metric_type,
                statistic,
                value,
                sensor_ids,
                start_date,
                end_date,
            }))
        }
        (statistic, Aggregate::Extreme { .. }) => Err(ShapeError::UnsupportedStatistic {
            statistic,
            provided: "a single sensor",
        }),
        (statistic, Aggregate::Combined { .. }) => Err(ShapeError::UnsupportedStatistic {
            statistic,
            provided: "a sensor set",
        }),
    }
}
