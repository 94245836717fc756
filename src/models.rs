//! Domain models for the weather sensor service.
//!
//! `Sensor` and `Metric` are the two persisted entities. `MetricType` and
//! `Statistic` are closed sets; anything outside them is rejected while the
//! request body is being decoded.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ---

/// Kind of reading a metric carries. The unit is implied by the kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricType {
    Temperature,
    Humidity,
    WindSpeed,
    Pressure,
    Rainfall,
}

impl MetricType {
    /// Every metric type, in declaration order.
    pub const ALL: [MetricType; 5] = [
        MetricType::Temperature,
        MetricType::Humidity,
        MetricType::WindSpeed,
        MetricType::Pressure,
        MetricType::Rainfall,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MetricType::Temperature => "temperature",
            MetricType::Humidity => "humidity",
            MetricType::WindSpeed => "wind_speed",
            MetricType::Pressure => "pressure",
            MetricType::Rainfall => "rainfall",
        }
    }
}

impl fmt::Display for MetricType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a string is not one of the known metric types.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown metric type '{0}', expected one of temperature, humidity, wind_speed, pressure, rainfall")]
pub struct UnknownMetricType(pub String);

impl FromStr for MetricType {
    type Err = UnknownMetricType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MetricType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| UnknownMetricType(s.to_string()))
    }
}

/// Aggregate to compute over a set of readings.
///
/// The statistic also decides the result shape: `Min`/`Max` name the single
/// sensor that produced the extreme, `Sum`/`Avg` name every contributing sensor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Statistic {
    Min,
    Max,
    Sum,
    Avg,
}

impl Statistic {
    pub fn as_str(&self) -> &'static str {
        match self {
            Statistic::Min => "min",
            Statistic::Max => "max",
            Statistic::Sum => "sum",
            Statistic::Avg => "avg",
        }
    }

    /// True for the statistics whose result names exactly one sensor.
    pub fn is_extreme(&self) -> bool {
        matches!(self, Statistic::Min | Statistic::Max)
    }
}

impl fmt::Display for Statistic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A named physical data source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Sensor {
    // ---
    pub id: i64,
    pub name: String,
    pub location: String,
    pub created_at: DateTime<Utc>,
}

/// One timestamped reading from a sensor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metric {
    // ---
    pub id: i64,
    pub sensor_id: i64,
    pub metric_type: MetricType,
    pub value: f64,
    pub timestamp: DateTime<Utc>,
}

/// Sensor fields supplied by the caller; id and creation time are assigned by the store.
#[derive(Debug, Clone, Deserialize)]
pub struct NewSensor {
    // ---
    pub name: String,
    pub location: String,
}

/// Metric fields supplied by the caller.
#[derive(Debug, Clone, Deserialize)]
pub struct NewMetric {
    // ---
    pub sensor_id: i64,
    pub metric_type: MetricType,
    pub value: f64,
    /// Defaults to the write time when absent.
    #[serde(default)]
    pub timestamp: Option<DateTime<Utc>>,
}
