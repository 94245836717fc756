//! Synthetic readings for exercising the query endpoints.

use chrono::{DateTime, Duration, Utc};
use rand::Rng;

use crate::models::{MetricType, NewMetric};
use crate::query::DateWindow;

// ---

pub const SAMPLE_SENSOR_NAME: &str = "Test Weather Station";
pub const SAMPLE_SENSOR_LOCATION: &str = "Test Location";
pub const SAMPLE_INTERVAL_HOURS: i64 = 3;

/// Plausible value range for each metric type.
pub fn value_range(metric_type: MetricType) -> (f64, f64) {
    match metric_type {
        MetricType::Temperature => (10.0, 35.0), // °C
        MetricType::Humidity => (30.0, 90.0),    // %
        MetricType::WindSpeed => (0.0, 25.0),    // km/h
        MetricType::Pressure => (990.0, 1020.0), // hPa
        MetricType::Rainfall => (0.0, 15.0),     // mm
    }
}

/// Timestamps from `window.start` to `window.end` inclusive, `interval` apart.
pub fn timestamps(window: DateWindow, interval: Duration) -> Vec<DateTime<Utc>> {
    // ---
    let mut out = Vec::new();
    if interval <= Duration::zero() {
        return out;
    }

    let mut current = window.start;
    while current <= window.end {
        out.push(current);
        current += interval;
    }
    out
}

/// One reading of every metric type at each timestamp in `window`.
pub fn generate_readings(sensor_id: i64, window: DateWindow, interval: Duration) -> Vec<NewMetric> {
    // ---
    let mut rng = rand::thread_rng();
    let mut readings = Vec::new();

    for timestamp in timestamps(window, interval) {
        for metric_type in MetricType::ALL {
            let (lo, hi) = value_range(metric_type);
            readings.push(NewMetric {
                sensor_id,
                metric_type,
                value: rng.gen_range(lo..=hi),
                timestamp: Some(timestamp),
            });
        }
    }
    readings
}
