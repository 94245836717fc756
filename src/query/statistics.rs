//! Statistic engine: reduces an already-filtered set of metrics to one value.

use std::collections::BTreeSet;

use crate::models::{Metric, Statistic};

// ---

/// Outcome of aggregating a non-empty metric collection.
#[derive(Debug, Clone, PartialEq)]
pub enum Aggregate {
    /// `min`/`max`: the extreme value and the sensor owning that reading.
    Extreme { value: f64, sensor_id: i64 },
    /// `sum`/`avg`: the combined value and every sensor that contributed.
    Combined { value: f64, sensor_ids: Vec<i64> },
}

impl Aggregate {
    pub fn value(&self) -> f64 {
        match self {
            Aggregate::Extreme { value, .. } | Aggregate::Combined { value, .. } => *value,
        }
    }
}

/// Distinct sensor ids present in `metrics`, ascending.
pub fn contributing_sensors(metrics: &[Metric]) -> Vec<i64> {
    metrics
        .iter()
        .map(|m| m.sensor_id)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Aggregate that cannot be reported as a finite number.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum StatisticError {
    #[error("{statistic} of {count} readings overflows a 64-bit float")]
    Overflow { statistic: Statistic, count: usize },
}

/// Aggregate `metrics` with `statistic`.
///
/// Returns `Ok(None)` when `metrics` is empty so that "no rows" stays
/// distinct from "rows that sum to zero". Ties on min/max keep the first
/// reading in iteration order. A sum beyond the `f64` range is an error,
/// never an infinite value.
pub fn compute(
    metrics: &[Metric],
    statistic: Statistic,
) -> Result<Option<Aggregate>, StatisticError> {
    // ---
    let Some(first) = metrics.first() else {
        return Ok(None);
    };

    let aggregate = match statistic {
        Statistic::Min => {
            let best = metrics
                .iter()
                .fold(first, |best, m| if m.value < best.value { m } else { best });
            Aggregate::Extreme {
                value: best.value,
                sensor_id: best.sensor_id,
            }
        }
        Statistic::Max => {
            let best = metrics
                .iter()
                .fold(first, |best, m| if m.value > best.value { m } else { best });
            Aggregate::Extreme {
                value: best.value,
                sensor_id: best.sensor_id,
            }
        }
        Statistic::Sum => {
            let value = total(metrics);
            if !value.is_finite() {
                return Err(StatisticError::Overflow {
                    statistic,
                    count: metrics.len(),
                });
            }
            Aggregate::Combined {
                value,
                sensor_ids: contributing_sensors(metrics),
            }
        }
        Statistic::Avg => Aggregate::Combined {
            value: mean(metrics),
            sensor_ids: contributing_sensors(metrics),
        },
    };

    Ok(Some(aggregate))
}

fn total(metrics: &[Metric]) -> f64 {
    metrics.iter().map(|m| m.value).sum()
}

fn mean(metrics: &[Metric]) -> f64 {
    // ---
    let (lo, hi) = metrics.iter().fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), m| {
        (lo.min(m.value), hi.max(m.value))
    });

    // Running mean: each step adds (x - mean) / k as two scaled terms, so no
    // intermediate exceeds the magnitude of the largest reading.
    let mean = metrics.iter().enumerate().fold(0.0, |mean, (i, m)| {
        let k = (i + 1) as f64;
        mean + (m.value / k - mean / k)
    });
    if lo <= hi {
        // Rounding in the division can land one ulp outside the extremes.
        mean.clamp(lo, hi)
    } else {
        mean
    }
}
