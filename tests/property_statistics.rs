//! Property tests for the statistic engine and result shaping.
//!
//! - `avg` always lies within the observed `[min, max]`
//! - `sum` equals the sequential total of the readings
//! - `min`/`max` report a reading that really is the extreme, with its sensor
//! - Empty input yields no aggregate
//! - Sums never come back infinite; means never overflow
//! - Extreme statistics carry `sensor_id`, combined ones carry `sensor_ids`, never both

use chrono::{TimeZone, Utc};
use proptest::prelude::*;
use serde_json::Value;

use weather_sensor_api::query::{compute, contributing_sensors, shape, Aggregate};
use weather_sensor_api::{Metric, MetricType, Statistic};

/// Readings as (sensor_id, value) pairs turned into stored metrics.
fn readings() -> impl Strategy<Value = Vec<Metric>> {
    prop::collection::vec((1i64..6, -1_000.0f64..1_000.0), 1..60).prop_map(|pairs| {
        let base = Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap();
        pairs
            .into_iter()
            .enumerate()
            .map(|(i, (sensor_id, value))| Metric {
                id: i as i64 + 1,
                sensor_id,
                metric_type: MetricType::Temperature,
                value,
                timestamp: base + chrono::Duration::minutes(i as i64),
            })
            .collect()
    })
}

fn any_statistic() -> impl Strategy<Value = Statistic> {
    prop_oneof![
        Just(Statistic::Min),
        Just(Statistic::Max),
        Just(Statistic::Sum),
        Just(Statistic::Avg),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Property: the mean never falls outside the observed extremes
    #[test]
    fn prop_avg_within_min_max(metrics in readings()) {
        let lo = compute(&metrics, Statistic::Min).unwrap().unwrap().value();
        let hi = compute(&metrics, Statistic::Max).unwrap().unwrap().value();
        let avg = compute(&metrics, Statistic::Avg).unwrap().unwrap().value();
        prop_assert!(lo <= avg && avg <= hi, "avg {} outside [{}, {}]", avg, lo, hi);
    }

    /// Property: sum matches the in-order total and names every contributor
    #[test]
    fn prop_sum_is_total(metrics in readings()) {
        let expected: f64 = metrics.iter().map(|m| m.value).sum();
        match compute(&metrics, Statistic::Sum) {
            Ok(Some(Aggregate::Combined { value, sensor_ids })) => {
                prop_assert_eq!(value, expected);
                prop_assert_eq!(sensor_ids, contributing_sensors(&metrics));
            }
            other => prop_assert!(false, "unexpected aggregate {:?}", other),
        }
    }

    /// Property: min and max report a real reading that bounds every other one
    #[test]
    fn prop_extremes_are_true_extremes(metrics in readings()) {
        let min = compute(&metrics, Statistic::Min);
        let max = compute(&metrics, Statistic::Max);
        match (min, max) {
            (
                Ok(Some(Aggregate::Extreme { value: lo, sensor_id: lo_sensor })),
                Ok(Some(Aggregate::Extreme { value: hi, sensor_id: hi_sensor })),
            ) => {
                prop_assert!(metrics.iter().all(|m| lo <= m.value && m.value <= hi));
                prop_assert!(metrics.iter().any(|m| m.value == lo && m.sensor_id == lo_sensor));
                prop_assert!(metrics.iter().any(|m| m.value == hi && m.sensor_id == hi_sensor));
            }
            other => prop_assert!(false, "unexpected aggregates {:?}", other),
        }
    }

    /// Property: the serialized result carries exactly one contributor field
    #[test]
    fn prop_shape_is_exclusive(metrics in readings(), statistic in any_statistic()) {
        let aggregate = compute(&metrics, statistic).unwrap().unwrap();
        let result = shape(statistic, MetricType::Temperature, aggregate, None).unwrap();
        let json: Value = serde_json::to_value(&result).unwrap();

        let single = json.get("sensor_id").is_some();
        let multi = json.get("sensor_ids").is_some();
        prop_assert!(single != multi, "both or neither contributor fields in {}", json);
        prop_assert_eq!(single, statistic.is_extreme());
    }

    /// Property: the mean of readings near the f64 limit is finite and bounded
    #[test]
    fn prop_avg_of_extreme_magnitudes_is_finite(
        mantissas in prop::collection::vec(-1.7f64..1.7, 1..40),
    ) {
        let values: Vec<f64> = mantissas.iter().map(|m| m * 1e308).collect();
        let base = Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap();
        let metrics: Vec<Metric> = values
            .iter()
            .enumerate()
            .map(|(i, &value)| Metric {
                id: i as i64 + 1,
                sensor_id: 1,
                metric_type: MetricType::Pressure,
                value,
                timestamp: base,
            })
            .collect();

        let avg = compute(&metrics, Statistic::Avg).unwrap().unwrap().value();
        let lo = values.iter().cloned().fold(f64::INFINITY, f64::min);
        let hi = values.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        prop_assert!(avg.is_finite());
        prop_assert!(lo <= avg && avg <= hi);

        match compute(&metrics, Statistic::Sum) {
            Ok(Some(aggregate)) => prop_assert!(aggregate.value().is_finite()),
            Ok(None) => prop_assert!(false, "non-empty input reported no data"),
            Err(_) => {}
        }
    }

    /// Property: no readings means no aggregate, whatever the statistic
    #[test]
    fn prop_empty_has_no_aggregate(statistic in any_statistic()) {
        prop_assert_eq!(compute(&[], statistic), Ok(None));
    }
}

#[cfg(test)]
mod additional_tests {
    use super::*;

    #[test]
    fn test_single_reading_is_every_statistic() {
        let metric = Metric {
            id: 1,
            sensor_id: 4,
            metric_type: MetricType::Humidity,
            value: 55.5,
            timestamp: Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap(),
        };
        for statistic in [Statistic::Min, Statistic::Max, Statistic::Sum, Statistic::Avg] {
            let aggregate = compute(std::slice::from_ref(&metric), statistic).unwrap().unwrap();
            assert_eq!(aggregate.value(), 55.5);
        }
    }
}
