//! Post-decode validation for request bodies.
//!
//! Serde rejects structurally bad input (missing fields, unknown enum
//! values, unparseable timestamps). [`Validate`] covers the rules serde
//! cannot express and runs inside the body extractor, before any handler
//! code touches the store.

use crate::error::ApiError;
use crate::models::{NewMetric, NewSensor};

// ---

/// A decoded body that still has to pass domain checks.
pub trait Validate: Sized {
    /// What the handler receives once the checks pass.
    type Validated;

    fn validate(self) -> Result<Self::Validated, ApiError>;
}

impl Validate for NewSensor {
    type Validated = NewSensor;

    fn validate(self) -> Result<Self::Validated, ApiError> {
        // ---
        if self.name.trim().is_empty() {
            return Err(ApiError::validation(
                &["body", "name"],
                "name must not be empty",
                "value_error",
            ));
        }
        Ok(self)
    }
}

impl Validate for NewMetric {
    type Validated = NewMetric;

    fn validate(self) -> Result<Self::Validated, ApiError> {
        // ---
        // Unknown sensor ids, including non-positive ones, are a 404 from the
        // handler's lookup rather than a validation failure.
        if !self.value.is_finite() {
            return Err(ApiError::validation(
                &["body", "value"],
                "value must be a finite number",
                "value_error",
            ));
        }
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    // ---
    use super::*;
    use crate::models::MetricType;

    #[test]
    fn test_blank_sensor_name_rejected() {
        // ---
        let sensor = NewSensor {
            name: "   ".to_string(),
            location: "Roof".to_string(),
        };
        assert!(matches!(sensor.validate(), Err(ApiError::Validation(_))));

        let sensor = NewSensor {
            name: "Station 1".to_string(),
            location: String::new(),
        };
        assert!(sensor.validate().is_ok());
    }

    #[test]
    fn test_non_finite_metric_value_rejected() {
        // ---
        let metric = NewMetric {
            sensor_id: 3,
            metric_type: MetricType::Pressure,
            value: f64::NAN,
            timestamp: None,
        };

        match metric.validate() {
            Err(ApiError::Validation(errors)) => {
                assert_eq!(errors[0].loc, vec!["body", "value"]);
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_non_positive_sensor_id_passes_to_lookup() {
        // ---
        for sensor_id in [0, -1] {
            let metric = NewMetric {
                sensor_id,
                metric_type: MetricType::Humidity,
                value: 1.0,
                timestamp: None,
            };
            assert_eq!(metric.validate().unwrap().sensor_id, sensor_id);
        }
    }
}
