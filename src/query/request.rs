//! Wire schema of `POST /query/` and its validated form.

use chrono::{DateTime, Utc};
use serde::Deserialize;

use super::date_range::{validate_range, DateWindow};
use crate::error::{ApiError, FieldError};
use crate::models::{MetricType, Statistic};
use crate::validate::Validate;

// ---

/// Request body as sent by the client.
#[derive(Debug, Clone, Deserialize)]
pub struct QueryRequest {
    /// Absent (or empty) scopes the query to every sensor.
    #[serde(default)]
    pub sensor_ids: Option<Vec<i64>>,
    pub metric_types: Vec<MetricType>,
    pub statistic: Statistic,
    #[serde(default)]
    pub start_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub end_date: Option<DateTime<Utc>>,
}

/// A query that passed validation and is ready for the orchestrator.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedQuery {
    pub sensor_ids: Option<Vec<i64>>,
    /// Non-empty, in request order.
    pub metric_types: Vec<MetricType>,
    pub statistic: Statistic,
    /// `None` means the default lookback applies at evaluation time.
    pub window: Option<DateWindow>,
}

impl Validate for QueryRequest {
    type Validated = ValidatedQuery;

    fn validate(self) -> Result<Self::Validated, ApiError> {
        // ---
        let mut errors = Vec::new();

        if self.metric_types.is_empty() {
            errors.push(FieldError::new(
                &["body", "metric_types"],
                "at least one metric type is required",
                "value_error",
            ));
        }

        let window = match validate_range(self.start_date, self.end_date) {
            Ok(window) => window,
            Err(err) => {
                errors.push(FieldError::new(&["body", "end_date"], err.to_string(), "value_error"));
                None
            }
        };

        if !errors.is_empty() {
            return Err(ApiError::Validation(errors));
        }

        Ok(ValidatedQuery {
            sensor_ids: self.sensor_ids.filter(|ids| !ids.is_empty()),
            metric_types: self.metric_types,
            statistic: self.statistic,
            window,
        })
    }
}
