//! Date window policy for aggregate queries.
//!
//! An explicit window must give both bounds, end strictly after start, and
//! span between one day and 31 days inclusive. Queries without a window fall
//! back to a lookback from "now", resolved by the caller.

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

// ---

pub const MIN_SPAN_DAYS: i64 = 1;
pub const MAX_SPAN_DAYS: i64 = 31;

/// Lookback applied to `POST /query/` when no window is given.
pub const DEFAULT_LOOKBACK_DAYS: i64 = 1;

/// Lookback used by the weekly averages endpoint and the sample data generator.
pub const WEEKLY_LOOKBACK_DAYS: i64 = 7;

/// A validated, inclusive time window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl DateWindow {
    /// The `days`-long window ending at `now`.
    pub fn lookback(now: DateTime<Utc>, days: i64) -> Self {
        Self {
            start: now - Duration::days(days),
            end: now,
        }
    }

    pub fn span(&self) -> Duration {
        self.end - self.start
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RangeError {
    #[error("{0}")]
    InvalidRange(String),
}

fn invalid(message: &str) -> RangeError {
    RangeError::InvalidRange(message.to_string())
}

/// Validate an optional `(start, end)` pair.
///
/// Returns `Ok(None)` when neither bound is given and the pair unchanged when
/// it satisfies the policy.
pub fn validate_range(
    start: Option<DateTime<Utc>>,
    end: Option<DateTime<Utc>>,
) -> Result<Option<DateWindow>, RangeError> {
    // ---
    let (start, end) = match (start, end) {
        (None, None) => return Ok(None),
        (Some(start), Some(end)) => (start, end),
        _ => return Err(invalid("start_date and end_date must be provided together")),
    };

    if end <= start {
        return Err(invalid("end_date must be after start_date"));
    }

    let span = end - start;
    if span < Duration::days(MIN_SPAN_DAYS) {
        return Err(invalid("Date range must be at least one day"));
    }
    if span > Duration::days(MAX_SPAN_DAYS) {
        return Err(invalid("Date range must not exceed one month"));
    }

    Ok(Some(DateWindow { start, end }))
}
