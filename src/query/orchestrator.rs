//! Query orchestration: one independent attempt per requested metric type.
//!
//! Each attempt scans the store, aggregates, and shapes a result. Attempts
//! are evaluated sequentially so the output keeps the requested order. A
//! store failure inside one attempt is logged and only that metric type is
//! dropped; failures before the loop starts fail the whole request.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info, instrument, warn};

use super::date_range::{DateWindow, DEFAULT_LOOKBACK_DAYS, WEEKLY_LOOKBACK_DAYS};
use super::request::ValidatedQuery;
use super::shaper::{shape, QueryResult};
use super::statistics::{compute, contributing_sensors, StatisticError};
use crate::error::{ApiError, ApiResult, SENSOR_NOT_FOUND};
use crate::models::{MetricType, Statistic};
use crate::store::{EntityStore, MetricFilter, StoreError};

// ---

pub const NO_METRIC_DATA_MESSAGE: &str =
    "No data available for this metric in the specified time range";

pub const NO_WEEKLY_DATA_MESSAGE: &str =
    "No data available for the specified metrics and time range";

pub const METRIC_ERROR_MESSAGE: &str = "An error occurred while retrieving this metric";

/// Metric types reported by weekly averages when the caller names none.
pub const DEFAULT_WEEKLY_METRICS: [MetricType; 2] = [MetricType::Temperature, MetricType::Humidity];

/// Result of evaluating a single metric type.
#[derive(Debug)]
enum Attempt {
    Found(QueryResult),
    NoData,
    Failed(StoreError),
    Unrepresentable(StatisticError),
}

/// Run an aggregate query against `store`.
///
/// `now` anchors the default lookback when the query carries no window.
#[instrument(skip_all, fields(statistic = %query.statistic, metric_types = query.metric_types.len()))]
pub async fn run_query(
    store: &dyn EntityStore,
    query: &ValidatedQuery,
    now: DateTime<Utc>,
) -> ApiResult<Vec<QueryResult>> {
    // ---
    store.ping().await?;

    let (start, end) = match query.window {
        Some(window) => (window.start, Some(window.end)),
        None => (DateWindow::lookback(now, DEFAULT_LOOKBACK_DAYS).start, None),
    };

    let mut results = Vec::with_capacity(query.metric_types.len());
    for &metric_type in &query.metric_types {
        let filter = MetricFilter {
            sensor_ids: query.sensor_ids.clone(),
            metric_type,
            start,
            end,
        };

        match attempt(store, query, &filter).await? {
            Attempt::Found(result) => results.push(result),
            Attempt::NoData => info!("No data found for metric type: {}", metric_type),
            Attempt::Failed(err) => {
                warn!("Error processing metric {}, skipping: {}", metric_type, err)
            }
            Attempt::Unrepresentable(err) => {
                warn!("Aggregate for metric {} not reportable, skipping: {}", metric_type, err)
            }
        }
    }

    if results.is_empty() {
        info!("Query returned no results");
    }
    Ok(results)
}

async fn attempt(
    store: &dyn EntityStore,
    query: &ValidatedQuery,
    filter: &MetricFilter,
) -> ApiResult<Attempt> {
    // ---
    let metrics = match store.find_metrics(filter).await {
        Ok(metrics) => metrics,
        Err(err) => return Ok(Attempt::Failed(err)),
    };

    let aggregate = match compute(&metrics, query.statistic) {
        Ok(Some(aggregate)) => aggregate,
        Ok(None) => return Ok(Attempt::NoData),
        Err(err) => return Ok(Attempt::Unrepresentable(err)),
    };

    if query.statistic.is_extreme() {
        debug!(
            "{} {} over {} readings from sensors {:?}",
            query.statistic,
            filter.metric_type,
            metrics.len(),
            contributing_sensors(&metrics)
        );
    }

    let result = shape(query.statistic, filter.metric_type, aggregate, query.window)?;
    Ok(Attempt::Found(result))
}

/// One row of the weekly averages response.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeeklyAverageRow {
    pub sensor_ids: Vec<i64>,
    pub metric_type: MetricType,
    pub statistic: Statistic,
    /// `None` when the metric has no data or could not be read.
    pub value: Option<f64>,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Weekly averages response body.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum WeeklyAverages {
    Rows(Vec<WeeklyAverageRow>),
    Empty { message: String },
}

/// Average of each metric type for one sensor over the week ending at `now`.
///
/// Unlike [`run_query`], a metric type without data is reported as a row
/// with a null value instead of being dropped.
// TODO: decide with API consumers whether /query/ should also emit null rows.
#[instrument(skip(store, metric_types), fields(metric_types = metric_types.len()))]
pub async fn weekly_averages(
    store: &dyn EntityStore,
    sensor_id: i64,
    metric_types: &[MetricType],
    now: DateTime<Utc>,
) -> ApiResult<WeeklyAverages> {
    // ---
    if store.get_sensor(sensor_id).await?.is_none() {
        return Err(ApiError::NotFound(SENSOR_NOT_FOUND));
    }

    let window = DateWindow::lookback(now, WEEKLY_LOOKBACK_DAYS);
    let row = |metric_type: MetricType, value: Option<f64>| WeeklyAverageRow {
        sensor_ids: vec![sensor_id],
        metric_type,
        statistic: Statistic::Avg,
        value,
        start_date: window.start,
        end_date: window.end,
        message: None,
        error: None,
    };

    let mut rows = Vec::with_capacity(metric_types.len());
    for &metric_type in metric_types {
        let filter = MetricFilter {
            sensor_ids: Some(vec![sensor_id]),
            metric_type,
            start: window.start,
            end: Some(window.end),
        };

        let average = store
            .find_metrics(&filter)
            .await
            .map_err(|e| e.to_string())
            .and_then(|metrics| compute(&metrics, Statistic::Avg).map_err(|e| e.to_string()));

        match average {
            Ok(Some(aggregate)) => rows.push(row(metric_type, Some(aggregate.value()))),
            Ok(None) => rows.push(WeeklyAverageRow {
                message: Some(NO_METRIC_DATA_MESSAGE.to_string()),
                ..row(metric_type, None)
            }),
            Err(err) => {
                warn!("Error in weekly averages for {}: {}", metric_type, err);
                rows.push(WeeklyAverageRow {
                    error: Some(METRIC_ERROR_MESSAGE.to_string()),
                    ..row(metric_type, None)
                });
            }
        }
    }

    if rows.is_empty() {
        return Ok(WeeklyAverages::Empty {
            message: NO_WEEKLY_DATA_MESSAGE.to_string(),
        });
    }
    Ok(WeeklyAverages::Rows(rows))
}
