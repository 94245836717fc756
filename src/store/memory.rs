//! In-process entity store.
//!
//! Keeps both tables in vectors behind a mutex. Iteration order matches the
//! PostgreSQL backend: listings by id, scans by (timestamp, id).

use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::Utc;

use super::{EntityStore, MetricFilter, StoreError, StoreResult};
use crate::models::{Metric, NewMetric, NewSensor, Sensor};

// ---

#[derive(Debug, Default)]
struct Tables {
    sensors: Vec<Sensor>,
    metrics: Vec<Metric>,
    last_sensor_id: i64,
    last_metric_id: i64,
}

impl Tables {
    fn push_metric(&mut self, metric: NewMetric) -> Metric {
        // ---
        self.last_metric_id += 1;
        let stored = Metric {
            id: self.last_metric_id,
            sensor_id: metric.sensor_id,
            metric_type: metric.metric_type,
            value: metric.value,
            timestamp: metric.timestamp.unwrap_or_else(Utc::now),
        };
        self.metrics.push(stored.clone());
        stored
    }
}

/// Entity store held entirely in memory.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn tables(&self) -> StoreResult<MutexGuard<'_, Tables>> {
        self.tables
            .lock()
            .map_err(|_| StoreError::Unavailable("memory store lock poisoned".to_string()))
    }
}

fn page<T: Clone>(items: &[T], skip: i64, limit: i64) -> Vec<T> {
    items
        .iter()
        .skip(skip.max(0) as usize)
        .take(limit.max(0) as usize)
        .cloned()
        .collect()
}

#[async_trait]
impl EntityStore for MemoryStore {
    async fn ping(&self) -> StoreResult<()> {
        self.tables().map(|_| ())
    }

    async fn insert_sensor(&self, sensor: NewSensor) -> StoreResult<Sensor> {
        // ---
        let mut tables = self.tables()?;
        tables.last_sensor_id += 1;
        let stored = Sensor {
            id: tables.last_sensor_id,
            name: sensor.name,
            location: sensor.location,
            created_at: Utc::now(),
        };
        tables.sensors.push(stored.clone());
        Ok(stored)
    }

    async fn list_sensors(&self, skip: i64, limit: i64) -> StoreResult<Vec<Sensor>> {
        Ok(page(&self.tables()?.sensors, skip, limit))
    }

    async fn get_sensor(&self, id: i64) -> StoreResult<Option<Sensor>> {
        Ok(self.tables()?.sensors.iter().find(|s| s.id == id).cloned())
    }

    async fn insert_metric(&self, metric: NewMetric) -> StoreResult<Metric> {
        Ok(self.tables()?.push_metric(metric))
    }

    async fn insert_metrics(&self, metrics: Vec<NewMetric>) -> StoreResult<usize> {
        // ---
        let mut tables = self.tables()?;
        let now = Utc::now();
        let count = metrics.len();
        for mut metric in metrics {
            metric.timestamp.get_or_insert(now);
            tables.push_metric(metric);
        }
        Ok(count)
    }

    async fn list_metrics(
        &self,
        sensor_id: Option<i64>,
        skip: i64,
        limit: i64,
    ) -> StoreResult<Vec<Metric>> {
        // ---
        let tables = self.tables()?;
        let scoped: Vec<Metric> = tables
            .metrics
            .iter()
            .filter(|m| sensor_id.map_or(true, |id| m.sensor_id == id))
            .cloned()
            .collect();
        Ok(page(&scoped, skip, limit))
    }

    async fn find_metrics(&self, filter: &MetricFilter) -> StoreResult<Vec<Metric>> {
        // ---
        let tables = self.tables()?;
        let mut found: Vec<Metric> = tables
            .metrics
            .iter()
            .filter(|m| filter.matches(m))
            .cloned()
            .collect();
        found.sort_by(|a, b| a.timestamp.cmp(&b.timestamp).then(a.id.cmp(&b.id)));
        Ok(found)
    }
}
