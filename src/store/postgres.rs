//! PostgreSQL-backed entity store.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use super::{EntityStore, MetricFilter, StoreError, StoreResult};
use crate::models::{Metric, MetricType, NewMetric, NewSensor, Sensor};

// ---

/// Entity store over a sqlx connection pool.
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Raw `metrics` row; `metric_type` is stored as text.
#[derive(Debug, sqlx::FromRow)]
struct MetricRow {
    id: i64,
    sensor_id: i64,
    metric_type: String,
    value: f64,
    recorded_at: DateTime<Utc>,
}

impl TryFrom<MetricRow> for Metric {
    type Error = StoreError;

    fn try_from(row: MetricRow) -> Result<Self, Self::Error> {
        // ---
        let metric_type = row
            .metric_type
            .parse::<MetricType>()
            .map_err(|e| StoreError::Corrupt(format!("metric {}: {}", row.id, e)))?;

        Ok(Metric {
            id: row.id,
            sensor_id: row.sensor_id,
            metric_type,
            value: row.value,
            timestamp: row.recorded_at,
        })
    }
}

fn into_metrics(rows: Vec<MetricRow>) -> StoreResult<Vec<Metric>> {
    rows.into_iter().map(Metric::try_from).collect()
}

#[async_trait]
impl EntityStore for PgStore {
    async fn ping(&self) -> StoreResult<()> {
        // ---
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn insert_sensor(&self, sensor: NewSensor) -> StoreResult<Sensor> {
        // ---
        let created = sqlx::query_as::<_, Sensor>(
            r#"
            INSERT INTO sensors (name, location, created_at)
            VALUES ($1, $2, $3)
            RETURNING id, name, location, created_at
            "#,
        )
        .bind(&sensor.name)
        .bind(&sensor.location)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }

    async fn list_sensors(&self, skip: i64, limit: i64) -> StoreResult<Vec<Sensor>> {
        // ---
        let sensors = sqlx::query_as::<_, Sensor>(
            r#"
            SELECT id, name, location, created_at
            FROM sensors
            ORDER BY id
            OFFSET $1 LIMIT $2
            "#,
        )
        .bind(skip)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(sensors)
    }

    async fn get_sensor(&self, id: i64) -> StoreResult<Option<Sensor>> {
        // ---
        let sensor = sqlx::query_as::<_, Sensor>(
            "SELECT id, name, location, created_at FROM sensors WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(sensor)
    }

    async fn insert_metric(&self, metric: NewMetric) -> StoreResult<Metric> {
        // ---
        let row = sqlx::query_as::<_, MetricRow>(
            r#"
            INSERT INTO metrics (sensor_id, metric_type, value, recorded_at)
            VALUES ($1, $2, $3, $4)
            RETURNING id, sensor_id, metric_type, value, recorded_at
            "#,
        )
        .bind(metric.sensor_id)
        .bind(metric.metric_type.as_str())
        .bind(metric.value)
        .bind(metric.timestamp.unwrap_or_else(Utc::now))
        .fetch_one(&self.pool)
        .await?;

        Metric::try_from(row)
    }

    async fn insert_metrics(&self, metrics: Vec<NewMetric>) -> StoreResult<usize> {
        // ---
        let now = Utc::now();
        let mut tx = self.pool.begin().await?;

        for metric in &metrics {
            sqlx::query(
                r#"
                INSERT INTO metrics (sensor_id, metric_type, value, recorded_at)
                VALUES ($1, $2, $3, $4)
                "#,
            )
            .bind(metric.sensor_id)
            .bind(metric.metric_type.as_str())
            .bind(metric.value)
            .bind(metric.timestamp.unwrap_or(now))
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(metrics.len())
    }

    async fn list_metrics(
        &self,
        sensor_id: Option<i64>,
        skip: i64,
        limit: i64,
    ) -> StoreResult<Vec<Metric>> {
        // ---
        let rows = sqlx::query_as::<_, MetricRow>(
            r#"
            SELECT id, sensor_id, metric_type, value, recorded_at
            FROM metrics
            WHERE ($1::BIGINT IS NULL OR sensor_id = $1)
            ORDER BY id
            OFFSET $2 LIMIT $3
            "#,
        )
        .bind(sensor_id)
        .bind(skip)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        into_metrics(rows)
    }

    async fn find_metrics(&self, filter: &MetricFilter) -> StoreResult<Vec<Metric>> {
        // ---
        let rows = sqlx::query_as::<_, MetricRow>(
            r#"
            SELECT id, sensor_id, metric_type, value, recorded_at
            FROM metrics
            WHERE ($1::BIGINT[] IS NULL OR sensor_id = ANY($1))
              AND metric_type = $2
              AND recorded_at >= $3
              AND ($4::TIMESTAMPTZ IS NULL OR recorded_at <= $4)
            ORDER BY recorded_at, id
            "#,
        )
        .bind(filter.sensor_ids.clone())
        .bind(filter.metric_type.as_str())
        .bind(filter.start)
        .bind(filter.end)
        .fetch_all(&self.pool)
        .await?;

        into_metrics(rows)
    }
}
