//! Startup DDL for the `sensors` and `metrics` tables.
//!
//! Every statement is `IF NOT EXISTS`, so running it against an existing
//! database is a no-op.

use anyhow::{Context, Result};
use sqlx::PgPool;
use tracing::debug;

// ---

const SENSORS_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS sensors (
        id          BIGSERIAL PRIMARY KEY,
        name        TEXT        NOT NULL,
        location    TEXT        NOT NULL,
        created_at  TIMESTAMPTZ NOT NULL DEFAULT now()
    )
"#;

// No foreign key: `POST /metrics/` looks the sensor up before inserting.
const METRICS_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS metrics (
        id           BIGSERIAL PRIMARY KEY,
        sensor_id    BIGINT           NOT NULL,
        metric_type  TEXT             NOT NULL,
        value        DOUBLE PRECISION NOT NULL,
        recorded_at  TIMESTAMPTZ      NOT NULL DEFAULT now()
    )
"#;

/// Serves the (metric type, window) scans behind every aggregate query.
const METRICS_TYPE_TIME_INDEX: &str = r#"
    CREATE INDEX IF NOT EXISTS idx_metrics_type_recorded_at
        ON metrics (metric_type, recorded_at)
"#;

const METRICS_SENSOR_INDEX: &str = r#"
    CREATE INDEX IF NOT EXISTS idx_metrics_sensor_id
        ON metrics (sensor_id)
"#;

const STATEMENTS: [(&str, &str); 4] = [
    ("sensors", SENSORS_TABLE),
    ("metrics", METRICS_TABLE),
    ("idx_metrics_type_recorded_at", METRICS_TYPE_TIME_INDEX),
    ("idx_metrics_sensor_id", METRICS_SENSOR_INDEX),
];

/// Apply the DDL in one transaction.
pub async fn create_schema(pool: &PgPool) -> Result<()> {
    // ---
    let mut tx = pool.begin().await?;

    for (object, statement) in STATEMENTS {
        sqlx::query(statement)
            .execute(&mut *tx)
            .await
            .with_context(|| format!("Failed to create {}", object))?;
        debug!("Ensured {}", object);
    }

    tx.commit().await?;
    Ok(())
}
