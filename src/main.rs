//! `weather-sensor-api` binary: configuration, tracing, Postgres, HTTP.
//!
//! Startup order: tracing, `.env`, [`Config`], connection pool, schema
//! bootstrap, then the `routes` gateway served on `HTTP_PORT`.
//!
//! # Environment Variables
//! - `DATABASE_URL` (**required**) – PostgreSQL connection string
//! - `DB_POOL_MAX` (optional) – maximum number of DB connections (default: 5)
//! - `HTTP_PORT` (optional) – listen port (default: 8080)
//! - `AXUM_LOG_LEVEL` (optional) – log verbosity when `RUST_LOG` is unset (default: `debug`)
//! - `AXUM_SPAN_EVENTS` (optional) – `full`, `enter_exit`, or close-only
//! - `FORCE_COLOR` (optional) – override TTY color detection
//!
//! The subscriber is installed here and nowhere else; the library only emits
//! events, so its tests run without global logging state.
use std::{env, net::SocketAddr, sync::Arc};

use anyhow::{Context, Result};
use dotenvy::dotenv;
use is_terminal::IsTerminal;
use sqlx::{postgres::PgPoolOptions, PgPool};
use tracing::info;
use tracing_subscriber::{filter::EnvFilter, fmt::format::FmtSpan};

use weather_sensor_api::{config, routes, schema, Config, PgStore, SharedStore};

// ---

#[tokio::main]
async fn main() -> Result<()> {
    // ---
    init_tracing();
    dotenv().ok();

    let cfg = config::load_from_env()?;
    cfg.log_config();

    let pool = connect(&cfg).await?;
    schema::create_schema(&pool).await?;
    info!("Database schema ready");

    let store: SharedStore = Arc::new(PgStore::new(pool));
    serve(store, cfg.http_port).await
}

async fn connect(cfg: &Config) -> Result<PgPool> {
    // ---
    let masked_db_url = config::mask_db_url(&cfg.db_url);
    info!("Connecting to database: {}", masked_db_url);

    let pool = PgPoolOptions::new()
        .max_connections(cfg.db_pool_max)
        .connect(&cfg.db_url)
        .await
        .with_context(|| format!("Failed to connect to database '{}'", masked_db_url))?;

    info!("Connected with up to {} pooled connections", cfg.db_pool_max);
    Ok(pool)
}

async fn serve(store: SharedStore, port: u16) -> Result<()> {
    // ---
    let app = routes::router(store);
    let addr = SocketAddr::from(([0, 0, 0, 0], port));

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("Listening on {}", addr);

    axum::serve(listener, app).await?;
    Ok(())
}

// ---

/// Install the global `fmt` subscriber. Call once, before any event is emitted.
fn init_tracing() {
    // ---
    tracing_subscriber::fmt()
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .with_span_events(span_events())
        .with_env_filter(env_filter())
        .with_ansi(use_color())
        .compact()
        .init();
}

fn span_events() -> FmtSpan {
    match env::var("AXUM_SPAN_EVENTS").as_deref() {
        Ok("full") => FmtSpan::FULL,
        Ok("enter_exit") => FmtSpan::ENTER | FmtSpan::EXIT,
        _ => FmtSpan::CLOSE,
    }
}

fn use_color() -> bool {
    match env::var("FORCE_COLOR").as_deref() {
        Ok("1") | Ok("true") | Ok("yes") => true,
        Ok("0") | Ok("false") | Ok("no") => false,
        _ => std::io::stdout().is_terminal(),
    }
}

/// `RUST_LOG` wins; otherwise `AXUM_LOG_LEVEL` with sqlx statement logs muted.
fn env_filter() -> EnvFilter {
    // ---
    if env::var("RUST_LOG").is_ok() {
        return EnvFilter::from_default_env();
    }
    let level = match env::var("AXUM_LOG_LEVEL").as_deref() {
        Ok(level @ ("trace" | "debug" | "info" | "warn" | "error")) => level.to_string(),
        _ => "debug".to_string(),
    };
    EnvFilter::new(format!("{level},sqlx::query=warn"))
}
