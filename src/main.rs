//! Pulse: install check and health endpoint.
//!
//! This is the application entry point. It initializes tracing, loads configuration
//! from a TOML file, builds the lazily-connected database pool, sets up the Axum
//! router, and runs the HTTP server until a shutdown signal arrives.

use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use pulse::config::{AppConfig, LoggingConfig, DEFAULT_CONFIG_PATH, DEFAULT_LOG_FILTER};
use pulse::db::PgDatabase;
use pulse::http::start_server;
use pulse::{create_router, AppState};

/// Pulse: install check and database health endpoint
#[derive(Parser, Debug)]
#[command(name = "pulse", version, about)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = DEFAULT_CONFIG_PATH)]
    config: String,

    /// Log level filter (e.g., "pulse=debug,tower_http=info")
    #[arg(short, long)]
    log_level: Option<String>,
}

fn init_tracing(log_filter: &str, logging: &LoggingConfig) {
    let filter = tracing_subscriber::EnvFilter::new(log_filter);
    let registry = tracing_subscriber::registry().with(filter);

    if logging.is_json() {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // Configuration is loaded first so the log format is known before tracing starts
    let config = AppConfig::load(&args.config)?;

    // Initialize tracing with priority: CLI > env > default
    let log_filter = args
        .log_level
        .or_else(|| std::env::var("RUST_LOG").ok())
        .unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string());
    init_tracing(&log_filter, &config.logging);

    tracing::info!(
        config = %args.config,
        database = %config.database.redacted_url(),
        max_connections = config.database.max_connections,
        probe_timeout_secs = config.database.probe_timeout_seconds,
        "Loaded configuration"
    );

    let db = PgDatabase::connect_lazy(&config.database)?;

    let state = AppState::new(config.clone(), Arc::new(db.clone()));
    let app = create_router(state);

    start_server(app, &config).await?;

    db.close().await;
    tracing::info!("Database pool closed");

    Ok(())
}
