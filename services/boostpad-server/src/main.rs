//! Boostpad API Server
//!
//! REST server for the Boostpad engagement-task marketplace.
//!
//! # Usage
//!
//! ```bash
//! # Start with default settings
//! boostpad-server
//!
//! # Start with a config file
//! boostpad-server --config /path/to/config.toml
//!
//! # Start with environment overrides
//! BOOSTPAD__SERVER__PORT=8080 boostpad-server
//! ```

mod config;

use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tokio::signal;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use boostpad_api::{create_router, ApiConfig, AppState, GatewayIdentity};
use boostpad_db::{Database, DatabaseConfig as DbConfig};
use boostpad_engine::TaskEngine;

use crate::config::ServerConfig;

/// Boostpad API Server - engagement-task marketplace backend
#[derive(Parser, Debug)]
#[command(name = "boostpad-server")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to configuration file (TOML)
    #[arg(short, long, env = "BOOSTPAD_CONFIG")]
    config: Option<String>,

    /// Host to bind to
    #[arg(long, env = "BOOSTPAD_HOST")]
    host: Option<String>,

    /// Port to listen on
    #[arg(short, long, env = "BOOSTPAD_PORT")]
    port: Option<u16>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "BOOSTPAD_LOG_LEVEL", default_value = "info")]
    log_level: String,

    /// Log format (json, pretty)
    #[arg(long, env = "BOOSTPAD_LOG_FORMAT", default_value = "pretty")]
    log_format: String,

    /// PostgreSQL connection URL
    #[arg(long, env = "DATABASE_URL")]
    database_url: Option<String>,

    /// Skip startup migrations
    #[arg(long, env = "BOOSTPAD_SKIP_MIGRATIONS")]
    skip_migrations: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut server_config = ServerConfig::load(args.config.as_deref())?;

    // CLI flags win over file and environment
    if let Some(host) = args.host {
        server_config.server.host = host;
    }
    if let Some(port) = args.port {
        server_config.server.port = port;
    }
    if let Some(db_url) = args.database_url {
        server_config.database.postgres_url = db_url;
    }
    if args.skip_migrations {
        server_config.database.run_migrations = false;
    }
    server_config.logging.level = args.log_level;
    server_config.logging.format = args.log_format;

    init_logging(&server_config.logging)?;

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "Starting Boostpad API Server");

    let db = init_database(&server_config.database).await?;

    let engine = Arc::new(TaskEngine::new(db.pg.clone()));

    let state = Arc::new(AppState::new(db, engine, Arc::new(GatewayIdentity)));

    let api_config = ApiConfig {
        enable_cors: server_config.api.enable_cors,
        cors_origins: server_config.api.cors_origins.clone(),
        enable_tracing: server_config.api.enable_tracing,
    };

    let app = create_router(state, api_config);

    let addr = server_config.server.socket_addr()?;

    tracing::info!(
        host = %server_config.server.host,
        port = %server_config.server.port,
        "Server listening"
    );

    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(server_config.server.shutdown_timeout()))
        .await?;

    tracing::info!("Server shutdown complete");

    Ok(())
}

/// Initialize tracing/logging
fn init_logging(config: &config::LoggingConfig) -> anyhow::Result<()> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    let subscriber = tracing_subscriber::registry().with(env_filter);

    match config.format.as_str() {
        "json" => {
            subscriber.with(fmt::layer().json().with_target(true)).init();
        }
        _ => {
            subscriber.with(fmt::layer().pretty().with_target(true)).init();
        }
    }

    Ok(())
}

/// Connect, migrate, and verify the database
async fn init_database(config: &config::DatabaseSettings) -> anyhow::Result<Arc<Database>> {
    tracing::info!("Connecting to database...");

    let db_config = DbConfig {
        postgres_url: config.postgres_url.clone(),
        pg_max_connections: config.max_connections,
        pg_min_connections: config.min_connections,
        pg_acquire_timeout_secs: config.acquire_timeout_secs,
    };

    let db = Database::connect(&db_config).await?;

    if config.run_migrations {
        db.migrate().await?;
    }

    let health = db.health_check().await?;
    if !health.healthy {
        anyhow::bail!("Database health check failed");
    }

    tracing::info!(postgres = health.postgres, "Database health check passed");

    Ok(Arc::new(db))
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal(timeout: Duration) {
    let ctrl_c = async {
        signal::ctrl_c().await.expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown...");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown...");
        }
    }

    // Allow time for in-flight requests to complete
    tracing::info!(
        timeout_secs = timeout.as_secs(),
        "Waiting for in-flight requests to complete..."
    );

    tokio::time::sleep(timeout).await;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_parsing() {
        let args = Args::parse_from(["boostpad-server", "--port", "8080"]);
        assert_eq!(args.port, Some(8080));
    }
}
