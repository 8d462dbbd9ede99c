//! replcheck: MySQL replica health check.
//!
//! This is the application entry point. It parses flags, initializes tracing,
//! layers configuration (defaults, TOML file, flags), sets up the Axum router
//! and serves health checks until SIGTERM/SIGINT.

use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use replcheck::config::{AppConfig, DEFAULT_LOG_FILTER};
use replcheck::http::start_server;
use replcheck::{create_router, AppState};

/// replcheck: HTTP health check for MySQL replicas
#[derive(Parser, Debug)]
#[command(name = "replcheck", version, about)]
struct Args {
    /// Path to an optional TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// HTTP listen port
    #[arg(short, long)]
    port: Option<u16>,

    /// MySQL connection URL (e.g. "mysql://root@127.0.0.1:3306/")
    #[arg(long)]
    dsn: Option<String>,

    /// Replication lag limit in seconds
    #[arg(long)]
    lag_limit: Option<i64>,

    /// Log level filter (e.g., "replcheck=debug,sqlx=info")
    #[arg(short, long)]
    log_level: Option<String>,
}

impl Args {
    /// Command-line values win over the file and built-in defaults.
    fn apply_overrides(&self, config: &mut AppConfig) {
        if let Some(port) = self.port {
            config.http.port = port;
        }
        if let Some(dsn) = &self.dsn {
            config.mysql.dsn = dsn.clone();
        }
        if let Some(lag_limit) = self.lag_limit {
            config.replication.lag_limit_seconds = lag_limit;
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // --version and --help exit here, before anything else starts
    let args = Args::parse();

    let mut config = AppConfig::load(args.config.as_deref())?;
    args.apply_overrides(&mut config);
    config.validate()?;

    // Initialize tracing with priority: CLI > env > default
    let log_filter = args
        .log_level
        .clone()
        .or_else(|| std::env::var("RUST_LOG").ok())
        .unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string());

    let registry =
        tracing_subscriber::registry().with(tracing_subscriber::EnvFilter::new(&log_filter));
    if config.logging.is_json() {
        registry
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        config_file = ?args.config,
        "Loaded configuration"
    );
    tracing::info!(
        port = config.http.port,
        dsn = %config.mysql.redacted_dsn(),
        query = %config.mysql.query,
        lag_limit_seconds = config.replication.lag_limit_seconds,
        connect_timeout_seconds = config.mysql.connect_timeout_seconds,
        query_timeout_seconds = config.mysql.query_timeout_seconds,
        "Replication check configured"
    );

    let app = create_router(AppState::new(config.clone()));
    start_server(app, &config).await?;

    Ok(())
}
