//! HTTP server startup logic.

use std::net::SocketAddr;

use axum::Router;
use tokio::net::TcpListener;

use crate::config::AppConfig;

use super::shutdown;

/// Server startup error
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("Invalid listen address: {0}")]
    Address(String),

    #[error("Failed to bind server: {0}")]
    Bind(#[source] std::io::Error),

    #[error("Server error: {0}")]
    Serve(#[source] std::io::Error),
}

/// Resolve `http.host` and `http.port` into a socket address.
pub fn listen_addr(config: &AppConfig) -> Result<SocketAddr, ServerError> {
    format!("{}:{}", config.http.host, config.http.port)
        .parse()
        .map_err(|e| ServerError::Address(format!("{}:{} ({})", config.http.host, config.http.port, e)))
}

/// Start the HTTP server based on configuration.
///
/// This function blocks until the server shuts down.
pub async fn start_server(app: Router, config: &AppConfig) -> Result<(), ServerError> {
    let addr = listen_addr(config)?;
    let listener = TcpListener::bind(addr).await.map_err(ServerError::Bind)?;

    tracing::info!(%addr, "Listening for health checks");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown::shutdown_signal())
        .await
        .map_err(ServerError::Serve)?;

    tracing::info!("Server stopped");
    Ok(())
}
