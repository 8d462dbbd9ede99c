use std::time::Duration;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

/// Failures while fetching or interpreting the replication status.
///
/// None of these are fatal; each one turns a single request into a 500.
#[derive(Debug, thiserror::Error)]
pub enum CheckError {
    #[error("Database connection error: {0}")]
    Connection(#[source] sqlx::Error),

    #[error("Database connection timed out after {0:?}")]
    ConnectionTimeout(Duration),

    #[error("Status query failed: {0}")]
    Query(#[source] sqlx::Error),

    #[error("Status query timed out after {0:?}")]
    QueryTimeout(Duration),

    #[error("No slave status")]
    NoReplicationStatus,

    #[error("Failed to read status row: {0}")]
    Scan(#[source] sqlx::Error),

    #[error("Invalid replication status: {0}")]
    InvalidStatusShape(String),
}

impl CheckError {
    /// Short machine-friendly label for log fields.
    pub fn kind(&self) -> &'static str {
        match self {
            CheckError::Connection(_) | CheckError::ConnectionTimeout(_) => "connection",
            CheckError::Query(_) | CheckError::QueryTimeout(_) => "query",
            CheckError::NoReplicationStatus => "no_status",
            CheckError::Scan(_) => "scan",
            CheckError::InvalidStatusShape(_) => "invalid_shape",
        }
    }
}

impl IntoResponse for CheckError {
    fn into_response(self) -> Response {
        tracing::error!(kind = self.kind(), error = ?self, "Replication check failed");
        (StatusCode::INTERNAL_SERVER_ERROR, self.to_string()).into_response()
    }
}
