//! Replication health check endpoint.
//!
//! Fetches the replica's status, evaluates it and answers `200 OK` only when
//! replication is running within the lag limit. Every other outcome is a 500
//! whose plain-text body explains why, which is all a load balancer needs.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use tracing::instrument;

use crate::error::CheckError;
use crate::evaluator::{evaluate, HealthVerdict};
use crate::state::AppState;

pub const HEALTHY_BODY: &str = "OK";

impl IntoResponse for HealthVerdict {
    fn into_response(self) -> Response {
        match self {
            HealthVerdict::Healthy => (StatusCode::OK, HEALTHY_BODY).into_response(),
            HealthVerdict::Unhealthy(reason) => {
                tracing::warn!(%reason, "Replica unhealthy");
                (StatusCode::INTERNAL_SERVER_ERROR, reason).into_response()
            }
        }
    }
}

/// Replication health handler.
///
/// Each call opens its own connection through the configured status source;
/// no state carries over between requests.
#[instrument(name = "replication.check", skip_all)]
pub async fn replication(State(state): State<AppState>) -> Result<HealthVerdict, CheckError> {
    let lag_limit = state.config.replication.lag_limit_seconds;
    let status = state.status.fetch_status().await?;
    tracing::debug!(columns = status.len(), lag_limit, "Fetched replication status");

    evaluate(&status, lag_limit)
}
