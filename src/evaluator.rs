//! Health predicates over a replication status row.
//!
//! Two gates run in order and stop at the first failure:
//! 1. both replication threads report `Yes`
//! 2. `Seconds_Behind_Master` is an integer no greater than the lag limit
//!
//! A row missing one of the required columns, or carrying a non-integer lag
//! (NULL while the SQL thread catches up), is an [`CheckError::InvalidStatusShape`]
//! rather than a verdict.

use crate::error::CheckError;
use crate::status::{ReplicationStatus, StatusValue};

pub const IO_RUNNING: &str = "Slave_IO_Running";
pub const SQL_RUNNING: &str = "Slave_SQL_Running";
pub const SECONDS_BEHIND: &str = "Seconds_Behind_Master";

/// Value both thread-state columns must hold, compared case-sensitively.
const RUNNING: &str = "Yes";

pub const NOT_RUNNING_REASON: &str = "Slave is not running.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthVerdict {
    Healthy,
    Unhealthy(String),
}

impl HealthVerdict {
    pub fn is_healthy(&self) -> bool {
        matches!(self, HealthVerdict::Healthy)
    }
}

/// Evaluate `status` against an inclusive lag limit in seconds.
pub fn evaluate(status: &ReplicationStatus, lag_limit: i64) -> Result<HealthVerdict, CheckError> {
    let io_running = thread_running(status, IO_RUNNING)?;
    let sql_running = thread_running(status, SQL_RUNNING)?;
    if !(io_running && sql_running) {
        return Ok(HealthVerdict::Unhealthy(NOT_RUNNING_REASON.to_string()));
    }

    let lag = match status.get(SECONDS_BEHIND) {
        Some(StatusValue::Int(lag)) => *lag,
        Some(other) => {
            return Err(CheckError::InvalidStatusShape(format!(
                "{} is not an integer: {}",
                SECONDS_BEHIND, other
            )))
        }
        None => return Err(missing(SECONDS_BEHIND)),
    };

    if lag > lag_limit {
        tracing::debug!(lag, lag_limit, "Replication lag over limit");
        return Ok(HealthVerdict::Unhealthy(format!(
            "Replication lag exceeds the limit of {}",
            lag_limit
        )));
    }

    Ok(HealthVerdict::Healthy)
}

fn thread_running(status: &ReplicationStatus, column: &str) -> Result<bool, CheckError> {
    status
        .get(column)
        .map(|value| value.as_str() == Some(RUNNING))
        .ok_or_else(|| missing(column))
}

fn missing(column: &str) -> CheckError {
    CheckError::InvalidStatusShape(format!("missing column {}", column))
}
