//! Replication status fetching.
//!
//! [`MysqlStatusFetcher`] opens one connection per call, runs the status query
//! over the text protocol and turns the first row into a [`ReplicationStatus`].
//! The connection never outlives the call: it is closed explicitly once the
//! query finishes, and dropped (closing the socket) if a deadline cancels the
//! work part-way.

use std::time::Duration;

use async_trait::async_trait;
use sqlx::mysql::MySqlRow;
use sqlx::{Column, Connection, Executor, MySqlConnection, Row};
use tokio::time::timeout;

use crate::config::MysqlConfig;
use crate::error::CheckError;
use crate::status::ReplicationStatus;

/// Source of replication status rows.
#[async_trait]
pub trait StatusSource: Send + Sync {
    async fn fetch_status(&self) -> Result<ReplicationStatus, CheckError>;
}

/// Fetches status from a MySQL server using a fresh connection per request.
#[derive(Debug, Clone)]
pub struct MysqlStatusFetcher {
    dsn: String,
    query: String,
    connect_timeout: Duration,
    query_timeout: Duration,
}

impl MysqlStatusFetcher {
    pub fn new(config: &MysqlConfig) -> Self {
        Self {
            dsn: config.dsn.clone(),
            query: config.query.clone(),
            connect_timeout: config.connect_timeout(),
            query_timeout: config.query_timeout(),
        }
    }

    async fn connect(&self) -> Result<MySqlConnection, CheckError> {
        timeout(self.connect_timeout, MySqlConnection::connect(&self.dsn))
            .await
            .map_err(|_| CheckError::ConnectionTimeout(self.connect_timeout))?
            .map_err(CheckError::Connection)
    }

    async fn query_first_row(&self, conn: &mut MySqlConnection) -> Result<MySqlRow, CheckError> {
        // raw_sql keeps SHOW statements on the text protocol, so every cell
        // decodes as text regardless of its column type. Going through the
        // executor keeps an empty result set as `None` rather than RowNotFound.
        let row = timeout(
            self.query_timeout,
            Executor::fetch_optional(&mut *conn, sqlx::raw_sql(&self.query)),
        )
        .await
        .map_err(|_| CheckError::QueryTimeout(self.query_timeout))?
        .map_err(CheckError::Query)?;

        row.ok_or(CheckError::NoReplicationStatus)
    }
}

#[async_trait]
impl StatusSource for MysqlStatusFetcher {
    async fn fetch_status(&self) -> Result<ReplicationStatus, CheckError> {
        let mut conn = self.connect().await?;

        let result = self
            .query_first_row(&mut conn)
            .await
            .and_then(|row| status_from_row(&row));

        // A timed-out query leaves the connection mid-response; drop it rather
        // than wait on a server that has stopped answering.
        if matches!(result, Err(CheckError::QueryTimeout(_))) {
            drop(conn);
        } else {
            match timeout(self.query_timeout, conn.close()).await {
                Ok(Ok(())) => {}
                Ok(Err(e)) => {
                    tracing::debug!(error = %e, "Failed to close database connection cleanly")
                }
                Err(_) => tracing::debug!("Timed out closing database connection"),
            }
        }

        result
    }
}

/// Read every column of `row` as text, in result-set order.
fn status_from_row(row: &MySqlRow) -> Result<ReplicationStatus, CheckError> {
    let cells = row
        .columns()
        .iter()
        .map(|column| {
            row.try_get_unchecked::<Option<String>, _>(column.ordinal())
                .map(|raw| (column.name().to_string(), raw))
                .map_err(CheckError::Scan)
        })
        .collect::<Result<Vec<_>, _>>()?;

    tracing::trace!(columns = cells.len(), "Read replication status row");
    Ok(ReplicationStatus::from_text_cells(cells))
}
