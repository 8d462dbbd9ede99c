//! Shared application state for request handlers.

use std::sync::Arc;

use crate::config::AppConfig;
use crate::fetcher::{MysqlStatusFetcher, StatusSource};

/// Shared application state, cloneable across handlers via Arc-wrapped fields.
///
/// Holds the immutable configuration and the source of replication status.
/// Nothing here is mutated after startup.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub status: Arc<dyn StatusSource>,
}

impl AppState {
    /// Creates state backed by a MySQL fetcher built from `config`.
    pub fn new(config: AppConfig) -> Self {
        let fetcher = MysqlStatusFetcher::new(&config.mysql);
        Self::with_source(config, fetcher)
    }

    /// Creates state around an arbitrary status source.
    pub fn with_source<S: StatusSource + 'static>(config: AppConfig, source: S) -> Self {
        Self {
            config: Arc::new(config),
            status: Arc::new(source),
        }
    }
}
