//! replcheck - MySQL replica health check over HTTP
//!
//! Answers a load balancer's health check with `200 OK` when the replica's I/O and SQL
//! threads are running and `Seconds_Behind_Master` is within the configured
//! limit, and with a `500` explaining the problem otherwise.

pub mod config;
pub mod error;
pub mod evaluator;
pub mod fetcher;
pub mod http;
pub mod middleware;
pub mod routes;
pub mod state;
pub mod status;

pub use config::{AppConfig, ConfigError};
pub use error::CheckError;
pub use evaluator::{evaluate, HealthVerdict};
pub use fetcher::{MysqlStatusFetcher, StatusSource};
pub use routes::create_router;
pub use state::AppState;
pub use status::{ReplicationStatus, StatusValue};
