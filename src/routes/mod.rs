//! HTTP routes.
//!
//! The service answers a single question, so `/` and every other path share
//! the replication handler for any method, mirroring how load balancers are
//! usually pointed at an arbitrary check URL. Responses are marked `no-store`.
//!
//! Request tracing is enabled via middleware that generates a unique request ID
//! for each request, allowing correlation of all logs within a check.

pub mod health;

use axum::{middleware, routing::any, Router};
use http::header::{HeaderValue, CACHE_CONTROL};
use tower_http::set_header::SetResponseHeaderLayer;

use crate::config::CACHE_CONTROL_HEALTH;
use crate::middleware::request_id_layer;
use crate::state::AppState;

/// Creates the Axum router for the health check.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", any(health::replication))
        .fallback(health::replication)
        .with_state(state)
        .layer(SetResponseHeaderLayer::overriding(
            CACHE_CONTROL,
            HeaderValue::from_static(CACHE_CONTROL_HEALTH),
        ))
        // Request ID middleware - creates root span with request_id for correlation
        .layer(middleware::from_fn(request_id_layer))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::{Method, Request, StatusCode};
    use tower::ServiceExt;

    use crate::config::AppConfig;
    use crate::error::CheckError;
    use crate::fetcher::StatusSource;
    use crate::middleware::REQUEST_ID_HEADER;
    use crate::status::ReplicationStatus;

    type Cells = Vec<(&'static str, Option<&'static str>)>;

    enum FakeStatus {
        Row(Cells),
        NoRows,
        Unreachable,
    }

    #[async_trait]
    impl StatusSource for FakeStatus {
        async fn fetch_status(&self) -> Result<ReplicationStatus, CheckError> {
            match self {
                FakeStatus::Row(cells) => Ok(ReplicationStatus::from_text_cells(cells.clone())),
                FakeStatus::NoRows => Err(CheckError::NoReplicationStatus),
                FakeStatus::Unreachable => {
                    Err(CheckError::ConnectionTimeout(Duration::from_secs(3)))
                }
            }
        }
    }

    fn row(io: &'static str, sql: &'static str, lag: Option<&'static str>) -> FakeStatus {
        FakeStatus::Row(vec![
            ("Slave_IO_State", Some("Waiting for master to send event")),
            ("Master_Host", Some("10.0.0.1")),
            ("Slave_IO_Running", Some(io)),
            ("Slave_SQL_Running", Some(sql)),
            ("Seconds_Behind_Master", lag),
        ])
    }

    fn router(source: FakeStatus, lag_limit: i64) -> Router {
        let mut config = AppConfig::default();
        config.replication.lag_limit_seconds = lag_limit;
        create_router(AppState::with_source(config, source))
    }

    async fn send(app: Router, method: Method, uri: &str) -> (StatusCode, String) {
        let response = app
            .oneshot(
                Request::builder()
                    .method(method)
                    .uri(uri)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, String::from_utf8(body.to_vec()).unwrap())
    }

    async fn get_root(app: Router) -> (StatusCode, String) {
        send(app, Method::GET, "/").await
    }

    #[tokio::test]
    async fn test_healthy_replica_is_ok() {
        let (status, body) = get_root(router(row("Yes", "Yes", Some("3")), 5)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "OK");
    }

    #[tokio::test]
    async fn test_stopped_io_thread_is_500() {
        let (status, body) = get_root(router(row("No", "Yes", Some("0")), 5)).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body.contains("Slave is not running."));
    }

    #[tokio::test]
    async fn test_lag_over_limit_is_500() {
        let (status, body) = get_root(router(row("Yes", "Yes", Some("10")), 5)).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body.contains("Replication lag exceeds the limit of 5"));
    }

    #[tokio::test]
    async fn test_lag_at_limit_is_ok() {
        let (status, _) = get_root(router(row("Yes", "Yes", Some("5")), 5)).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_no_rows_is_500() {
        let (status, body) = get_root(router(FakeStatus::NoRows, 5)).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body.contains("No slave status"));
    }

    #[tokio::test]
    async fn test_null_lag_is_shape_error_not_ok() {
        let (status, body) = get_root(router(row("Yes", "Yes", None), 5)).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body.starts_with("Invalid replication status"));
        assert!(body.contains("Seconds_Behind_Master"));
    }

    #[tokio::test]
    async fn test_unreachable_database_is_500() {
        let (status, body) = get_root(router(FakeStatus::Unreachable, 5)).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body.contains("timed out"));
    }

    #[tokio::test]
    async fn test_any_path_and_method_runs_the_check() {
        let (status, body) =
            send(router(row("Yes", "Yes", Some("0")), 5), Method::GET, "/status").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "OK");

        let (status, _) = send(router(row("Yes", "No", Some("0")), 5), Method::POST, "/").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_responses_are_not_cacheable_and_carry_request_id() {
        let app = router(row("Yes", "Yes", Some("0")), 5);
        let response = app
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.headers()[CACHE_CONTROL], "no-store");
        let request_id = response.headers()[&REQUEST_ID_HEADER].to_str().unwrap();
        assert!(uuid::Uuid::parse_str(request_id).is_ok());
    }

    struct CountingStatus(AtomicUsize);

    #[async_trait]
    impl StatusSource for CountingStatus {
        async fn fetch_status(&self) -> Result<ReplicationStatus, CheckError> {
            self.0.fetch_add(1, Ordering::SeqCst);
            Err(CheckError::NoReplicationStatus)
        }
    }

    #[tokio::test]
    async fn test_every_request_fetches_fresh_status() {
        let source = Arc::new(CountingStatus(AtomicUsize::new(0)));
        let state = AppState {
            config: Arc::new(AppConfig::default()),
            status: source.clone(),
        };
        let app = create_router(state);

        for _ in 0..3 {
            let (status, _) = get_root(app.clone()).await;
            assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        }
        assert_eq!(source.0.load(Ordering::SeqCst), 3);
    }
}
