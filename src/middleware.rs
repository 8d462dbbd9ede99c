//! Request ID middleware for correlating health check logs.
//!
//! Each request gets a UUID v4, a tracing span covering the whole check, and an
//! `x-request-id` response header so a load balancer's access log can be
//! matched against ours.

use std::time::Instant;

use axum::{
    extract::Request,
    http::{HeaderName, HeaderValue},
    middleware::Next,
    response::Response,
};
use tracing::Instrument;
use uuid::Uuid;

pub static REQUEST_ID_HEADER: HeaderName = HeaderName::from_static("x-request-id");

/// Middleware that generates a request ID and wraps the request in a span.
///
/// Must be the outermost layer so the span covers the status fetch.
pub async fn request_id_layer(request: Request, next: Next) -> Response {
    let request_id = Uuid::new_v4();

    let span = tracing::info_span!(
        "request",
        request_id = %request_id,
        method = %request.method(),
        path = %request.uri().path(),
        duration_ms = tracing::field::Empty,
    );

    let start = Instant::now();

    async move {
        let mut response = next.run(request).await;
        let duration_ms = start.elapsed().as_millis() as u64;
        let status = response.status().as_u16();

        tracing::Span::current().record("duration_ms", duration_ms);
        // Healthy checks arrive every few seconds; keep them out of info logs
        if response.status().is_success() {
            tracing::debug!(status, duration_ms, "Request completed");
        } else {
            tracing::info!(status, duration_ms, "Request completed");
        }

        if let Ok(value) = HeaderValue::from_str(&request_id.to_string()) {
            response
                .headers_mut()
                .insert(REQUEST_ID_HEADER.clone(), value);
        }

        response
    }
    .instrument(span)
    .await
}
