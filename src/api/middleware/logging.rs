//! Logging middleware for request/response tracing.
//!
//! Wraps each request in an `http_request` span carrying the request ID, so
//! handler logs and detached delivery logs can be correlated.

use axum::{extract::Request, middleware::Next, response::Response};
use std::time::Instant;
use tracing::{Instrument, debug, info_span};

use super::RequestId;

/// Middleware that logs request and response information.
///
/// Logs the method and path on arrival and the status code and duration
/// once the response is ready.
pub async fn logging_middleware(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();
    let request_id = request
        .extensions()
        .get::<RequestId>()
        .map(|r| r.0.clone())
        .unwrap_or_else(|| "unknown".to_string());

    let span = info_span!(
        "http_request",
        method = %method,
        uri = %uri,
        request_id = %request_id
    );

    async move {
        debug!(method = %method, path = %uri.path(), "Request received");

        let start = Instant::now();
        let response = next.run(request).await;

        debug!(
            status = %response.status().as_u16(),
            duration_ms = %start.elapsed().as_millis(),
            "Response sent"
        );
        response
    }
    .instrument(span)
    .await
}
