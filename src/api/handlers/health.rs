//! Health check endpoint handlers.

use crate::state::AppState;
use axum::{Router, http::StatusCode, routing::get};

/// Creates health check routes.
///
/// # Routes
/// - `GET /health/live` - Liveness probe
pub fn health_routes() -> Router<AppState> {
    Router::new().route("/health/live", get(liveness_check))
}

/// Liveness probe endpoint.
///
/// The relay has no dependency worth probing: the webhook is only reached
/// on demand. If we can respond, we're alive.
pub async fn liveness_check() -> StatusCode {
    StatusCode::OK
}
