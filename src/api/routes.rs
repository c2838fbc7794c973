//! Router configuration for the API.

use axum::{Router, middleware};

use crate::api::handlers;
use crate::api::middleware::{logging_middleware, request_id_middleware};
use crate::state::AppState;

/// Creates the main application router with all routes and middleware.
///
/// # Middleware Order
/// Middleware is applied in reverse order of declaration (last added runs first):
/// 1. Request ID middleware (runs first) - generates/propagates request IDs
/// 2. Logging middleware (runs second) - opens the request span
///
/// # Routes
/// - `/notify`, `/notify-directly` - relay endpoints (any method, POST enforced by the extractor)
/// - `GET /status` - destination registry snapshot
/// - `GET /health/live` - liveness probe
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .merge(handlers::notify::notify_routes())
        .merge(handlers::status::status_routes())
        .merge(handlers::health::health_routes())
        .layer(middleware::from_fn(logging_middleware))
        .layer(middleware::from_fn(request_id_middleware))
        .with_state(state)
}
