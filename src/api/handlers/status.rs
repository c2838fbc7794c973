//! Read-only introspection of the destination registry.

use crate::services::relay::DestinationStatus;
use crate::state::AppState;
use axum::{Json, Router, extract::State, routing::get};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub name: String,
    pub version: String,
    pub sync_failure_policy: &'static str,
    /// Bindings in stored order with their delivery counts
    pub destinations: Vec<DestinationStatus>,
}

pub fn status_routes() -> Router<AppState> {
    Router::new().route("/status", get(status))
}

pub async fn status(State(state): State<AppState>) -> Json<StatusResponse> {
    Json(StatusResponse {
        name: state.settings.application.name.clone(),
        version: state.settings.application.version.clone(),
        sync_failure_policy: state.router.policy().as_str(),
        destinations: state.router.registry().snapshot(),
    })
}
