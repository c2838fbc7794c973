//! Error handler for converting AppError to HTTP responses.
//!
//! Relay callers are shell scripts and cron jobs, so every error is a
//! fixed plain-text body rather than a JSON document.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use tracing::error;

use crate::error::AppError;

impl AppError {
    /// Status code and plain-text body for this error
    pub fn status_and_body(&self) -> (StatusCode, String) {
        match self {
            AppError::InvalidMethod { .. } => (StatusCode::BAD_REQUEST, "invalid method".into()),
            AppError::ReadBody { .. } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "failed to read request-body".into(),
            ),
            AppError::MalformedBody { .. } => {
                (StatusCode::BAD_REQUEST, "Request-body is malformed".into())
            }
            AppError::Validation { reason, .. } => (StatusCode::BAD_REQUEST, reason.clone()),
            AppError::TagNotFound { tag } => {
                (StatusCode::BAD_REQUEST, format!("tag:{} is not found", tag))
            }
            AppError::DeliveryFailed { .. } => (
                StatusCode::BAD_GATEWAY,
                "failed to post message to slack".into(),
            ),
            AppError::Internal { .. } => {
                (StatusCode::INTERNAL_SERVER_ERROR, "internal error".into())
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = self.status_and_body();

        if status.is_server_error() {
            error!(status = status.as_u16(), error = ?self, "request failed");
        }

        (status, body).into_response()
    }
}
