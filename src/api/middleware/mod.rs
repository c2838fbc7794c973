//! Middleware components for request processing.
//!
//! This module contains middleware for request ID tracking and request
//! logging, plus the plain-text error mapping.

mod error_handler;
mod logging;
mod request_id;

pub use logging::logging_middleware;
pub use request_id::{REQUEST_ID_HEADER, RequestId, request_id_middleware};
