//! API module for HTTP handlers, middleware, and extractors.
//!
//! This module provides the HTTP layer of the relay: the notify endpoints,
//! status and health probes, request-id and access logging middleware.

pub mod extract;
pub mod handlers;
pub mod middleware;
pub mod routes;
