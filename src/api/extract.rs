//! Request extractors for the relay endpoints.

use crate::error::{AppError, AppResult};
use axum::body::to_bytes;
use axum::extract::{FromRequest, FromRequestParts, Request};
use axum::http::{Method, Version, header, request::Parts};
use serde::de::DeserializeOwned;
use std::convert::Infallible;
use validator::Validate;

/// Upper bound on an inbound body; larger bodies fail as unreadable
pub const MAX_BODY_BYTES: usize = 4 * 1024 * 1024;

/// JSON body of a relay endpoint, checked in a fixed order:
/// method, body read, JSON decode, field validation.
///
/// Unlike `axum::Json` it ignores `Content-Type`, and a wrong method is
/// rejected before the body is touched.
#[derive(Debug, Clone, Copy, Default)]
pub struct RelayJson<T>(pub T);

impl<T, S> FromRequest<S> for RelayJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, _state: &S) -> AppResult<Self> {
        if req.method() != Method::POST {
            return Err(AppError::InvalidMethod {
                method: req.method().to_string(),
            });
        }

        let bytes = to_bytes(req.into_body(), MAX_BODY_BYTES)
            .await
            .map_err(|source| AppError::ReadBody { source })?;

        let value: T =
            serde_json::from_slice(&bytes).map_err(|source| AppError::MalformedBody { source })?;
        value.validate()?;

        Ok(RelayJson(value))
    }
}

/// Request line details for the access log
#[derive(Debug, Clone)]
pub struct AccessInfo {
    pub method: Method,
    pub path: String,
    pub version: Version,
    pub content_length: u64,
}

impl<S> FromRequestParts<S> for AccessInfo
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let content_length = parts
            .headers
            .get(header::CONTENT_LENGTH)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse().ok())
            .unwrap_or(0);

        Ok(AccessInfo {
            method: parts.method.clone(),
            path: parts.uri.path().to_string(),
            version: parts.version,
            content_length,
        })
    }
}
