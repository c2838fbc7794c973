//! Inbound request bodies of the relay endpoints.
//!
//! Decoding is lenient: absent or `null` fields take their zero value,
//! mirroring the behaviour existing senders rely on.

use serde::{Deserialize, Serialize};
use validator::Validate;

use super::null_as_default;
use super::slack::SlackPayload;

/// Body of `POST /notify`: a message routed by tag
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct NotifyRequest {
    #[serde(default, deserialize_with = "null_as_default")]
    #[validate(length(min = 1, message = "tag is required"))]
    pub tag: String,

    /// Host the message originates from, logged but not forwarded
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,

    #[serde(default, deserialize_with = "null_as_default")]
    pub text: String,

    /// Wait for the webhook's answer before responding
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "std::ops::Not::not"
    )]
    pub sync: bool,

    /// Severity level: `info`, `warn` or `crit`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<String>,
}

/// Body of `POST /notify-directly`: a complete payload, no tag resolution
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct NotifyDirectlyRequest {
    #[serde(default, deserialize_with = "null_as_default")]
    pub payload: SlackPayload,

    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "std::ops::Not::not"
    )]
    pub sync: bool,
}
