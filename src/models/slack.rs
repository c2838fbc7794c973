//! Outbound Slack incoming-webhook payload.
//!
//! Field names and omission rules follow the webhook's JSON contract:
//! `username`, `icon_emoji` and `parse` are left out when empty, everything
//! else is always serialized.

use super::null_as_default;
use serde::{Deserialize, Serialize};

/// One message posted to the webhook
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SlackPayload {
    #[serde(deserialize_with = "null_as_default")]
    pub channel: String,

    /// Display name the message is posted under
    #[serde(skip_serializing_if = "is_blank")]
    pub username: Option<String>,

    #[serde(skip_serializing_if = "is_blank")]
    pub icon_emoji: Option<String>,

    #[serde(deserialize_with = "null_as_default")]
    pub text: String,

    /// Text-parsing mode, e.g. `full` or `none`
    #[serde(skip_serializing_if = "is_blank")]
    pub parse: Option<String>,

    #[serde(deserialize_with = "null_as_default")]
    pub attachments: Vec<SlackAttachment>,
}

/// Structured, colored block attached to a message
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SlackAttachment {
    #[serde(deserialize_with = "null_as_default")]
    pub fallback: String,
    #[serde(deserialize_with = "null_as_default")]
    pub color: String,
    #[serde(deserialize_with = "null_as_default")]
    pub pretext: String,

    #[serde(deserialize_with = "null_as_default")]
    pub author_name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub author_link: String,
    #[serde(deserialize_with = "null_as_default")]
    pub author_icon: String,

    #[serde(deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(deserialize_with = "null_as_default")]
    pub title_link: String,
    #[serde(deserialize_with = "null_as_default")]
    pub text: String,

    #[serde(deserialize_with = "null_as_default")]
    pub fields: Vec<SlackAttachmentField>,

    #[serde(deserialize_with = "null_as_default")]
    pub image_url: String,
    #[serde(deserialize_with = "null_as_default")]
    pub thumb_url: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SlackAttachmentField {
    #[serde(deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(deserialize_with = "null_as_default")]
    pub value: String,
    #[serde(deserialize_with = "null_as_default")]
    pub short: bool,
}

impl SlackAttachment {
    /// Attachment carrying only a color and a body, used for severity levels
    pub fn colored(color: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            color: color.into(),
            text: text.into(),
            ..Default::default()
        }
    }
}

fn is_blank(value: &Option<String>) -> bool {
    value.as_deref().is_none_or(str::is_empty)
}
