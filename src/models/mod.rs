//! Data carried through the relay: inbound requests, tag bindings and the
//! outbound Slack payload.

mod notify;
mod slack;
mod tag;

pub use notify::{NotifyDirectlyRequest, NotifyRequest};
pub use slack::{SlackAttachment, SlackAttachmentField, SlackPayload};
pub use tag::{Severity, TagBinding};

use serde::{Deserialize, Deserializer};

/// Explicit `null` decodes to the zero value, same as an absent field
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
