//! Notification relay: tag bindings, fan-out and webhook delivery.
//!
//! The registry is built once from configuration. The router resolves a
//! tag against it, counts each match, and hands payloads to a
//! [`DeliveryClient`], either inline (sync) or on a detached task (async).

mod delivery;
mod registry;
mod router;

#[cfg(test)]
pub(crate) mod testing;

pub use delivery::{DeliveryClient, DeliveryError, SlackWebhookClient};
pub use registry::{Destination, DestinationRegistry, DestinationStatus};
pub use router::{DeliveryOutcome, NotificationRouter, RouteResult, SyncFailurePolicy};
