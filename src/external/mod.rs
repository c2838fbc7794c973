//! Outbound HTTP: the shared client and the relay's own API client.

pub mod client;
pub mod relay_client;

pub use relay_client::{RelayClient, RelayClientError};
