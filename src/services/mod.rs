//! Service layer for relay operations.
//!
//! Services encapsulate routing and delivery and are shared with the
//! handlers through `AppState`.

pub mod relay;

pub use relay::NotificationRouter;
