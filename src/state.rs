//! Application state for Axum web framework.
//!
//! Holds the notification router and the settings snapshot shared by all
//! request handlers.

use std::sync::Arc;

use crate::config::Settings;
use crate::services::NotificationRouter;
use crate::services::relay::{DeliveryClient, DestinationRegistry, SlackWebhookClient};

/// Application state shared with every handler.
///
/// Cloning is cheap: the router and settings sit behind `Arc`s.
#[derive(Clone)]
pub struct AppState {
    /// Tag routing and webhook delivery
    pub router: NotificationRouter,
    /// Immutable configuration snapshot taken at startup
    pub settings: Arc<Settings>,
}

impl AppState {
    /// Builds the registry from `settings.tags` and delivers through the
    /// configured Slack webhook.
    pub fn new(settings: Settings) -> Self {
        let client = Arc::new(SlackWebhookClient::new(&settings.slack));
        Self::with_client(settings, client)
    }

    /// Same as [`AppState::new`] with a caller-supplied delivery client
    pub fn with_client(settings: Settings, client: Arc<dyn DeliveryClient>) -> Self {
        let registry = Arc::new(DestinationRegistry::new(settings.tags.iter().cloned()));
        let router =
            NotificationRouter::new(registry, client, settings.relay.sync_failure_policy);

        Self {
            router,
            settings: Arc::new(settings),
        }
    }
}
