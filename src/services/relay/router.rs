//! Tag routing: resolve bindings, build payloads, dispatch deliveries.

use super::delivery::{DeliveryClient, DeliveryError};
use super::registry::DestinationRegistry;
use crate::models::{
    NotifyDirectlyRequest, NotifyRequest, Severity, SlackAttachment, SlackPayload, TagBinding,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{Instrument, Span, debug, error, warn};

/// What a synchronous fan-out does after one destination fails
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncFailurePolicy {
    /// Keep going; every matching destination is counted and attempted
    #[default]
    AttemptAll,
    /// Stop at the first failure; later destinations are neither counted nor attempted
    ShortCircuit,
}

impl SyncFailurePolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            SyncFailurePolicy::AttemptAll => "attempt_all",
            SyncFailurePolicy::ShortCircuit => "short_circuit",
        }
    }
}

/// Outcome of routing one tagged message
#[derive(Debug)]
pub struct RouteResult {
    /// At least one binding carried the tag
    pub matched: bool,
    /// Sync only: every attempted delivery returned success
    pub delivered: bool,
    /// Sync only: the first delivery error, if any
    pub failure: Option<DeliveryError>,
}

/// Outcome of a direct pass-through
#[derive(Debug)]
pub enum DeliveryOutcome {
    /// Sync delivery confirmed by the webhook
    Delivered,
    /// Async delivery handed to a background task
    Scheduled,
    /// Sync delivery failed
    Failed(DeliveryError),
}

impl DeliveryOutcome {
    pub fn is_success(&self) -> bool {
        !matches!(self, DeliveryOutcome::Failed(_))
    }
}

/// Fans messages out to their destinations.
///
/// Cheap to clone; the registry and client are shared.
#[derive(Clone)]
pub struct NotificationRouter {
    registry: Arc<DestinationRegistry>,
    client: Arc<dyn DeliveryClient>,
    policy: SyncFailurePolicy,
}

impl NotificationRouter {
    pub fn new(
        registry: Arc<DestinationRegistry>,
        client: Arc<dyn DeliveryClient>,
        policy: SyncFailurePolicy,
    ) -> Self {
        Self {
            registry,
            client,
            policy,
        }
    }

    pub fn registry(&self) -> &Arc<DestinationRegistry> {
        &self.registry
    }

    pub fn policy(&self) -> SyncFailurePolicy {
        self.policy
    }

    /// Deliver a tagged message to every binding for its tag, in stored order.
    ///
    /// Each matched binding is counted before its delivery is attempted or
    /// scheduled. Async deliveries run on detached tasks and only log their
    /// failures.
    pub async fn route(&self, message: &NotifyRequest) -> RouteResult {
        let mut matched = false;
        let mut failure = None;

        for destination in self.registry.matching(&message.tag) {
            matched = true;
            let count = destination.record_match();
            let binding = destination.binding();
            let payload = build_payload(binding, message);

            if !message.sync {
                debug!(tag = %binding.tag, channel = %binding.channel, count, "scheduling delivery");
                self.spawn_delivery(payload);
                continue;
            }

            match self.client.deliver(&payload).await {
                Ok(()) => {
                    debug!(tag = %binding.tag, channel = %binding.channel, count, "delivered");
                }
                Err(e) => {
                    warn!(
                        tag = %binding.tag,
                        channel = %binding.channel,
                        client = self.client.name(),
                        error = %e,
                        "failed to post message to slack"
                    );
                    failure.get_or_insert(e);
                    if self.policy == SyncFailurePolicy::ShortCircuit {
                        break;
                    }
                }
            }
        }

        RouteResult {
            matched,
            delivered: matched && message.sync && failure.is_none(),
            failure,
        }
    }

    /// Forward a caller-built payload unchanged; no tag lookup, no counting
    pub async fn route_direct(&self, message: NotifyDirectlyRequest) -> DeliveryOutcome {
        if !message.sync {
            self.spawn_delivery(message.payload);
            return DeliveryOutcome::Scheduled;
        }

        match self.client.deliver(&message.payload).await {
            Ok(()) => DeliveryOutcome::Delivered,
            Err(e) => {
                warn!(
                    channel = %message.payload.channel,
                    client = self.client.name(),
                    error = %e,
                    "failed to post message to slack"
                );
                DeliveryOutcome::Failed(e)
            }
        }
    }

    /// Detached delivery; the task outlives the request that started it
    fn spawn_delivery(&self, payload: SlackPayload) {
        let client = Arc::clone(&self.client);
        tokio::spawn(
            async move {
                if let Err(e) = client.deliver(&payload).await {
                    error!(
                        channel = %payload.channel,
                        client = client.name(),
                        error = %e,
                        "failed to post message to slack"
                    );
                }
            }
            .instrument(Span::current()),
        );
    }
}

/// Payload for one binding: the binding supplies the addressing, the message
/// supplies the body. A recognised level moves the text into a colored
/// attachment.
pub(crate) fn build_payload(binding: &TagBinding, message: &NotifyRequest) -> SlackPayload {
    let mut payload = SlackPayload {
        channel: binding.channel.clone(),
        username: binding.username.clone(),
        icon_emoji: binding.icon_emoji.clone(),
        text: message.text.clone(),
        parse: binding.parse.clone(),
        attachments: Vec::new(),
    };

    if let Some(severity) = message.level.as_deref().and_then(Severity::from_level) {
        payload.attachments.push(SlackAttachment::colored(
            severity.color(),
            std::mem::take(&mut payload.text),
        ));
    }

    payload
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::relay::testing::{RecordingClient, binding, wait_for_attempts};
    use proptest::prelude::*;

    fn router_with(
        bindings: Vec<TagBinding>,
        client: Arc<RecordingClient>,
        policy: SyncFailurePolicy,
    ) -> NotificationRouter {
        NotificationRouter::new(
            Arc::new(DestinationRegistry::new(bindings)),
            client,
            policy,
        )
    }

    fn message(tag: &str, text: &str, sync: bool) -> NotifyRequest {
        NotifyRequest {
            tag: tag.to_string(),
            text: text.to_string(),
            sync,
            ..Default::default()
        }
    }

    fn counts(router: &NotificationRouter) -> Vec<u64> {
        router.registry().snapshot().iter().map(|s| s.count).collect()
    }

    #[test]
    fn test_build_payload_copies_binding_fields() {
        let binding = TagBinding {
            tag: "deploy".to_string(),
            channel: "#ops".to_string(),
            username: Some("deploy-bot".to_string()),
            icon_emoji: Some(":rocket:".to_string()),
            parse: Some("full".to_string()),
        };

        let payload = build_payload(&binding, &message("deploy", "v1.2 shipped", false));
        assert_eq!(payload.channel, "#ops");
        assert_eq!(payload.username.as_deref(), Some("deploy-bot"));
        assert_eq!(payload.icon_emoji.as_deref(), Some(":rocket:"));
        assert_eq!(payload.parse.as_deref(), Some("full"));
        assert_eq!(payload.text, "v1.2 shipped");
        assert!(payload.attachments.is_empty());
    }

    #[test]
    fn test_build_payload_moves_text_into_severity_attachment() {
        let mut request = message("alerts", "disk full", true);
        request.level = Some("crit".to_string());

        let payload = build_payload(&binding("alerts", "#alerts"), &request);
        assert_eq!(payload.text, "");
        assert_eq!(
            payload.attachments,
            vec![SlackAttachment::colored("#ff0000", "disk full")]
        );
    }

    #[test]
    fn test_build_payload_ignores_unknown_level() {
        let mut request = message("alerts", "disk full", true);
        request.level = Some("fatal".to_string());

        let payload = build_payload(&binding("alerts", "#alerts"), &request);
        assert_eq!(payload.text, "disk full");
        assert!(payload.attachments.is_empty());
    }

    #[tokio::test]
    async fn test_sync_route_delivers_in_binding_order() {
        let (client, _rx) = RecordingClient::new();
        let client = Arc::new(client);
        let router = router_with(
            vec![
                binding("deploy", "#deploy"),
                binding("alerts", "#alerts"),
                binding("deploy", "#ops"),
            ],
            client.clone(),
            SyncFailurePolicy::AttemptAll,
        );

        let result = router.route(&message("deploy", "shipped", true)).await;

        assert!(result.matched);
        assert!(result.delivered);
        assert!(result.failure.is_none());
        let channels: Vec<_> = client.attempts().into_iter().map(|p| p.channel).collect();
        assert_eq!(channels, vec!["#deploy", "#ops"]);
        assert_eq!(counts(&router), vec![1, 0, 1]);
    }

    #[tokio::test]
    async fn test_unmatched_tag_touches_nothing() {
        let (client, _rx) = RecordingClient::new();
        let client = Arc::new(client);
        let router = router_with(
            vec![binding("alerts", "#alerts")],
            client.clone(),
            SyncFailurePolicy::AttemptAll,
        );

        let result = router.route(&message("missing", "hello", true)).await;

        assert!(!result.matched);
        assert!(!result.delivered);
        assert!(client.attempts().is_empty());
        assert_eq!(counts(&router), vec![0]);
    }

    #[tokio::test]
    async fn test_attempt_all_continues_after_failure() {
        let (client, _rx) = RecordingClient::failing_for(&["#first"]);
        let client = Arc::new(client);
        let router = router_with(
            vec![binding("t", "#first"), binding("t", "#second")],
            client.clone(),
            SyncFailurePolicy::AttemptAll,
        );

        let result = router.route(&message("t", "x", true)).await;

        assert!(result.matched);
        assert!(!result.delivered);
        assert!(matches!(
            result.failure,
            Some(DeliveryError::Status { status: 500 })
        ));
        assert_eq!(client.attempts().len(), 2);
        assert_eq!(counts(&router), vec![1, 1]);
    }

    #[tokio::test]
    async fn test_short_circuit_stops_at_first_failure() {
        let (client, _rx) = RecordingClient::failing_for(&["#first"]);
        let client = Arc::new(client);
        let router = router_with(
            vec![binding("t", "#first"), binding("t", "#second")],
            client.clone(),
            SyncFailurePolicy::ShortCircuit,
        );

        let result = router.route(&message("t", "x", true)).await;

        assert!(result.matched);
        assert!(!result.delivered);
        assert_eq!(client.attempts().len(), 1);
        assert_eq!(counts(&router), vec![1, 0]);
    }

    #[tokio::test]
    async fn test_async_route_counts_before_delivery_completes() {
        let (client, mut rx) = RecordingClient::failing_for(&["#alerts"]);
        let client = Arc::new(client);
        let router = router_with(
            vec![binding("alerts", "#alerts"), binding("alerts", "#pager")],
            client.clone(),
            SyncFailurePolicy::AttemptAll,
        );

        let result = router.route(&message("alerts", "cpu hot", false)).await;

        assert!(result.matched);
        assert!(!result.delivered);
        assert_eq!(counts(&router), vec![1, 1]);

        let mut channels: Vec<_> = wait_for_attempts(&mut rx, 2)
            .await
            .into_iter()
            .map(|p| p.channel)
            .collect();
        channels.sort();
        assert_eq!(channels, vec!["#alerts", "#pager"]);
    }

    #[tokio::test]
    async fn test_route_direct_sync_outcomes() {
        let (client, _rx) = RecordingClient::failing_for(&["#broken"]);
        let client = Arc::new(client);
        let router = router_with(
            vec![binding("alerts", "#alerts")],
            client.clone(),
            SyncFailurePolicy::AttemptAll,
        );

        let ok = NotifyDirectlyRequest {
            payload: SlackPayload {
                channel: "#random".to_string(),
                text: "hi".to_string(),
                ..Default::default()
            },
            sync: true,
        };
        assert!(matches!(
            router.route_direct(ok.clone()).await,
            DeliveryOutcome::Delivered
        ));

        let mut broken = ok;
        broken.payload.channel = "#broken".to_string();
        let outcome = router.route_direct(broken).await;
        assert!(!outcome.is_success());
        assert!(matches!(
            outcome,
            DeliveryOutcome::Failed(DeliveryError::Status { status: 500 })
        ));

        assert_eq!(client.attempts()[0].text, "hi");
        assert_eq!(counts(&router), vec![0]);
    }

    #[tokio::test]
    async fn test_route_direct_async_is_scheduled() {
        let (client, mut rx) = RecordingClient::failing_for(&["#broken"]);
        let router = router_with(Vec::new(), Arc::new(client), SyncFailurePolicy::AttemptAll);

        let outcome = router
            .route_direct(NotifyDirectlyRequest {
                payload: SlackPayload {
                    channel: "#broken".to_string(),
                    ..Default::default()
                },
                sync: false,
            })
            .await;

        assert!(outcome.is_success());
        assert_eq!(wait_for_attempts(&mut rx, 1).await[0].channel, "#broken");
    }

    #[test]
    fn test_policy_deserializes_snake_case() {
        let policy: SyncFailurePolicy = serde_json::from_str("\"short_circuit\"").unwrap();
        assert_eq!(policy, SyncFailurePolicy::ShortCircuit);
        assert_eq!(SyncFailurePolicy::default().as_str(), "attempt_all");
    }

    proptest! {
        #[test]
        fn test_sync_fan_out_counts_every_binding(n in 0usize..12, others in 0usize..5) {
            let rt = tokio::runtime::Builder::new_current_thread().enable_all().build().unwrap();
            rt.block_on(async {
                let (client, _rx) = RecordingClient::new();
                let client = Arc::new(client);

                let mut bindings: Vec<_> =
                    (0..n).map(|i| binding("hot", &format!("#c{}", i))).collect();
                bindings.extend((0..others).map(|i| binding("cold", &format!("#o{}", i))));
                let router = router_with(bindings, client.clone(), SyncFailurePolicy::AttemptAll);

                let result = router.route(&message("hot", "x", true)).await;

                prop_assert_eq!(result.matched, n > 0);
                prop_assert_eq!(client.attempts().len(), n);
                let snapshot = router.registry().snapshot();
                prop_assert_eq!(snapshot.iter().filter(|s| s.count == 1).count(), n);
                prop_assert!(snapshot.iter().filter(|s| s.tag == "cold").all(|s| s.count == 0));
                Ok(())
            })?;
        }
    }
}
