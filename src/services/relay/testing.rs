//! In-memory delivery client for router and handler tests.

use super::delivery::{DeliveryClient, DeliveryError};
use crate::models::{SlackPayload, TagBinding};
use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::Mutex;
use std::time::Duration;
use tokio::sync::mpsc;

/// Records every payload it is handed and fails for selected channels
pub struct RecordingClient {
    attempts: Mutex<Vec<SlackPayload>>,
    failing_channels: HashSet<String>,
    notify: mpsc::UnboundedSender<SlackPayload>,
}

impl RecordingClient {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<SlackPayload>) {
        Self::failing_for(&[])
    }

    pub fn failing_for(channels: &[&str]) -> (Self, mpsc::UnboundedReceiver<SlackPayload>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let client = Self {
            attempts: Mutex::new(Vec::new()),
            failing_channels: channels.iter().map(|c| c.to_string()).collect(),
            notify: tx,
        };
        (client, rx)
    }

    pub fn attempts(&self) -> Vec<SlackPayload> {
        self.attempts.lock().unwrap().clone()
    }
}

#[async_trait]
impl DeliveryClient for RecordingClient {
    async fn deliver(&self, payload: &SlackPayload) -> Result<(), DeliveryError> {
        self.attempts.lock().unwrap().push(payload.clone());
        let _ = self.notify.send(payload.clone());

        if self.failing_channels.contains(&payload.channel) {
            return Err(DeliveryError::Status { status: 500 });
        }
        Ok(())
    }

    fn name(&self) -> &'static str {
        "recording"
    }
}

pub fn binding(tag: &str, channel: &str) -> TagBinding {
    TagBinding {
        tag: tag.to_string(),
        channel: channel.to_string(),
        username: None,
        icon_emoji: None,
        parse: None,
    }
}

/// Wait for `n` detached deliveries to reach the client
pub async fn wait_for_attempts(
    rx: &mut mpsc::UnboundedReceiver<SlackPayload>,
    n: usize,
) -> Vec<SlackPayload> {
    let mut received = Vec::with_capacity(n);
    while received.len() < n {
        let payload = tokio::time::timeout(Duration::from_secs(5), rx.recv())
            .await
            .expect("timed out waiting for delivery")
            .expect("delivery channel closed");
        received.push(payload);
    }
    received
}
