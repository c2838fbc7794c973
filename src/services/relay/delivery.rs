//! Delivery of a finished payload to the Slack incoming webhook.

use crate::config::SlackConfig;
use crate::external::client::HTTP_CLIENT;
use crate::models::SlackPayload;
use async_trait::async_trait;
use reqwest::StatusCode;
use reqwest::header::CONTENT_TYPE;
use std::time::Duration;
use thiserror::Error;

/// Why a single delivery attempt failed
#[derive(Debug, Error)]
pub enum DeliveryError {
    #[error("failed to encode payload: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("failed to reach slack: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("Slack is not available: {status}")]
    Status { status: u16 },
}

/// Sends one payload, one attempt, no retries.
///
/// `async_trait` keeps the trait object-safe so the router can hold an
/// `Arc<dyn DeliveryClient>`.
#[async_trait]
pub trait DeliveryClient: Send + Sync {
    /// Post the payload; `Ok` only when the endpoint answered 200
    async fn deliver(&self, payload: &SlackPayload) -> Result<(), DeliveryError>;

    /// Client name for logging
    fn name(&self) -> &'static str;
}

/// Posts payloads as JSON to the configured webhook URL.
///
/// Uses the shared `HTTP_CLIENT`, so connections are pooled across calls.
pub struct SlackWebhookClient {
    webhook_url: String,
    timeout: Duration,
}

impl SlackWebhookClient {
    pub fn new(config: &SlackConfig) -> Self {
        Self {
            webhook_url: config.webhook_url.clone(),
            timeout: Duration::from_secs(config.timeout),
        }
    }

    pub fn webhook_url(&self) -> &str {
        &self.webhook_url
    }
}

#[async_trait]
impl DeliveryClient for SlackWebhookClient {
    async fn deliver(&self, payload: &SlackPayload) -> Result<(), DeliveryError> {
        let body = serde_json::to_vec(payload)?;

        let response = HTTP_CLIENT
            .post(&self.webhook_url)
            .timeout(self.timeout)
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await
            .map_err(DeliveryError::Transport)?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(DeliveryError::Status {
                status: status.as_u16(),
            });
        }

        Ok(())
    }

    fn name(&self) -> &'static str {
        "slack-webhook"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SlackAttachment;
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(url: String) -> SlackWebhookClient {
        SlackWebhookClient::new(&SlackConfig {
            webhook_url: url,
            timeout: 5,
        })
    }

    fn payload() -> SlackPayload {
        SlackPayload {
            channel: "#alerts".to_string(),
            username: Some("slackboard".to_string()),
            text: String::new(),
            attachments: vec![SlackAttachment::colored("#ff0000", "disk full")],
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_deliver_posts_json_payload() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/services/hook"))
            .and(header("content-type", "application/json"))
            .and(body_json(json!({
                "channel": "#alerts",
                "username": "slackboard",
                "text": "",
                "attachments": [{
                    "fallback": "", "color": "#ff0000", "pretext": "",
                    "author_name": "", "author_link": "", "author_icon": "",
                    "title": "", "title_link": "", "text": "disk full",
                    "fields": [], "image_url": "", "thumb_url": ""
                }]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = client_for(format!("{}/services/hook", mock_server.uri()));
        client.deliver(&payload()).await.expect("delivery should succeed");
    }

    #[tokio::test]
    async fn test_deliver_reports_non_ok_status() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500).set_body_string("no_service"))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = client_for(mock_server.uri());
        let err = client.deliver(&payload()).await.unwrap_err();
        assert!(matches!(err, DeliveryError::Status { status: 500 }));
        assert!(err.to_string().contains("500"));
    }

    #[tokio::test]
    async fn test_deliver_treats_other_success_codes_as_failure() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(204))
            .mount(&mock_server)
            .await;

        let client = client_for(mock_server.uri());
        let err = client.deliver(&payload()).await.unwrap_err();
        assert!(matches!(err, DeliveryError::Status { status: 204 }));
    }

    #[tokio::test]
    async fn test_deliver_reports_transport_errors() {
        // Nothing listens on port 9 of the loopback interface
        let client = client_for("http://127.0.0.1:9/hook".to_string());
        let err = client.deliver(&payload()).await.unwrap_err();
        assert!(matches!(err, DeliveryError::Transport(_)));
    }

    #[test]
    fn test_client_metadata() {
        let client = client_for("https://hooks.slack.com/services/T/B/X".to_string());
        assert_eq!(client.name(), "slack-webhook");
        assert_eq!(client.webhook_url(), "https://hooks.slack.com/services/T/B/X");
    }
}
