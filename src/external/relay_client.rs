//! Client for a running relay, used by the `send` command.

use super::client::HTTP_CLIENT;
use crate::models::NotifyRequest;
use reqwest::StatusCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RelayClientError {
    #[error("failed to reach relay at {url}: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("relay answered {status}: {body}")]
    Rejected { status: u16, body: String },
}

/// Posts tagged messages to `http://<server>/notify`
#[derive(Debug, Clone)]
pub struct RelayClient {
    notify_url: String,
}

impl RelayClient {
    /// `server` is `host:port`; a scheme prefix is accepted as-is
    pub fn new(server: &str) -> Self {
        let base = if server.starts_with("http://") || server.starts_with("https://") {
            server.trim_end_matches('/').to_string()
        } else {
            format!("http://{}", server.trim_end_matches('/'))
        };
        Self {
            notify_url: format!("{}/notify", base),
        }
    }

    pub fn notify_url(&self) -> &str {
        &self.notify_url
    }

    /// Send one message; anything but 200 is an error carrying the body
    pub async fn notify(&self, request: &NotifyRequest) -> Result<String, RelayClientError> {
        let transport = |source| RelayClientError::Transport {
            url: self.notify_url.clone(),
            source,
        };

        let response = HTTP_CLIENT
            .post(&self.notify_url)
            .json(request)
            .send()
            .await
            .map_err(transport)?;

        let status = response.status();
        let body = response.text().await.map_err(transport)?;

        if status != StatusCode::OK {
            return Err(RelayClientError::Rejected {
                status: status.as_u16(),
                body,
            });
        }
        Ok(body)
    }
}
