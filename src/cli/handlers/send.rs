//! Send command handler
//!
//! Reads a message from stdin and posts it to a running relay.

use crate::cli::parser::Level;
use crate::external::RelayClient;
use crate::models::NotifyRequest;
use tokio::io::{AsyncRead, AsyncReadExt};

/// Handler for the send command
pub struct SendCommandHandler {
    client: RelayClient,
    tag: String,
    sync: bool,
    level: Option<Level>,
}

impl SendCommandHandler {
    pub fn new(server: &str, tag: String, sync: bool, level: Option<Level>) -> Self {
        Self {
            client: RelayClient::new(server),
            tag,
            sync,
            level,
        }
    }

    /// Send standard input as the message text
    pub async fn execute(&self) -> anyhow::Result<()> {
        self.execute_with(tokio::io::stdin()).await
    }

    /// Send everything readable from `input`, unmodified, as the message text
    ///
    /// # Errors
    /// Fails when the input cannot be read, the relay is unreachable, or it
    /// answers with anything but 200.
    pub async fn execute_with<R: AsyncRead + Unpin>(&self, mut input: R) -> anyhow::Result<()> {
        let mut text = String::new();
        input.read_to_string(&mut text).await?;

        let request = self.request(text);
        tracing::debug!(
            url = %self.client.notify_url(),
            tag = %request.tag,
            sync = request.sync,
            "sending notification"
        );

        self.client.notify(&request).await?;
        Ok(())
    }

    fn request(&self, text: String) -> NotifyRequest {
        NotifyRequest {
            tag: self.tag.clone(),
            host: Some(local_hostname()),
            text,
            sync: self.sync,
            level: self.level.map(|l| l.as_str().to_string()),
        }
    }
}

/// Hostname of this machine, `localhost` when it cannot be determined
fn local_hostname() -> String {
    hostname::get()
        .ok()
        .and_then(|h| h.into_string().ok())
        .filter(|h| !h.is_empty())
        .unwrap_or_else(|| "localhost".to_string())
}
