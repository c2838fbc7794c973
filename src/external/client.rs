use std::sync::LazyLock;
use std::time::Duration;

/// User-Agent sent on every outbound request
pub fn user_agent() -> String {
    format!("slackboard/{}", crate::pkg_version())
}

/// Global HTTP client instance shared by webhook delivery and the `send` command
///
/// Initialized lazily on first access and reused across the application, so
/// TCP connections to the webhook host are pooled.
///
/// Per-request timeouts override the 30s default; see `SlackWebhookClient`.
pub static HTTP_CLIENT: LazyLock<reqwest::Client> = LazyLock::new(|| {
    reqwest::Client::builder()
        // Timeouts
        .timeout(Duration::from_secs(30))
        .connect_timeout(Duration::from_secs(10))
        // Connection pooling
        .pool_max_idle_per_host(10)
        .pool_idle_timeout(Duration::from_secs(90))
        // HTTP/2 settings
        .http2_adaptive_window(true)
        .http2_keep_alive_interval(Duration::from_secs(10))
        .http2_keep_alive_timeout(Duration::from_secs(20))
        .gzip(true)
        .deflate(true)
        .user_agent(user_agent())
        .build()
        .expect("Failed to build HTTP client")
});
