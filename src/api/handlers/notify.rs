//! The relay endpoints: `/notify` routes by tag, `/notify-directly` passes a
//! finished payload through.
//!
//! Both accept every method at the router level; `RelayJson` turns anything
//! but POST into a 400.

use crate::api::extract::{AccessInfo, RelayJson};
use crate::error::{AppError, AppResult};
use crate::models::{NotifyDirectlyRequest, NotifyRequest};
use crate::services::relay::DeliveryOutcome;
use crate::state::AppState;
use axum::{Router, extract::State, routing::any};
use tracing::info;

pub fn notify_routes() -> Router<AppState> {
    Router::new()
        .route("/notify", any(notify))
        .route("/notify-directly", any(notify_directly))
}

/// Route a tagged message to every binding for its tag.
///
/// Sync requests wait for delivery and report an unknown tag (400) or a
/// failed delivery (502). Async requests always answer "ok".
pub async fn notify(
    State(state): State<AppState>,
    access: AccessInfo,
    body: AppResult<RelayJson<NotifyRequest>>,
) -> AppResult<&'static str> {
    let message = match body {
        Ok(RelayJson(message)) => message,
        Err(rejection) => return Err(reject(&access, rejection)),
    };

    info!(
        target: "access",
        method = %access.method,
        path = %access.path,
        proto = ?access.version,
        content_length = access.content_length,
        tag = %message.tag,
        host = message.host.as_deref().unwrap_or(""),
        sync = message.sync,
        "accepted request"
    );

    let result = state.router.route(&message).await;

    if message.sync {
        if !result.matched {
            return Err(AppError::TagNotFound { tag: message.tag });
        }
        if let Some(source) = result.failure {
            return Err(AppError::DeliveryFailed { source });
        }
    }

    Ok("ok")
}

/// Forward a caller-built payload without tag resolution
pub async fn notify_directly(
    State(state): State<AppState>,
    access: AccessInfo,
    body: AppResult<RelayJson<NotifyDirectlyRequest>>,
) -> AppResult<&'static str> {
    let message = match body {
        Ok(RelayJson(message)) => message,
        Err(rejection) => return Err(reject(&access, rejection)),
    };

    info!(
        target: "access",
        method = %access.method,
        path = %access.path,
        proto = ?access.version,
        content_length = access.content_length,
        channel = %message.payload.channel,
        sync = message.sync,
        "accepted request"
    );

    match state.router.route_direct(message).await {
        DeliveryOutcome::Failed(source) => Err(AppError::DeliveryFailed { source }),
        DeliveryOutcome::Delivered | DeliveryOutcome::Scheduled => Ok("ok"),
    }
}

/// Access line for a request the extractor turned away; no tag is known yet
fn reject(access: &AccessInfo, rejection: AppError) -> AppError {
    info!(
        target: "access",
        method = %access.method,
        path = %access.path,
        proto = ?access.version,
        content_length = access.content_length,
        tag = "",
        rejected = %rejection,
        "accepted request"
    );
    rejection
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Settings;
    use crate::services::relay::testing::RecordingClient;
    use axum::body::Body;
    use axum::http::{Method, Request, StatusCode};
    use std::io;
    use std::sync::{Arc, Mutex};
    use tower::ServiceExt;
    use tracing_subscriber::layer::SubscriberExt;

    /// Collects formatted log output in memory
    #[derive(Clone, Default)]
    struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

    impl CapturedLogs {
        fn contents(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    impl io::Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    async fn access_log_for(method: Method, uri: &str, body: &'static str) -> (StatusCode, String) {
        let logs = CapturedLogs::default();
        let writer = logs.clone();
        let subscriber = tracing_subscriber::registry().with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(move || writer.clone()),
        );
        let _guard = tracing::subscriber::set_default(subscriber);

        let (client, _rx) = RecordingClient::new();
        let state = AppState::with_client(Settings::default(), Arc::new(client));
        let response = notify_routes()
            .with_state(state)
            .oneshot(
                Request::builder()
                    .method(method)
                    .uri(uri)
                    .body(Body::from(body))
                    .unwrap(),
            )
            .await
            .unwrap();

        (response.status(), logs.contents())
    }

    #[tokio::test]
    async fn test_malformed_request_is_access_logged() {
        let (status, logs) = access_log_for(Method::POST, "/notify", "{").await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(logs.contains("access"), "{}", logs);
        assert!(logs.contains("accepted request"), "{}", logs);
        assert!(logs.contains("path=/notify"), "{}", logs);
        assert!(logs.contains("Request-body is malformed"), "{}", logs);
    }

    #[tokio::test]
    async fn test_wrong_method_is_access_logged() {
        let (status, logs) = access_log_for(Method::GET, "/notify-directly", "").await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(logs.contains("accepted request"), "{}", logs);
        assert!(logs.contains("method=GET"), "{}", logs);
        assert!(logs.contains("path=/notify-directly"), "{}", logs);
    }

    #[tokio::test]
    async fn test_accepted_request_logs_tag() {
        let (status, logs) =
            access_log_for(Method::POST, "/notify", r#"{"tag":"alerts","host":"web-1"}"#).await;

        assert_eq!(status, StatusCode::OK);
        assert!(logs.contains("tag=alerts"), "{}", logs);
        assert!(logs.contains("host=\"web-1\"") || logs.contains("host=web-1"), "{}", logs);
    }
}
