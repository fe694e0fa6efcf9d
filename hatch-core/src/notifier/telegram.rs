//! Telegram Bot API notifier.

use super::{Notifier, NotifyError};
use crate::config::{ConfigStore, TelegramConfig};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info, warn};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Serialize)]
struct SendMessage<'a> {
    chat_id: &'a str,
    text: &'a str,
    parse_mode: &'static str,
    disable_web_page_preview: bool,
}

#[derive(Debug, Deserialize)]
struct ApiResponse {
    ok: bool,
    #[serde(default)]
    description: Option<String>,
}

/// Posts messages to one chat through `sendMessage`.
///
/// Credentials are read from the config store on every send so a SIGHUP
/// reload takes effect immediately.
pub struct TelegramNotifier {
    config: ConfigStore<TelegramConfig>,
    http_client: reqwest::Client,
}

impl TelegramNotifier {
    pub fn new(config: ConfigStore<TelegramConfig>) -> Self {
        Self {
            config,
            http_client: reqwest::Client::builder()
                .timeout(REQUEST_TIMEOUT)
                .build()
                .unwrap_or_else(|_| reqwest::Client::new()),
        }
    }
}

#[async_trait]
impl Notifier for TelegramNotifier {
    async fn notify(&self, text: &str) -> Result<(), NotifyError> {
        let config = self.config.get();
        let Some((token, chat_id)) = config.credentials() else {
            info!(message = %text, "Telegram not configured, message not sent");
            return Err(NotifyError::NotConfigured);
        };

        let body = SendMessage {
            chat_id,
            text,
            parse_mode: "HTML",
            disable_web_page_preview: true,
        };

        // The URL embeds the bot token; strip it from transport errors.
        let response = self
            .http_client
            .post(config.send_message_url(token))
            .json(&body)
            .send()
            .await
            .map_err(|e| NotifyError::Request(e.without_url()))?;

        let status = response.status();
        let parsed = response.json::<ApiResponse>().await;
        match parsed {
            Ok(api) if status.is_success() && api.ok => {
                debug!(%chat_id, "Telegram message delivered");
                Ok(())
            }
            Ok(api) => {
                let description = api.description.unwrap_or_default();
                warn!(status = status.as_u16(), %description, "Telegram rejected message");
                Err(NotifyError::Rejected {
                    status: status.as_u16(),
                    description,
                })
            }
            Err(e) => {
                warn!(status = status.as_u16(), error = %e.without_url(), "Unreadable Telegram response");
                Err(NotifyError::Rejected {
                    status: status.as_u16(),
                    description: "unreadable response body".to_string(),
                })
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;
    use axum::{Json, Router, extract::Path, http::StatusCode, routing::post};
    use std::sync::Arc;
    use tokio::net::TcpListener;
    use tokio::sync::Mutex;

    type Seen = Arc<Mutex<Vec<(String, serde_json::Value)>>>;

    /// Minimal stand-in for api.telegram.org that records `sendMessage` calls.
    async fn spawn_stub(reject: bool) -> (url::Url, Seen) {
        let seen: Seen = Arc::default();
        let recorded = seen.clone();
        let app = Router::new().route(
            "/{bot}/sendMessage",
            post(move |Path(bot): Path<String>, Json(body): Json<serde_json::Value>| {
                let recorded = recorded.clone();
                async move {
                    recorded.lock().await.push((bot, body));
                    if reject {
                        (
                            StatusCode::BAD_REQUEST,
                            Json(serde_json::json!({"ok": false, "description": "Bad Request: chat not found"})),
                        )
                    } else {
                        (
                            StatusCode::OK,
                            Json(serde_json::json!({"ok": true, "result": {}})),
                        )
                    }
                }
            }),
        );
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        (url::Url::parse(&format!("http://{addr}")).unwrap(), seen)
    }

    fn notifier(api_base: url::Url, token: Option<&str>) -> TelegramNotifier {
        TelegramNotifier::new(ConfigStore::new(TelegramConfig {
            bot_token: token.map(str::to_owned),
            chat_id: Some("-100123".to_string()),
            api_base,
        }))
    }

    #[tokio::test]
    async fn test_sends_html_message_to_chat() {
        let (base, seen) = spawn_stub(false).await;
        notifier(base, Some("42:abc"))
            .notify("<b>hello</b>")
            .await
            .unwrap();

        let seen = seen.lock().await;
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].0, "bot42:abc");
        assert_eq!(seen[0].1["chat_id"], "-100123");
        assert_eq!(seen[0].1["text"], "<b>hello</b>");
        assert_eq!(seen[0].1["parse_mode"], "HTML");
    }

    #[tokio::test]
    async fn test_api_rejection_is_reported() {
        let (base, _) = spawn_stub(true).await;
        let err = notifier(base, Some("42:abc")).notify("hi").await.unwrap_err();
        match err {
            NotifyError::Rejected {
                status,
                description,
            } => {
                assert_eq!(status, 400);
                assert_eq!(description, "Bad Request: chat not found");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_missing_token_only_logs() {
        let (base, seen) = spawn_stub(false).await;
        let err = notifier(base, None).notify("hi").await.unwrap_err();
        assert!(matches!(err, NotifyError::NotConfigured));
        assert!(seen.lock().await.is_empty());
    }
}
