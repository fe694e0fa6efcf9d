//! Telegram Bot API configuration.

use url::Url;

pub const DEFAULT_API_BASE: &str = "https://api.telegram.org";

/// Where reports are delivered.
#[derive(Clone)]
pub struct TelegramConfig {
    pub bot_token: Option<String>,
    /// Numeric chat id or `@channel` handle.
    pub chat_id: Option<String>,
    pub api_base: Url,
}

impl TelegramConfig {
    /// Token and chat id, when both are present.
    pub fn credentials(&self) -> Option<(&str, &str)> {
        Some((self.bot_token.as_deref()?, self.chat_id.as_deref()?))
    }

    /// `{api_base}/bot{token}/sendMessage`
    pub fn send_message_url(&self, token: &str) -> String {
        format!(
            "{}/bot{token}/sendMessage",
            self.api_base.as_str().trim_end_matches('/')
        )
    }
}

// The token is a credential; keep it out of logs.
impl std::fmt::Debug for TelegramConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TelegramConfig")
            .field("bot_token", &self.bot_token.as_ref().map(|_| "<redacted>"))
            .field("chat_id", &self.chat_id)
            .field("api_base", &self.api_base.as_str())
            .finish()
    }
}
