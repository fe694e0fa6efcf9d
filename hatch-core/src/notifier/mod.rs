//! Outbound message delivery.
//!
//! Delivery is fire-and-forget from the caller's point of view: a failure is
//! returned so it can be logged, but nothing retries it.

mod telegram;

pub use telegram::TelegramNotifier;

use async_trait::async_trait;
use thiserror::Error;

/// Errors that can occur while delivering a message.
#[derive(Debug, Error)]
pub enum NotifyError {
    /// Token or chat id missing; the message was only logged.
    #[error("notifier is not configured")]
    NotConfigured,

    /// Transport-level failure (DNS, TLS, timeout, ...).
    #[error("HTTP request error: {0}")]
    Request(reqwest::Error),

    /// The API answered but refused the message.
    #[error("delivery rejected with status {status}: {description}")]
    Rejected { status: u16, description: String },
}

/// Sends a text message to the configured destination.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, text: &str) -> Result<(), NotifyError>;
}
