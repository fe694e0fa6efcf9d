use crate::notifier::{Notifier, NotifyError};
use async_trait::async_trait;
use tokio::sync::Mutex;

/// Notifier that keeps every message in memory.
#[derive(Default)]
pub struct RecordingNotifier {
    messages: Mutex<Vec<String>>,
    fail: bool,
}

impl RecordingNotifier {
    /// Records messages but reports every delivery as rejected.
    pub fn failing() -> Self {
        Self {
            messages: Mutex::default(),
            fail: true,
        }
    }

    pub async fn messages(&self) -> Vec<String> {
        self.messages.lock().await.clone()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn notify(&self, text: &str) -> Result<(), NotifyError> {
        self.messages.lock().await.push(text.to_string());
        if self.fail {
            return Err(NotifyError::Rejected {
                status: 500,
                description: "stub failure".to_string(),
            });
        }
        Ok(())
    }
}
