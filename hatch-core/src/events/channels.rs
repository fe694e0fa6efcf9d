//! Event channel factories and handles.

use super::types::Purchase;
use tokio::sync::mpsc;

/// Buffer size for the purchase alert queue.
///
/// Alerts are sent one at a time; a burst larger than this is dropped with a
/// warning rather than blocking the webhook handler.
pub const PURCHASE_ALERT_BUFFER: usize = 64;

/// Sender handle for purchase alerts.
pub type PurchaseAlertSender = mpsc::Sender<Purchase>;
/// Receiver handle for purchase alerts.
pub type PurchaseAlertReceiver = mpsc::Receiver<Purchase>;

/// Create a new purchase alert channel.
pub fn purchase_alert_channel() -> (PurchaseAlertSender, PurchaseAlertReceiver) {
    mpsc::channel(PURCHASE_ALERT_BUFFER)
}
