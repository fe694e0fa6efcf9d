//! Events flowing through the relay.
//!
//! # Event Flow
//!
//! 1. HTTP handlers turn payloads into `QrScan`, `ButtonClick` or `Purchase`
//!    and hand them to the `CounterStore`.
//! 2. Recorded purchases are also queued for the `PurchaseAlerter`.
//! 3. The `ReportScheduler` (or the debug endpoint) feeds a `ReportTrigger`
//!    to the `Reporter`, which takes a snapshot and notifies.

pub mod channels;
pub mod types;

pub use channels::{
    PURCHASE_ALERT_BUFFER, PurchaseAlertReceiver, PurchaseAlertSender, purchase_alert_channel,
};

pub use types::{
    ButtonClick, EmptyButtonLabel, MAX_LABEL_CHARS, Purchase, QrScan, ReportTrigger, TakeSnapshot,
    UNKNOWN, clip_label,
};
