//! Application state shared across all request handlers.

use hatch_core::config::SharedConfig;
use hatch_core::counters::CounterStore;
use hatch_core::events::PurchaseAlertSender;
use hatch_core::processors::Reporter;
use std::sync::Arc;

/// Application state that is shared across all request handlers.
///
/// This is cloneable and cheap to pass around (everything is behind Arc).
#[derive(Clone)]
pub struct AppState {
    pub counters: Arc<CounterStore>,
    /// Used by `POST /debug/send-report`.
    pub reporter: Reporter,
    /// Runtime configuration (can be reloaded via SIGHUP).
    pub config: SharedConfig,
    pub purchase_alerts: PurchaseAlertSender,
}

impl AppState {
    pub fn new(
        counters: Arc<CounterStore>,
        reporter: Reporter,
        config: SharedConfig,
        purchase_alerts: PurchaseAlertSender,
    ) -> Self {
        Self {
            counters,
            reporter,
            config,
            purchase_alerts,
        }
    }
}
