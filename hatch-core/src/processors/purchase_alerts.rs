//! Immediate purchase alerts.
//!
//! Recorded purchases are queued by the Stripe webhook handler and delivered
//! here, one at a time, so a slow notifier never holds up the webhook response.

use crate::config::{ConfigStore, ReportConfig};
use crate::events::{Purchase, PurchaseAlertReceiver};
use crate::notifier::{Notifier, NotifyError};
use crate::report::format_purchase_alert;
use chrono::Utc;
use kanau::processor::Processor;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, error, info};

pub struct PurchaseAlerter {
    notifier: Arc<dyn Notifier>,
    config: ConfigStore<ReportConfig>,
}

impl PurchaseAlerter {
    pub fn new(notifier: Arc<dyn Notifier>, config: ConfigStore<ReportConfig>) -> Self {
        Self { notifier, config }
    }

    /// Drain the alert queue until shutdown or until every sender is gone.
    pub async fn run(
        self,
        mut shutdown_rx: watch::Receiver<bool>,
        mut alert_rx: PurchaseAlertReceiver,
    ) {
        info!("PurchaseAlerter started");

        loop {
            tokio::select! {
                biased;

                res = shutdown_rx.changed() => {
                    if res.is_err() || *shutdown_rx.borrow() {
                        info!("PurchaseAlerter received shutdown signal");
                        break;
                    }
                }

                received = alert_rx.recv() => {
                    let Some(purchase) = received else {
                        info!("Purchase alert channel closed");
                        break;
                    };
                    if let Err(e) = self.process(purchase).await {
                        error!(error = %e, "Failed to send purchase alert");
                    }
                }
            }
        }

        info!("PurchaseAlerter shutdown complete");
    }
}

impl Processor<Purchase> for PurchaseAlerter {
    type Output = ();
    type Error = NotifyError;

    async fn process(&self, purchase: Purchase) -> Result<(), NotifyError> {
        let config = self.config.get();
        if !config.notify_purchases {
            debug!(session_id = %purchase.session_id, "Purchase alerts disabled");
            return Ok(());
        }
        let text = format_purchase_alert(&purchase, Utc::now().with_timezone(&config.timezone));
        self.notifier.notify(&text).await?;
        info!(
            session_id = %purchase.session_id,
            amount = %purchase.amount,
            currency = %purchase.currency,
            "Purchase alert sent"
        );
        Ok(())
    }
}
