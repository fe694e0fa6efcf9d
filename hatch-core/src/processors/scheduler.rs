//! Top-of-hour report scheduler.
//!
//! # Architecture
//!
//! ```text
//! ReportScheduler
//!   ├─ computes the next local :00 in the configured timezone
//!   ├─ sleeps until then (or until the timezone changes)
//!   └─ feeds ReportTrigger::Scheduled to the Reporter
//! ```
//!
//! The last fired slot is remembered, so a slot is never reported twice even
//! if the wall clock steps backwards.

use super::reporter::Reporter;
use crate::config::{ConfigWatcher, ReportConfig};
use crate::events::ReportTrigger;
use crate::utils::schedule::next_report_at;
use chrono::{DateTime, Utc};
use kanau::processor::Processor;
use tokio::sync::watch;
use tokio::time::Instant;
use tracing::{debug, error, info};

pub struct ReportScheduler {
    reporter: Reporter,
}

impl ReportScheduler {
    pub fn new(reporter: Reporter) -> Self {
        Self { reporter }
    }

    /// Run until shutdown is signaled.
    ///
    /// A timezone change on reload reschedules the pending slot.
    pub async fn run(
        self,
        mut shutdown_rx: watch::Receiver<bool>,
        mut config_watcher: ConfigWatcher<ReportConfig>,
    ) {
        info!("ReportScheduler started");
        let mut last_fired: Option<DateTime<Utc>> = None;

        loop {
            let tz = config_watcher.current().timezone;
            let now = Utc::now();
            let from = last_fired.map_or(now, |fired| fired.max(now));
            let slot = next_report_at(from, tz);
            let wait = (slot - now).to_std().unwrap_or_default();
            debug!(%slot, %tz, wait_secs = wait.as_secs(), "Next report scheduled");

            tokio::select! {
                biased;

                res = shutdown_rx.changed() => {
                    if res.is_err() || *shutdown_rx.borrow() {
                        info!("ReportScheduler received shutdown signal");
                        break;
                    }
                }

                Ok(()) = config_watcher.changed() => {
                    debug!("Report config changed, rescheduling");
                }

                _ = tokio::time::sleep_until(Instant::now() + wait) => {
                    last_fired = Some(slot);
                    if let Err(e) = self.reporter.process(ReportTrigger::Scheduled).await {
                        error!(error = %e, %slot, "Scheduled report was not delivered");
                    }
                }
            }
        }

        info!("ReportScheduler shutdown complete");
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::config::ConfigStore;
    use crate::counters::CounterStore;
    use crate::events::{QrScan, TakeSnapshot};
    use crate::processors::testing::RecordingNotifier;
    use std::sync::Arc;
    use std::time::Duration;

    #[tokio::test(start_paused = true)]
    async fn test_fires_and_stops_on_shutdown() {
        let notifier = Arc::new(RecordingNotifier::default());
        let config = ConfigStore::new(ReportConfig::default());
        let counters = Arc::new(CounterStore::new());
        let Ok(()) = counters
            .process(QrScan {
                country: "US".into(),
                device: "mobile".into(),
            })
            .await;
        let reporter = Reporter::new(counters.clone(), notifier.clone(), config.clone());
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        let handle = tokio::spawn(
            ReportScheduler::new(reporter).run(shutdown_rx, config.subscribe()),
        );

        while notifier.messages().await.len() < 2 {
            tokio::time::sleep(Duration::from_secs(60)).await;
        }
        shutdown_tx.send(true).unwrap();
        handle.await.unwrap();

        let sent = notifier.messages().await;
        assert!(sent.iter().all(|m| m.contains("Hourly Report")));
        assert!(sent[0].contains("   • Last hour: 1\n"));
        assert!(sent[1].contains("No activity"));

        let Ok(stats) = counters.process(TakeSnapshot { reset_period: false }).await;
        assert!(stats.period.is_empty());
        assert_eq!(stats.all_time.qr_scans_total, 1);
        assert_eq!(stats.all_time.qr_scans_by_country["US"], 1);
    }
}
