//! Reporter processor.
//!
//! The Reporter is responsible for:
//! - Taking a snapshot of the counters (resetting the period for scheduled runs)
//! - Rendering the report in the configured timezone
//! - Handing the text to the notifier
//!
//! The counter lock is released before the notifier is called.

use crate::config::{ConfigStore, ReportConfig};
use crate::counters::CounterStore;
use crate::events::{ReportTrigger, TakeSnapshot};
use crate::notifier::{Notifier, NotifyError};
use crate::report::{ReportContext, format_report};
use chrono::Utc;
use kanau::processor::Processor;
use std::sync::Arc;
use tracing::{info, warn};

/// Builds and sends reports. Cheap to clone.
#[derive(Clone)]
pub struct Reporter {
    counters: Arc<CounterStore>,
    notifier: Arc<dyn Notifier>,
    config: ConfigStore<ReportConfig>,
}

impl Reporter {
    pub fn new(
        counters: Arc<CounterStore>,
        notifier: Arc<dyn Notifier>,
        config: ConfigStore<ReportConfig>,
    ) -> Self {
        Self {
            counters,
            notifier,
            config,
        }
    }
}

impl Processor<ReportTrigger> for Reporter {
    type Output = ();
    type Error = NotifyError;

    async fn process(&self, trigger: ReportTrigger) -> Result<(), NotifyError> {
        let Ok(stats) = self
            .counters
            .process(TakeSnapshot {
                reset_period: trigger.resets_period(),
            })
            .await;

        let config = self.config.get();
        let text = format_report(&ReportContext {
            title: &config.title,
            period: &stats.period,
            all_time: &stats.all_time,
            generated_at: Utc::now().with_timezone(&config.timezone),
        });

        match self.notifier.notify(&text).await {
            Ok(()) => {
                info!(
                    %trigger,
                    qr_scans = stats.period.qr_scans_total,
                    clicks = stats.period.clicks_total,
                    purchases = stats.period.purchases_total,
                    "Report sent"
                );
                Ok(())
            }
            Err(e) => {
                warn!(%trigger, error = %e, "Report delivery failed");
                Err(e)
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::events::QrScan;
    use crate::processors::testing::RecordingNotifier;

    fn reporter(notifier: Arc<RecordingNotifier>) -> (Reporter, Arc<CounterStore>) {
        let counters = Arc::new(CounterStore::new());
        let reporter = Reporter::new(
            counters.clone(),
            notifier,
            ConfigStore::new(ReportConfig::default()),
        );
        (reporter, counters)
    }

    async fn record_scan(counters: &CounterStore) {
        counters
            .process(QrScan {
                country: "US".into(),
                device: "mobile".into(),
            })
            .await
            .unwrap();
    }

    async fn peek(counters: &CounterStore) -> hatch_sdk::objects::StatsSnapshot {
        counters
            .process(TakeSnapshot {
                reset_period: false,
            })
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_manual_report_with_no_events() {
        let notifier = Arc::new(RecordingNotifier::default());
        let (reporter, counters) = reporter(notifier.clone());

        reporter.process(ReportTrigger::Manual).await.unwrap();

        let sent = notifier.messages().await;
        assert_eq!(sent.len(), 1);
        assert!(sent[0].contains("No activity"));
        assert!(peek(&counters).await.period.is_empty());
    }

    #[tokio::test]
    async fn test_manual_report_keeps_period() {
        let notifier = Arc::new(RecordingNotifier::default());
        let (reporter, counters) = reporter(notifier.clone());
        record_scan(&counters).await;

        reporter.process(ReportTrigger::Manual).await.unwrap();

        assert_eq!(peek(&counters).await.period.qr_scans_total, 1);
        assert!(notifier.messages().await[0].contains("   • Last hour: 1"));
    }

    #[tokio::test]
    async fn test_scheduled_report_resets_period_only() {
        let notifier = Arc::new(RecordingNotifier::default());
        let (reporter, counters) = reporter(notifier.clone());
        record_scan(&counters).await;
        record_scan(&counters).await;

        reporter.process(ReportTrigger::Scheduled).await.unwrap();

        let stats = peek(&counters).await;
        assert!(stats.period.is_empty());
        assert_eq!(stats.all_time.qr_scans_total, 2);
        assert_eq!(stats.all_time.qr_scans_by_country["US"], 2);
        assert!(notifier.messages().await[0].contains("   • Last hour: 2"));
    }

    #[tokio::test]
    async fn test_delivery_failure_still_resets() {
        let notifier = Arc::new(RecordingNotifier::failing());
        let (reporter, counters) = reporter(notifier.clone());
        record_scan(&counters).await;

        assert!(reporter.process(ReportTrigger::Scheduled).await.is_err());
        assert!(peek(&counters).await.period.is_empty());
        assert_eq!(notifier.messages().await.len(), 1);
    }
}
