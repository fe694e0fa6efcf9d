//! The process-wide counter store.
//!
//! Two [`CounterSnapshot`]s live behind one mutex: the period window (since
//! the last scheduled report) and the all-time window (since process start).
//! Every event bumps both inside the same critical section, so all-time is
//! never behind period. Only [`TakeSnapshot`] with `reset_period` clears the
//! period window.

use crate::events::{ButtonClick, Purchase, QrScan, TakeSnapshot};
use chrono::{DateTime, Utc};
use compact_str::CompactString;
use hatch_sdk::objects::{CounterSnapshot, StatsSnapshot};
use kanau::processor::Processor;
use std::collections::{BTreeMap, VecDeque};
use std::convert::Infallible;
use tokio::sync::Mutex;
use tracing::debug;

/// How many Stripe event ids are remembered for de-duplication.
pub const SEEN_EVENT_CAPACITY: usize = 1024;

/// Distinct keys tracked per breakdown map. Further new keys are counted
/// under [`OVERFLOW_KEY`].
pub const MAX_TRACKED_KEYS: usize = 256;
pub const OVERFLOW_KEY: &str = "other";

/// Owned, lock-guarded counters. Create one at startup and share it via `Arc`.
pub struct CounterStore {
    inner: Mutex<Counters>,
}

struct Counters {
    period: CounterSnapshot,
    all_time: CounterSnapshot,
    period_started_at: DateTime<Utc>,
    process_started_at: DateTime<Utc>,
    seen_events: VecDeque<CompactString>,
}

impl Counters {
    fn windows(&mut self) -> [&mut CounterSnapshot; 2] {
        [&mut self.period, &mut self.all_time]
    }

    /// Remember `event_id`; `false` if it was already seen.
    fn remember(&mut self, event_id: &CompactString) -> bool {
        if self.seen_events.contains(event_id) {
            return false;
        }
        if self.seen_events.len() == SEEN_EVENT_CAPACITY {
            self.seen_events.pop_front();
        }
        self.seen_events.push_back(event_id.clone());
        true
    }
}

fn bump(map: &mut BTreeMap<CompactString, u64>, key: &CompactString) {
    let key = if map.len() >= MAX_TRACKED_KEYS && !map.contains_key(key) {
        CompactString::const_new(OVERFLOW_KEY)
    } else {
        key.clone()
    };
    let slot = map.entry(key).or_insert(0);
    *slot = slot.saturating_add(1);
}

impl CounterStore {
    pub fn new() -> Self {
        let now = Utc::now();
        Self {
            inner: Mutex::new(Counters {
                period: CounterSnapshot::default(),
                all_time: CounterSnapshot::default(),
                period_started_at: now,
                process_started_at: now,
                seen_events: VecDeque::with_capacity(SEEN_EVENT_CAPACITY),
            }),
        }
    }
}

impl Default for CounterStore {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Increments
// ---------------------------------------------------------------------------

impl Processor<QrScan> for CounterStore {
    type Output = ();
    type Error = Infallible;

    async fn process(&self, scan: QrScan) -> Result<(), Infallible> {
        let mut counters = self.inner.lock().await;
        for window in counters.windows() {
            window.qr_scans_total = window.qr_scans_total.saturating_add(1);
            bump(&mut window.qr_scans_by_country, &scan.country);
            bump(&mut window.qr_scans_by_device, &scan.device);
        }
        Ok(())
    }
}

impl Processor<ButtonClick> for CounterStore {
    type Output = ();
    type Error = Infallible;

    async fn process(&self, click: ButtonClick) -> Result<(), Infallible> {
        let mut counters = self.inner.lock().await;
        for window in counters.windows() {
            window.clicks_total = window.clicks_total.saturating_add(1);
            bump(&mut window.clicks_by_button, &click.button);
        }
        Ok(())
    }
}

/// Result of recording a [`Purchase`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PurchaseRecord {
    Recorded,
    /// Stripe redelivered an event that was already counted.
    Duplicate,
}

impl Processor<Purchase> for CounterStore {
    type Output = PurchaseRecord;
    type Error = Infallible;

    async fn process(&self, purchase: Purchase) -> Result<PurchaseRecord, Infallible> {
        let mut counters = self.inner.lock().await;
        if !counters.remember(&purchase.event_id) {
            debug!(event_id = %purchase.event_id, "Ignoring redelivered Stripe event");
            return Ok(PurchaseRecord::Duplicate);
        }
        for window in counters.windows() {
            window.purchases_total = window.purchases_total.saturating_add(1);
            let revenue = window
                .revenue_by_currency
                .entry(purchase.currency.clone())
                .or_default();
            *revenue = revenue.saturating_add(purchase.amount);
        }
        Ok(PurchaseRecord::Recorded)
    }
}

// ---------------------------------------------------------------------------
// Snapshots
// ---------------------------------------------------------------------------

impl Processor<TakeSnapshot> for CounterStore {
    type Output = StatsSnapshot;
    type Error = Infallible;

    async fn process(&self, request: TakeSnapshot) -> Result<StatsSnapshot, Infallible> {
        let mut counters = self.inner.lock().await;
        let period_started_at = counters.period_started_at;
        let period = if request.reset_period {
            counters.period_started_at = Utc::now();
            std::mem::take(&mut counters.period)
        } else {
            counters.period.clone()
        };
        Ok(StatsSnapshot {
            period,
            all_time: counters.all_time.clone(),
            period_started_at,
            process_started_at: counters.process_started_at,
        })
    }
}
