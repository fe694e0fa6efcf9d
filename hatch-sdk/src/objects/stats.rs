//! Counter snapshots and the debug/health response bodies.

use chrono::{DateTime, Utc};
use compact_str::CompactString;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Running totals for one counting window.
///
/// Maps are ordered so that the JSON rendering is stable between calls.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CounterSnapshot {
    pub qr_scans_total: u64,
    pub qr_scans_by_country: BTreeMap<CompactString, u64>,
    pub qr_scans_by_device: BTreeMap<CompactString, u64>,
    pub clicks_total: u64,
    pub clicks_by_button: BTreeMap<CompactString, u64>,
    pub purchases_total: u64,
    /// Revenue in major units, keyed by upper-case ISO currency code.
    pub revenue_by_currency: BTreeMap<CompactString, Decimal>,
}

impl CounterSnapshot {
    /// `true` when nothing at all has been recorded in this window.
    pub fn is_empty(&self) -> bool {
        self.qr_scans_total == 0 && self.clicks_total == 0 && self.purchases_total == 0
    }
}

/// Body of `GET /debug/stats`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatsSnapshot {
    /// Counters accumulated since the last scheduled report.
    pub period: CounterSnapshot,
    /// Counters accumulated since the process started.
    pub all_time: CounterSnapshot,
    pub period_started_at: DateTime<Utc>,
    pub process_started_at: DateTime<Utc>,
}

/// Body of `GET /health`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: DateTime<Utc>,
}
