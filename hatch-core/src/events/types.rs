//! Event type definitions.
//!
//! Events are normalized forms of the inbound payloads. They are transient:
//! each one is folded into the counters as soon as it arrives.

use compact_str::CompactString;
use hatch_sdk::objects::{CheckoutSession, ClickPayload, QrScanPayload, minor_to_major};
use rust_decimal::Decimal;

/// Placeholder for a missing country or device.
pub const UNKNOWN: &str = "unknown";

/// Currency assumed when Stripe omits one.
pub const DEFAULT_CURRENCY: &str = "USD";

/// Longest country, device or button label kept, in characters.
///
/// Labels come straight from unauthenticated clients and end up in the
/// Telegram report, which is capped at 4096 characters.
pub const MAX_LABEL_CHARS: usize = 64;

/// `label` cut to at most [`MAX_LABEL_CHARS`] characters.
pub fn clip_label(label: &str) -> &str {
    match label.char_indices().nth(MAX_LABEL_CHARS) {
        Some((end, _)) => &label[..end],
        None => label,
    }
}

/// A QR code was scanned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QrScan {
    /// Upper-case country code, or `unknown`.
    pub country: CompactString,
    /// Lower-case device type, or `unknown`.
    pub device: CompactString,
}

impl From<&QrScanPayload> for QrScan {
    fn from(payload: &QrScanPayload) -> Self {
        Self {
            country: normalize(payload.country.as_deref(), |s| s.to_ascii_uppercase()),
            device: normalize(payload.device_type.as_deref(), |s| s.to_ascii_lowercase()),
        }
    }
}

fn normalize(value: Option<&str>, case: impl Fn(&str) -> String) -> CompactString {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => CompactString::from(case(clip_label(v))),
        _ => CompactString::const_new(UNKNOWN),
    }
}

/// A tracked button on the website was clicked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ButtonClick {
    pub button: CompactString,
    pub page: Option<String>,
}

/// Rejected click payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("button label must not be empty")]
pub struct EmptyButtonLabel;

impl TryFrom<ClickPayload> for ButtonClick {
    type Error = EmptyButtonLabel;

    fn try_from(payload: ClickPayload) -> Result<Self, Self::Error> {
        let button = payload.button.trim();
        if button.is_empty() {
            return Err(EmptyButtonLabel);
        }
        Ok(Self {
            button: CompactString::from(clip_label(button)),
            page: payload.page,
        })
    }
}

/// A Stripe Checkout completed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Purchase {
    /// Stripe event id, used to drop redelivered events.
    pub event_id: CompactString,
    pub session_id: String,
    /// Amount in major units, never negative.
    pub amount: Decimal,
    /// Upper-case ISO currency code.
    pub currency: CompactString,
    pub customer_email: Option<String>,
}

impl Purchase {
    pub fn from_checkout(event_id: &str, session: &CheckoutSession) -> Self {
        let currency = session
            .currency
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .unwrap_or(DEFAULT_CURRENCY)
            .to_ascii_uppercase();
        let minor = session.amount_total.unwrap_or(0).max(0);
        Self {
            event_id: CompactString::from(event_id),
            session_id: session.id.clone(),
            amount: minor_to_major(minor, &currency),
            currency: CompactString::from(currency),
            customer_email: session.customer_email().map(str::to_owned),
        }
    }
}

/// Read the counters, optionally starting a new period.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TakeSnapshot {
    pub reset_period: bool,
}

/// What caused a report to be sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportTrigger {
    /// Top-of-hour timer. Period counters are reset.
    Scheduled,
    /// `POST /debug/send-report`. Period counters are left untouched.
    Manual,
}

impl ReportTrigger {
    pub fn resets_period(self) -> bool {
        matches!(self, ReportTrigger::Scheduled)
    }
}

impl std::fmt::Display for ReportTrigger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReportTrigger::Scheduled => write!(f, "scheduled"),
            ReportTrigger::Manual => write!(f, "manual"),
        }
    }
}
