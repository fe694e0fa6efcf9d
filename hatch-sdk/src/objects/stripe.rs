//! The subset of Stripe's event envelope the relay reads.

use serde::{Deserialize, Serialize};

/// Event type emitted when a Checkout payment completes.
pub const CHECKOUT_SESSION_COMPLETED: &str = "checkout.session.completed";

/// Stripe event envelope.
///
/// `data.object` is kept as raw JSON because its shape depends on `type`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StripeEvent {
    pub id: String,
    #[serde(rename = "type")]
    pub event_type: String,
    pub data: StripeEventData,
    #[serde(default)]
    pub livemode: bool,
    #[serde(default)]
    pub created: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StripeEventData {
    pub object: serde_json::Value,
}

impl StripeEvent {
    /// Decode `data.object` as a Checkout Session when this is a
    /// `checkout.session.completed` event. Other event types yield `Ok(None)`.
    pub fn completed_checkout(&self) -> Result<Option<CheckoutSession>, serde_json::Error> {
        if self.event_type != CHECKOUT_SESSION_COMPLETED {
            return Ok(None);
        }
        CheckoutSession::deserialize(&self.data.object).map(Some)
    }
}

/// A Stripe Checkout Session object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutSession {
    pub id: String,
    /// Total in the currency's minor unit.
    #[serde(default)]
    pub amount_total: Option<i64>,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub customer_details: Option<CustomerDetails>,
    #[serde(default)]
    pub payment_status: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerDetails {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

impl CheckoutSession {
    pub fn customer_email(&self) -> Option<&str> {
        self.customer_details.as_ref()?.email.as_deref()
    }
}
