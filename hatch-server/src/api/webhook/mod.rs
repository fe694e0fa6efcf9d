//! Inbound webhooks.
//!
//! # Endpoints
//!
//! - `POST /webhook/qr`     – a QR code was scanned
//! - `POST /webhook/stripe` – a Stripe event (only completed checkouts count)

use axum::{Router, routing::post};

use crate::state::AppState;

mod qr;
mod stripe;

/// Build the webhook router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/webhook/qr", post(qr::qr_scan))
        .route("/webhook/stripe", post(stripe::stripe_event))
}
