use axum::{Json, extract::State};
use hatch_core::counters::PurchaseRecord;
use hatch_core::events::Purchase;
use kanau::processor::Processor;
use serde_json::{Value, json};
use tokio::sync::mpsc::error::TrySendError;

use crate::api::ApiError;
use crate::api::extractors::StripeEventBody;
use crate::state::AppState;

/// `POST /webhook/stripe`: count completed checkouts.
///
/// Every other verified event type is acknowledged and ignored so Stripe
/// stops redelivering it.
pub async fn stripe_event(
    State(state): State<AppState>,
    StripeEventBody(event): StripeEventBody,
) -> Result<Json<Value>, ApiError> {
    let session = event.completed_checkout().map_err(|e| {
        tracing::warn!(event_id = %event.id, error = %e, "Malformed checkout session");
        ApiError::BadRequest(format!("invalid checkout session: {e}"))
    })?;

    let Some(session) = session else {
        tracing::debug!(event_id = %event.id, event_type = %event.event_type, "Ignoring Stripe event");
        return Ok(Json(json!({ "received": true })));
    };

    let purchase = Purchase::from_checkout(&event.id, &session);
    let Ok(record) = state.counters.process(purchase.clone()).await;

    if record == PurchaseRecord::Recorded {
        tracing::info!(
            event_id = %event.id,
            session_id = %purchase.session_id,
            amount = %purchase.amount,
            currency = %purchase.currency,
            "Purchase recorded"
        );
        match state.purchase_alerts.try_send(purchase) {
            Ok(()) => {}
            Err(TrySendError::Full(purchase)) => {
                tracing::warn!(session_id = %purchase.session_id, "Purchase alert queue full, alert dropped");
            }
            Err(TrySendError::Closed(_)) => {
                tracing::warn!("Purchase alerter is not running");
            }
        }
    }

    Ok(Json(json!({ "received": true })))
}
