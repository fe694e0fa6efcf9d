//! Click tracking.
//!
//! # Endpoints
//!
//! - `POST /track/click` – a tracked button was clicked
//!
//! The website script posts with `fetch` or `navigator.sendBeacon`, so the
//! body is read as JSON whatever its `Content-Type`. CORS (including the
//! `OPTIONS` preflight) is handled by the layer in `server.rs`.

use axum::{Json, Router, extract::State, routing::post};
use hatch_core::events::ButtonClick;
use hatch_sdk::objects::ClickPayload;
use kanau::processor::Processor;
use serde_json::{Value, json};

use crate::api::ApiError;
use crate::api::extractors::LenientJson;
use crate::state::AppState;

/// Build the click tracking router.
pub fn router() -> Router<AppState> {
    Router::new().route("/track/click", post(track_click))
}

async fn track_click(
    State(state): State<AppState>,
    LenientJson(payload): LenientJson<ClickPayload>,
) -> Result<Json<Value>, ApiError> {
    let click_ts = payload.timestamp.clone();
    let click = ButtonClick::try_from(payload).map_err(|e| ApiError::BadRequest(e.to_string()))?;
    tracing::info!(
        button = %click.button,
        page = click.page.as_deref().unwrap_or("-"),
        client_ts = ?click_ts,
        "Click recorded"
    );
    let Ok(()) = state.counters.process(click).await;
    Ok(Json(json!({ "success": true })))
}
