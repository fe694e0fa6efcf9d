use axum::{Json, extract::State};
use hatch_core::events::QrScan;
use hatch_sdk::objects::QrScanPayload;
use kanau::processor::Processor;
use serde_json::{Value, json};

use crate::api::ApiError;
use crate::api::extractors::{JsonOrForm, QrAuth};
use crate::state::AppState;

/// `POST /webhook/qr`: count one scan.
///
/// Missing country or device fields are counted as `unknown`.
pub async fn qr_scan(
    State(state): State<AppState>,
    _auth: QrAuth,
    JsonOrForm(payload): JsonOrForm<QrScanPayload>,
) -> Result<Json<Value>, ApiError> {
    let scan = QrScan::from(&payload);
    let code = payload.code_id();
    tracing::info!(
        country = %scan.country,
        device = %scan.device,
        code = code.as_deref().unwrap_or("-"),
        "QR scan recorded"
    );
    let Ok(()) = state.counters.process(scan).await;
    Ok(Json(json!({ "success": true })))
}
