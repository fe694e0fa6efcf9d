//! Operator endpoints.
//!
//! # Endpoints
//!
//! - `GET  /debug/stats`       – current counters
//! - `POST /debug/send-report` – send a report now (period is not reset)
//!
//! Both require `Hatch-Admin-Authorization` when an admin secret is set.

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use hatch_core::events::{ReportTrigger, TakeSnapshot};
use hatch_sdk::objects::StatsSnapshot;
use kanau::processor::Processor;
use serde_json::json;

use crate::api::extractors::AdminAuth;
use crate::state::AppState;

/// Build the debug router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/debug/stats", get(stats))
        .route("/debug/send-report", post(send_report))
}

async fn stats(State(state): State<AppState>, _auth: AdminAuth) -> Json<StatsSnapshot> {
    let Ok(snapshot) = state
        .counters
        .process(TakeSnapshot {
            reset_period: false,
        })
        .await;
    Json(snapshot)
}

async fn send_report(State(state): State<AppState>, _auth: AdminAuth) -> Response {
    match state.reporter.process(ReportTrigger::Manual).await {
        Ok(()) => Json(json!({ "status": "sent" })).into_response(),
        Err(e) => (
            StatusCode::BAD_GATEWAY,
            Json(json!({ "status": "failed", "error": e.to_string() })),
        )
            .into_response(),
    }
}
