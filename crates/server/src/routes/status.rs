//! Health and service status endpoints. No auth.

use axum::{Json, extract::State, response::IntoResponse};
use serde_json::json;
use tracing::instrument;

use crate::state::AppState;

/// GET /api/health
#[instrument(skip_all)]
pub async fn health() -> impl IntoResponse {
    Json(json!({ "status": "healthy" }))
}

/// GET /api/ai-status - report the configured AI model without calling it.
#[instrument(skip_all)]
pub async fn ai_status(State(state): State<AppState>) -> impl IntoResponse {
    Json(json!({
        "available": true,
        "model": state.gemini().model(),
    }))
}

/// GET /api/firebase-status - report the configured project without
/// calling it.
#[instrument(skip_all)]
pub async fn firebase_status(State(state): State<AppState>) -> impl IntoResponse {
    Json(json!({
        "available": true,
        "project_id": state.config().firebase.project_id,
    }))
}
