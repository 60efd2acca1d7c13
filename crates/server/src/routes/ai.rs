//! Menu-image analysis endpoint.

use axum::{Json, extract::State, response::IntoResponse};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use serde::Deserialize;
use serde_json::json;
use tracing::instrument;

use crate::error::AppError;
use crate::gemini::{parse_menu_suggestions, prompt};
use crate::middleware::RequireAuth;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct AnalyzeImagePayload {
    /// Base64-encoded image bytes.
    pub image: String,
    /// Prompt language, `tr` or `en`.
    #[serde(default = "default_language")]
    pub language: String,
    /// Image MIME type.
    #[serde(default = "default_mime", rename = "mimeType")]
    pub mime_type: String,
}

fn default_language() -> String {
    "tr".to_string()
}

fn default_mime() -> String {
    "image/jpeg".to_string()
}

/// POST /api/ai/analyze-menu-image - extract a structured menu from a
/// photo. Unparseable model output falls back to a placeholder with a
/// warning instead of failing.
#[instrument(skip_all, fields(uid = %user.0.uid, language = %payload.language))]
pub async fn analyze_menu_image(
    State(state): State<AppState>,
    user: RequireAuth,
    Json(payload): Json<AnalyzeImagePayload>,
) -> Result<impl IntoResponse, AppError> {
    if payload.image.is_empty() {
        return Err(AppError::BadRequest("image is required".to_string()));
    }
    if BASE64.decode(&payload.image).is_err() {
        return Err(AppError::BadRequest(
            "image must be valid base64".to_string(),
        ));
    }

    let raw = state
        .gemini()
        .complete_with_image(
            prompt::menu_image_prompt(&payload.language),
            &payload.image,
            &payload.mime_type,
        )
        .await
        .map_err(AppError::Ai)?;

    let parsed = parse_menu_suggestions(&raw);
    Ok(Json(json!({
        "success": true,
        "suggestions": parsed.suggestions,
        "error": parsed.warning,
    })))
}
