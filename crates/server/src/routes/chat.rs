//! Chat endpoints: ask the restaurant assistant, read usage, read history.

use axum::{Json, extract::State, response::IntoResponse};
use lezzet_core::types::{DayKey, UserId};
use serde::Deserialize;
use serde_json::json;
use tracing::{instrument, warn};

use crate::db::{ChatRepository, MenuRepository, RestaurantRepository};
use crate::error::AppError;
use crate::gemini::prompt;
use crate::middleware::RequireAuth;
use crate::services::UsageLedger;
use crate::state::AppState;

/// Maximum question length in characters.
const MAX_QUESTION_CHARS: usize = 150;

/// Chat history entries returned to the client.
const HISTORY_LIMIT: usize = 10;

#[derive(Debug, Deserialize)]
pub struct ChatPayload {
    pub question: String,
}

/// POST /api/chat - answer a question about the configured restaurant.
///
/// The daily quota is checked before the AI call and recorded only after
/// it succeeds, so a failed completion never consumes quota.
#[instrument(skip_all, fields(uid = %user.0.uid))]
pub async fn ask(
    State(state): State<AppState>,
    user: RequireAuth,
    Json(payload): Json<ChatPayload>,
) -> Result<impl IntoResponse, AppError> {
    let question = payload.question.trim();
    if question.is_empty() {
        return Err(AppError::BadRequest("Soru boş olamaz".to_string()));
    }
    if question.chars().count() > MAX_QUESTION_CHARS {
        return Err(AppError::BadRequest(format!(
            "Soru en fazla {MAX_QUESTION_CHARS} karakter olabilir"
        )));
    }

    let uid = UserId::from(user.0.uid.as_str());
    let today = DayKey::today();
    let ledger = UsageLedger::new(state.firestore());

    let check = ledger.check_limit(&uid, &today).await;
    if !check.allowed {
        return Err(AppError::RateLimited {
            reason: check
                .reason
                .unwrap_or_else(|| "Mesaj limitiniz doldu".to_string()),
            limits: json!({ "daily_used": check.used, "daily_limit": check.limit }),
        });
    }

    let slug = state.config().default_restaurant.as_str();
    let restaurants = RestaurantRepository::new(state.firestore(), state.identity());
    let restaurant = restaurants
        .get(slug)
        .await
        .map_err(super::auth::map_repo_err)?
        .ok_or_else(|| AppError::NotFound("Restaurant not found".to_string()))?;

    let menus: Vec<_> = MenuRepository::new(state.firestore())
        .for_restaurant(&restaurant.id)
        .await
        .map_err(super::auth::map_repo_err)?
        .into_iter()
        .map(|m| m.record)
        .collect();

    let context = prompt::restaurant_context(&restaurant.record, &menus);
    let answer = state
        .gemini()
        .complete(&prompt::question_prompt(&context, question))
        .await
        .map_err(AppError::Ai)?;

    ledger
        .record_message(&uid, &today)
        .await
        .map_err(super::auth::map_repo_err)?;

    if let Err(err) = ChatRepository::new(state.firestore())
        .save_message(&uid, question, &answer, &restaurant.id, &today)
        .await
    {
        warn!(error = %err, "failed to save chat message");
    }

    let usage_stats = ledger
        .stats(&uid, &today)
        .await
        .map_err(super::auth::map_repo_err)?;

    Ok(Json(json!({
        "success": true,
        "answer": answer,
        "usage_stats": usage_stats,
    })))
}

/// GET /api/usage/stats - the caller's usage for the current day.
#[instrument(skip_all, fields(uid = %user.0.uid))]
pub async fn usage_stats(
    State(state): State<AppState>,
    user: RequireAuth,
) -> Result<impl IntoResponse, AppError> {
    let uid = UserId::from(user.0.uid.as_str());
    let stats = UsageLedger::new(state.firestore())
        .stats(&uid, &DayKey::today())
        .await
        .map_err(super::auth::map_repo_err)?;
    Ok(Json(stats))
}

/// GET /api/chat/history - the caller's recent chat exchanges.
#[instrument(skip_all, fields(uid = %user.0.uid))]
pub async fn history(
    State(state): State<AppState>,
    user: RequireAuth,
) -> Result<impl IntoResponse, AppError> {
    let uid = UserId::from(user.0.uid.as_str());
    let entries = ChatRepository::new(state.firestore())
        .history(&uid, HISTORY_LIMIT)
        .await
        .map_err(super::auth::map_repo_err)?;
    Ok(Json(json!({ "history": entries })))
}
