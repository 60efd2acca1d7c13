//! Token-verification auth endpoints.
//!
//! The client signs in against the identity provider directly and posts
//! the resulting ID token here; the server verifies it, resolves the
//! stored role, and opens a session.

use axum::{Json, extract::State, response::IntoResponse};
use lezzet_core::types::UserId;
use serde::Deserialize;
use serde_json::json;
use tower_sessions::Session;
use tracing::{info, instrument};

use crate::db::{RepositoryError, UserRepository};
use crate::error::{AppError, set_sentry_user};
use crate::firebase::AuthUser;
use crate::middleware::OptionalAuth;
use crate::middleware::auth::set_current_user;
use crate::models::CurrentUser;
use crate::state::AppState;

/// Token payload accepted in both snake_case and camelCase.
#[derive(Debug, Deserialize)]
pub struct TokenPayload {
    #[serde(alias = "idToken")]
    pub id_token: String,
}

/// POST /api/auth/login - verify a token and open a session.
#[instrument(skip_all)]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Json(payload): Json<TokenPayload>,
) -> Result<impl IntoResponse, AppError> {
    let user = establish_session(&state, &session, &payload.id_token, false).await?;
    Ok(Json(json!({ "success": true, "user": user })))
}

/// POST /api/auth/register - verify a freshly created account's token,
/// ensure a role record exists, and open a session.
#[instrument(skip_all)]
pub async fn register(
    State(state): State<AppState>,
    session: Session,
    Json(payload): Json<TokenPayload>,
) -> Result<impl IntoResponse, AppError> {
    let user = establish_session(&state, &session, &payload.id_token, true).await?;
    Ok(Json(json!({ "success": true, "user": user })))
}

/// POST /api/auth/verify - re-verify a token for an existing session.
#[instrument(skip_all)]
pub async fn verify(
    State(state): State<AppState>,
    session: Session,
    Json(payload): Json<TokenPayload>,
) -> Result<impl IntoResponse, AppError> {
    let user = establish_session(&state, &session, &payload.id_token, false).await?;
    Ok(Json(json!({ "success": true, "user": user })))
}

/// GET /api/auth/status - report the session state.
#[instrument(skip_all)]
pub async fn status(OptionalAuth(user): OptionalAuth) -> impl IntoResponse {
    match user {
        Some(user) => Json(json!({ "authenticated": true, "user": user })),
        None => Json(json!({ "authenticated": false, "user": null })),
    }
}

async fn establish_session(
    state: &AppState,
    session: &Session,
    id_token: &str,
    new_account: bool,
) -> Result<CurrentUser, AppError> {
    if id_token.trim().is_empty() {
        return Err(AppError::BadRequest("id_token is required".to_string()));
    }

    let profile = state
        .identity()
        .verify_token(id_token)
        .await
        .map_err(AppError::Identity)?
        .ok_or_else(|| AppError::Unauthorized("Invalid or expired token".to_string()))?;

    let users = UserRepository::new(state.firestore(), state.identity());
    let uid = UserId::from(profile.uid.as_str());

    if new_account {
        users
            .ensure_role_record(&uid)
            .await
            .map_err(map_repo_err)?;
    }

    let role = users.role_of(&uid).await.map_err(map_repo_err)?;
    let user = current_user_from(profile, role);

    set_current_user(session, &user)
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?;
    set_sentry_user(&user.uid, user.email.as_deref());
    info!(uid = %user.uid, role = ?user.role, "session established");

    Ok(user)
}

fn current_user_from(profile: AuthUser, role: lezzet_core::types::Role) -> CurrentUser {
    CurrentUser {
        uid: profile.uid,
        email: profile.email,
        display_name: profile.display_name,
        photo_url: profile.photo_url,
        role,
    }
}

pub(crate) fn map_repo_err(err: RepositoryError) -> AppError {
    match err {
        RepositoryError::NotFound => AppError::NotFound("Record not found".to_string()),
        other => AppError::Repository(other),
    }
}
