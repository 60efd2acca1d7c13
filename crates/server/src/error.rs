//! Unified error handling for the server.
//!
//! Every external-call failure is caught at the handler boundary and converted
//! to a JSON `{error}` body; nothing propagates far enough to crash a handler,
//! and no automatic retries happen anywhere.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::db::RepositoryError;
use crate::firebase::IdentityError;
use crate::firestore::FirestoreError;
use crate::gemini::GeminiError;

/// Application-level error type.
#[derive(Debug, Error)]
pub enum AppError {
    /// Identity provider operation failed.
    #[error("Identity error: {0}")]
    Identity(#[from] IdentityError),

    /// Record store operation failed.
    #[error("Record store error: {0}")]
    Store(#[from] FirestoreError),

    /// Repository operation failed.
    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),

    /// AI completion operation failed.
    #[error("AI error: {0}")]
    Ai(#[from] GeminiError),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// User is not authenticated.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// User lacks permission.
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Daily message quota exhausted.
    #[error("Rate limited: {reason}")]
    RateLimited {
        /// Human-readable reason for the client.
        reason: String,
        /// Current limit state echoed back for display.
        limits: serde_json::Value,
    },

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Log server errors with Sentry
        if matches!(
            self,
            Self::Identity(_) | Self::Store(_) | Self::Repository(_) | Self::Ai(_) | Self::Internal(_)
        ) {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        let status = match &self {
            // All upstream-dependency failures map to 500 per the error taxonomy
            Self::Identity(_) | Self::Store(_) | Self::Repository(_) | Self::Ai(_) | Self::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::RateLimited { .. } => StatusCode::TOO_MANY_REQUESTS,
        };

        // Don't expose internal error details to clients
        let body = match &self {
            Self::Internal(_) => json!({ "error": "Internal server error" }),
            Self::Identity(_) => json!({ "error": "Identity service error" }),
            Self::Store(_) | Self::Repository(_) => json!({ "error": "Record store error" }),
            Self::Ai(_) => json!({ "error": "AI service error" }),
            Self::RateLimited { reason, limits } => json!({ "error": reason, "limits": limits }),
            other => json!({ "error": other.to_string() }),
        };

        (status, Json(body)).into_response()
    }
}

/// Set the Sentry user context from an authenticated user ID.
pub fn set_sentry_user(uid: &str, email: Option<&str>) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            id: Some(uid.to_owned()),
            email: email.map(String::from),
            ..Default::default()
        }));
    });
}

/// Clear the Sentry user context.
pub fn clear_sentry_user() {
    sentry::configure_scope(|scope| {
        scope.set_user(None);
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_error_display() {
        let err = AppError::NotFound("restaurant lezzet-duragi".to_string());
        assert_eq!(err.to_string(), "Not found: restaurant lezzet-duragi");

        let err = AppError::BadRequest("question too long".to_string());
        assert_eq!(err.to_string(), "Bad request: question too long");
    }

    #[test]
    fn test_app_error_status_codes() {
        fn get_status(err: AppError) -> StatusCode {
            err.into_response().status()
        }

        assert_eq!(
            get_status(AppError::NotFound("test".to_string())),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            get_status(AppError::Unauthorized("test".to_string())),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            get_status(AppError::Forbidden("test".to_string())),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            get_status(AppError::BadRequest("test".to_string())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            get_status(AppError::Internal("test".to_string())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            get_status(AppError::RateLimited {
                reason: "daily limit".to_string(),
                limits: serde_json::json!({ "daily_used": 10 }),
            }),
            StatusCode::TOO_MANY_REQUESTS
        );
    }
}
