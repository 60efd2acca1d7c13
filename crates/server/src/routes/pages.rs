//! HTML page handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::State,
    response::{IntoResponse, Redirect},
};
use tower_sessions::Session;
use tracing::instrument;

use crate::error::{AppError, clear_sentry_user};
use crate::middleware::OptionalAuth;
use crate::middleware::auth::clear_current_user;
use crate::models::CurrentUser;
use crate::state::AppState;

/// Landing page.
#[derive(Template, WebTemplate)]
#[template(path = "index.html")]
pub struct IndexTemplate {
    pub user: Option<CurrentUser>,
}

/// Restaurant page with the chat assistant.
#[derive(Template, WebTemplate)]
#[template(path = "restaurant.html")]
pub struct RestaurantTemplate {
    pub user: Option<CurrentUser>,
    pub restaurant_name: String,
}

/// GET / - landing page.
#[instrument(skip_all)]
pub async fn index(OptionalAuth(user): OptionalAuth) -> impl IntoResponse {
    IndexTemplate { user }
}

/// GET /restaurant - restaurant page.
#[instrument(skip_all)]
pub async fn restaurant(
    State(state): State<AppState>,
    OptionalAuth(user): OptionalAuth,
) -> Result<impl IntoResponse, AppError> {
    let slug = state.config().default_restaurant.as_str();
    let restaurant = crate::db::RestaurantRepository::new(state.firestore(), state.identity())
        .get(slug)
        .await
        .map_err(AppError::Repository)?;

    let restaurant_name = restaurant
        .map(|r| r.record.name)
        .unwrap_or_else(|| "Restoran".to_string());

    Ok(RestaurantTemplate {
        user,
        restaurant_name,
    })
}

/// GET /logout - clear the session and return to the landing page.
#[instrument(skip_all)]
pub async fn logout(session: Session) -> Result<impl IntoResponse, AppError> {
    clear_current_user(&session)
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?;
    clear_sentry_user();
    Ok(Redirect::to("/"))
}
