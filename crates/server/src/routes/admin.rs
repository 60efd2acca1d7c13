//! Admin endpoints: restaurant, cuisine, and user management.
//!
//! Every handler is gated on the admin role by the `RequireAdmin`
//! extractor.

use axum::{
    Json,
    extract::{Path, State},
    response::IntoResponse,
};
use lezzet_core::types::{CuisineId, Email, Role, UserId};
use serde::Deserialize;
use serde_json::json;
use tracing::instrument;

use crate::db::{AssignableRole, CuisineRepository, RestaurantRepository, UserRepository};
use crate::error::AppError;
use crate::middleware::RequireAdmin;
use crate::models::cuisine::Cuisine;
use crate::models::restaurant::{OwnerRef, Restaurant};
use crate::state::AppState;

use super::auth::map_repo_err;

/// Incoming restaurant fields, shared by create and update.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RestaurantPayload {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub cuisine_types: Vec<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub hours: serde_json::Map<String, serde_json::Value>,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub is_featured: bool,
    #[serde(default)]
    pub owner: Option<OwnerRef>,
    /// Editor assignment by email; resolved to a UID on write.
    #[serde(default)]
    pub editor: Option<EditorPayload>,
}

#[derive(Debug, Deserialize)]
pub struct EditorPayload {
    pub email: String,
}

const fn default_true() -> bool {
    true
}

/// Validate a raw email from a request body, trimming surrounding whitespace.
fn parse_email(raw: &str) -> Result<Email, AppError> {
    Email::parse(raw.trim()).map_err(|e| AppError::BadRequest(format!("Invalid email: {e}")))
}

impl RestaurantPayload {
    fn validate(&self) -> Result<(), AppError> {
        if self.name.trim().is_empty() {
            return Err(AppError::BadRequest("name is required".to_string()));
        }
        Ok(())
    }
}

async fn build_restaurant(
    repo: &RestaurantRepository<'_>,
    payload: RestaurantPayload,
) -> Result<Restaurant, AppError> {
    payload.validate()?;

    let editor = match payload.editor {
        Some(editor) if !editor.email.trim().is_empty() => {
            let email = parse_email(&editor.email)?;
            repo.resolve_editor(&email).await.map_err(map_repo_err)?
        }
        _ => None,
    };

    Ok(Restaurant {
        slug: String::new(),
        name: payload.name.trim().to_string(),
        description: payload.description,
        cuisine_types: payload.cuisine_types,
        tags: payload.tags,
        phone: payload.phone,
        email: payload.email,
        website: payload.website,
        address: payload.address,
        hours: payload.hours,
        is_active: payload.is_active,
        is_featured: payload.is_featured,
        owner: payload.owner.filter(|o| !o.email.trim().is_empty()),
        editor,
    })
}

/// GET /api/admin/restaurants
#[instrument(skip_all)]
pub async fn list_restaurants(
    State(state): State<AppState>,
    _admin: RequireAdmin,
) -> Result<impl IntoResponse, AppError> {
    let restaurants = RestaurantRepository::new(state.firestore(), state.identity())
        .list()
        .await
        .map_err(map_repo_err)?;
    Ok(Json(json!({ "restaurants": restaurants })))
}

/// POST /api/admin/restaurants
#[instrument(skip_all)]
pub async fn create_restaurant(
    State(state): State<AppState>,
    _admin: RequireAdmin,
    Json(payload): Json<RestaurantPayload>,
) -> Result<impl IntoResponse, AppError> {
    let repo = RestaurantRepository::new(state.firestore(), state.identity());
    let record = build_restaurant(&repo, payload).await?;
    let stored = repo.create(record).await.map_err(map_repo_err)?;
    Ok(Json(json!({ "success": true, "restaurant": stored })))
}

/// PUT /api/admin/restaurants/{slug}
#[instrument(skip_all, fields(slug = %slug))]
pub async fn update_restaurant(
    State(state): State<AppState>,
    _admin: RequireAdmin,
    Path(slug): Path<String>,
    Json(payload): Json<RestaurantPayload>,
) -> Result<impl IntoResponse, AppError> {
    let repo = RestaurantRepository::new(state.firestore(), state.identity());
    let record = build_restaurant(&repo, payload).await?;
    let stored = repo.update(&slug, record).await.map_err(map_repo_err)?;
    Ok(Json(json!({ "success": true, "restaurant": stored })))
}

/// DELETE /api/admin/restaurants/{slug}
#[instrument(skip_all, fields(slug = %slug))]
pub async fn delete_restaurant(
    State(state): State<AppState>,
    _admin: RequireAdmin,
    Path(slug): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    RestaurantRepository::new(state.firestore(), state.identity())
        .delete(&slug)
        .await
        .map_err(map_repo_err)?;
    Ok(Json(json!({ "success": true })))
}

#[derive(Debug, Deserialize)]
pub struct AssignRolePayload {
    pub email: String,
    pub role: String,
}

/// POST /api/admin/restaurants/{slug}/assign-role
#[instrument(skip_all, fields(slug = %slug))]
pub async fn assign_restaurant_role(
    State(state): State<AppState>,
    _admin: RequireAdmin,
    Path(slug): Path<String>,
    Json(payload): Json<AssignRolePayload>,
) -> Result<impl IntoResponse, AppError> {
    let role = AssignableRole::parse(&payload.role)
        .ok_or_else(|| AppError::BadRequest(format!("Invalid role: {}", payload.role)))?;
    let email = parse_email(&payload.email)?;

    RestaurantRepository::new(state.firestore(), state.identity())
        .assign_role(&slug, &email, role)
        .await
        .map_err(|err| match err {
            crate::db::RepositoryError::NotFound => {
                AppError::NotFound("User with that email not found".to_string())
            }
            other => AppError::Repository(other),
        })?;
    Ok(Json(json!({ "success": true })))
}

/// Incoming cuisine fields, shared by create and update.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CuisinePayload {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

impl CuisinePayload {
    fn into_record(self) -> Result<Cuisine, AppError> {
        if self.name.trim().is_empty() {
            return Err(AppError::BadRequest("name is required".to_string()));
        }
        Ok(Cuisine {
            name: self.name.trim().to_string(),
            description: self.description,
            is_active: self.is_active,
        })
    }
}

/// GET /api/admin/cuisines
#[instrument(skip_all)]
pub async fn list_cuisines(
    State(state): State<AppState>,
    _admin: RequireAdmin,
) -> Result<impl IntoResponse, AppError> {
    let cuisines = CuisineRepository::new(state.firestore())
        .list_with_counts()
        .await
        .map_err(map_repo_err)?;
    Ok(Json(json!({ "cuisines": cuisines })))
}

/// POST /api/admin/cuisines
#[instrument(skip_all)]
pub async fn create_cuisine(
    State(state): State<AppState>,
    _admin: RequireAdmin,
    Json(payload): Json<CuisinePayload>,
) -> Result<impl IntoResponse, AppError> {
    let record = payload.into_record()?;
    let stored = CuisineRepository::new(state.firestore())
        .create(&record)
        .await
        .map_err(map_repo_err)?;
    Ok(Json(json!({ "success": true, "cuisine": stored })))
}

/// PUT /api/admin/cuisines/{id}
#[instrument(skip_all, fields(id = %id))]
pub async fn update_cuisine(
    State(state): State<AppState>,
    _admin: RequireAdmin,
    Path(id): Path<String>,
    Json(payload): Json<CuisinePayload>,
) -> Result<impl IntoResponse, AppError> {
    let record = payload.into_record()?;
    let stored = CuisineRepository::new(state.firestore())
        .update(&CuisineId::from(id), &record)
        .await
        .map_err(map_repo_err)?;
    Ok(Json(json!({ "success": true, "cuisine": stored })))
}

/// DELETE /api/admin/cuisines/{id}
#[instrument(skip_all, fields(id = %id))]
pub async fn delete_cuisine(
    State(state): State<AppState>,
    _admin: RequireAdmin,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    CuisineRepository::new(state.firestore())
        .delete(&CuisineId::from(id))
        .await
        .map_err(map_repo_err)?;
    Ok(Json(json!({ "success": true })))
}

/// GET /api/admin/users
#[instrument(skip_all)]
pub async fn list_users(
    State(state): State<AppState>,
    _admin: RequireAdmin,
) -> Result<impl IntoResponse, AppError> {
    let users = UserRepository::new(state.firestore(), state.identity())
        .list_users()
        .await
        .map_err(map_repo_err)?;
    Ok(Json(json!({ "users": users })))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserPayload {
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default = "default_role")]
    pub role: String,
}

fn default_role() -> String {
    Role::default().as_str().to_string()
}

/// POST /api/admin/users
#[instrument(skip_all)]
pub async fn create_user(
    State(state): State<AppState>,
    _admin: RequireAdmin,
    Json(payload): Json<CreateUserPayload>,
) -> Result<impl IntoResponse, AppError> {
    let email = parse_email(&payload.email)?;
    if payload.password.len() < 6 {
        return Err(AppError::BadRequest(
            "password must be at least 6 characters".to_string(),
        ));
    }
    let role: Role = payload
        .role
        .parse()
        .map_err(|_| AppError::BadRequest(format!("Invalid role: {}", payload.role)))?;

    let user = UserRepository::new(state.firestore(), state.identity())
        .create_user(&email, &payload.password, payload.display_name.as_deref(), role)
        .await
        .map_err(map_repo_err)?;
    Ok(Json(json!({ "success": true, "user": user })))
}

/// DELETE /api/admin/users/{uid}
#[instrument(skip_all, fields(uid = %uid))]
pub async fn delete_user(
    State(state): State<AppState>,
    _admin: RequireAdmin,
    Path(uid): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    UserRepository::new(state.firestore(), state.identity())
        .delete_user(&UserId::from(uid.as_str()))
        .await
        .map_err(map_repo_err)?;
    Ok(Json(json!({ "success": true })))
}

#[derive(Debug, Deserialize)]
pub struct SetRolePayload {
    pub role: String,
}

/// PUT /api/admin/users/{uid}/role
#[instrument(skip_all, fields(uid = %uid))]
pub async fn set_user_role(
    State(state): State<AppState>,
    _admin: RequireAdmin,
    Path(uid): Path<String>,
    Json(payload): Json<SetRolePayload>,
) -> Result<impl IntoResponse, AppError> {
    let role: Role = payload
        .role
        .parse()
        .map_err(|_| AppError::BadRequest(format!("Invalid role: {}", payload.role)))?;

    UserRepository::new(state.firestore(), state.identity())
        .set_role(&UserId::from(uid.as_str()), role)
        .await
        .map_err(map_repo_err)?;
    Ok(Json(json!({ "success": true })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_email_trims_and_accepts() {
        let email = parse_email("  editor@example.com  ").expect("valid email");
        assert_eq!(email.as_str(), "editor@example.com");
    }

    #[test]
    fn test_create_user_payload_defaults_to_subscriber() {
        let payload: CreateUserPayload = serde_json::from_value(serde_json::json!({
            "email": "new@example.com",
            "password": "s3cret",
        }))
        .expect("deserialize");
        assert_eq!(payload.role, "subscriber");
        assert!(payload.display_name.is_none());

        let named: CreateUserPayload = serde_json::from_value(serde_json::json!({
            "email": "new@example.com",
            "password": "s3cret",
            "displayName": "Ayşe",
            "role": "editor",
        }))
        .expect("deserialize");
        assert_eq!(named.display_name.as_deref(), Some("Ayşe"));
        assert_eq!(named.role, "editor");
    }

    #[test]
    fn test_parse_email_rejects_malformed_input() {
        for raw in ["", "   ", "no-at-symbol", "@example.com", "user@"] {
            let err = parse_email(raw).expect_err("must reject");
            assert!(matches!(err, AppError::BadRequest(_)), "input: {raw:?}");
        }
    }
}
