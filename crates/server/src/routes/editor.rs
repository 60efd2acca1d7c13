//! Editor endpoints: the assigned editor's restaurants and menus.
//!
//! Admins pass the role gate and bypass ownership checks; editors may only
//! touch restaurants carrying their editor reference, and menus of those
//! restaurants.

use axum::{
    Json,
    extract::{Path, State},
    response::IntoResponse,
};
use lezzet_core::types::{MenuId, UserId};
use serde::Deserialize;
use serde_json::json;
use tracing::instrument;

use crate::db::{MenuRepository, RestaurantRepository};
use crate::error::AppError;
use crate::middleware::RequireEditor;
use crate::models::menu::{Menu, MenuCategory};
use crate::state::AppState;

use super::auth::map_repo_err;

/// GET /api/editor/restaurants - the caller's assigned restaurants
/// (all restaurants for admins).
#[instrument(skip_all, fields(uid = %editor.0.uid))]
pub async fn list_restaurants(
    State(state): State<AppState>,
    editor: RequireEditor,
) -> Result<impl IntoResponse, AppError> {
    let repo = RestaurantRepository::new(state.firestore(), state.identity());
    let restaurants = if editor.0.is_admin() {
        repo.list().await.map_err(map_repo_err)?
    } else {
        repo.for_editor(&UserId::from(editor.0.uid.as_str()))
            .await
            .map_err(map_repo_err)?
    };
    Ok(Json(json!({ "restaurants": restaurants })))
}

/// GET /api/editor/stats - aggregate statistics for the caller's
/// restaurants.
#[instrument(skip_all, fields(uid = %editor.0.uid))]
pub async fn stats(
    State(state): State<AppState>,
    editor: RequireEditor,
) -> Result<impl IntoResponse, AppError> {
    let stats = RestaurantRepository::new(state.firestore(), state.identity())
        .editor_stats(&UserId::from(editor.0.uid.as_str()))
        .await
        .map_err(map_repo_err)?;
    Ok(Json(stats))
}

/// Restaurant fields editors may change. Editor and owner assignments stay
/// admin-only.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditableRestaurantPayload {
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
}

const fn default_true() -> bool {
    true
}

async fn require_restaurant_ownership(
    repo: &RestaurantRepository<'_>,
    editor: &RequireEditor,
    slug: &str,
) -> Result<(), AppError> {
    if editor.0.is_admin() {
        return Ok(());
    }
    let owns = repo
        .can_editor_edit(&UserId::from(editor.0.uid.as_str()), slug)
        .await
        .map_err(map_repo_err)?;
    if owns {
        Ok(())
    } else {
        Err(AppError::Forbidden(
            "You are not assigned to this restaurant".to_string(),
        ))
    }
}

/// PUT /api/editor/restaurants/{slug}
#[instrument(skip_all, fields(uid = %editor.0.uid, slug = %slug))]
pub async fn update_restaurant(
    State(state): State<AppState>,
    editor: RequireEditor,
    Path(slug): Path<String>,
    Json(payload): Json<EditableRestaurantPayload>,
) -> Result<impl IntoResponse, AppError> {
    if payload.name.trim().is_empty() {
        return Err(AppError::BadRequest("name is required".to_string()));
    }

    let repo = RestaurantRepository::new(state.firestore(), state.identity());
    require_restaurant_ownership(&repo, &editor, &slug).await?;

    let existing = repo
        .get(&slug)
        .await
        .map_err(map_repo_err)?
        .ok_or_else(|| AppError::NotFound("Restaurant not found".to_string()))?;

    let mut record = existing.record;
    record.name = payload.name.trim().to_string();
    record.description = payload.description;
    record.cuisine_types = payload.cuisine_types;
    record.tags = payload.tags;
    record.phone = payload.phone;
    record.email = payload.email;
    record.website = payload.website;
    record.address = payload.address;
    record.hours = payload.hours;
    record.is_active = payload.is_active;

    let stored = repo.update(&slug, record).await.map_err(map_repo_err)?;
    Ok(Json(json!({ "success": true, "restaurant": stored })))
}

/// DELETE /api/editor/restaurants/{slug}
#[instrument(skip_all, fields(uid = %editor.0.uid, slug = %slug))]
pub async fn delete_restaurant(
    State(state): State<AppState>,
    editor: RequireEditor,
    Path(slug): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let repo = RestaurantRepository::new(state.firestore(), state.identity());
    require_restaurant_ownership(&repo, &editor, &slug).await?;
    repo.delete(&slug).await.map_err(map_repo_err)?;
    Ok(Json(json!({ "success": true })))
}

/// GET /api/editor/menus - menus of the caller's restaurants (all menus
/// for admins).
#[instrument(skip_all, fields(uid = %editor.0.uid))]
pub async fn list_menus(
    State(state): State<AppState>,
    editor: RequireEditor,
) -> Result<impl IntoResponse, AppError> {
    let repo = MenuRepository::new(state.firestore());
    let menus = if editor.0.is_admin() {
        repo.list().await.map_err(map_repo_err)?
    } else {
        repo.for_editor(&UserId::from(editor.0.uid.as_str()))
            .await
            .map_err(map_repo_err)?
    };
    Ok(Json(json!({ "menus": menus })))
}

/// Incoming menu fields, shared by create and update.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuPayload {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub restaurant_id: String,
    #[serde(default = "default_language")]
    pub language: String,
    #[serde(default)]
    pub categories: Vec<MenuCategory>,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(rename = "isAIGenerated", default)]
    pub is_ai_generated: serde_json::Map<String, serde_json::Value>,
}

fn default_language() -> String {
    "tr".to_string()
}

impl MenuPayload {
    fn into_record(self) -> Result<Menu, AppError> {
        if self.name.trim().is_empty() {
            return Err(AppError::BadRequest("name is required".to_string()));
        }
        if self.restaurant_id.trim().is_empty() {
            return Err(AppError::BadRequest("restaurantId is required".to_string()));
        }
        Ok(Menu {
            name: self.name.trim().to_string(),
            description: self.description,
            restaurant_id: self.restaurant_id,
            language: self.language,
            categories: self.categories,
            is_active: self.is_active,
            is_ai_generated: self.is_ai_generated,
            restaurant_name: None,
        })
    }
}

/// POST /api/editor/menus
#[instrument(skip_all, fields(uid = %editor.0.uid))]
pub async fn create_menu(
    State(state): State<AppState>,
    editor: RequireEditor,
    Json(payload): Json<MenuPayload>,
) -> Result<impl IntoResponse, AppError> {
    let record = payload.into_record()?;

    let restaurants = RestaurantRepository::new(state.firestore(), state.identity());
    require_restaurant_ownership(&restaurants, &editor, &record.restaurant_id).await?;

    let stored = MenuRepository::new(state.firestore())
        .create(&record)
        .await
        .map_err(map_repo_err)?;
    Ok(Json(json!({ "success": true, "menu": stored })))
}

async fn require_menu_ownership(
    repo: &MenuRepository<'_>,
    editor: &RequireEditor,
    id: &MenuId,
) -> Result<(), AppError> {
    if editor.0.is_admin() {
        return Ok(());
    }
    let owns = repo
        .can_editor_edit(&UserId::from(editor.0.uid.as_str()), id)
        .await
        .map_err(map_repo_err)?;
    if owns {
        Ok(())
    } else {
        Err(AppError::Forbidden(
            "You are not assigned to this menu's restaurant".to_string(),
        ))
    }
}

/// PUT /api/editor/menus/{id}
#[instrument(skip_all, fields(uid = %editor.0.uid, id = %id))]
pub async fn update_menu(
    State(state): State<AppState>,
    editor: RequireEditor,
    Path(id): Path<String>,
    Json(payload): Json<MenuPayload>,
) -> Result<impl IntoResponse, AppError> {
    let record = payload.into_record()?;
    let id = MenuId::from(id);

    let repo = MenuRepository::new(state.firestore());
    require_menu_ownership(&repo, &editor, &id).await?;

    let stored = repo.update(&id, &record).await.map_err(map_repo_err)?;
    Ok(Json(json!({ "success": true, "menu": stored })))
}

/// DELETE /api/editor/menus/{id}
#[instrument(skip_all, fields(uid = %editor.0.uid, id = %id))]
pub async fn delete_menu(
    State(state): State<AppState>,
    editor: RequireEditor,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let id = MenuId::from(id);
    let repo = MenuRepository::new(state.firestore());
    require_menu_ownership(&repo, &editor, &id).await?;
    repo.delete(&id).await.map_err(map_repo_err)?;
    Ok(Json(json!({ "success": true })))
}
