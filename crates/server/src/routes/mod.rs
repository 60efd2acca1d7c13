//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                       - Landing page
//! GET  /restaurant             - Restaurant page with chat assistant
//! GET  /logout                 - Clear the session
//!
//! # Auth (per-IP rate limited)
//! POST /api/auth/login         - Verify token, open session
//! POST /api/auth/register      - Verify token, ensure role record, open session
//! POST /api/auth/verify        - Re-verify token
//! GET  /api/auth/status        - Session state
//!
//! # Chat (requires auth)
//! POST /api/chat               - Ask the restaurant assistant
//! GET  /api/usage/stats        - Current day's quota usage
//! GET  /api/chat/history       - Recent exchanges
//!
//! # AI (requires auth)
//! POST /api/ai/analyze-menu-image - Extract a structured menu from a photo
//!
//! # Admin (requires admin role)
//! GET|POST   /api/admin/restaurants
//! PUT|DELETE /api/admin/restaurants/{slug}
//! POST       /api/admin/restaurants/{slug}/assign-role
//! GET|POST   /api/admin/cuisines
//! PUT|DELETE /api/admin/cuisines/{id}
//! GET|POST   /api/admin/users
//! DELETE     /api/admin/users/{uid}
//! PUT        /api/admin/users/{uid}/role
//!
//! # Editor (requires editor or admin role; editors ownership-checked)
//! GET        /api/editor/restaurants
//! GET        /api/editor/stats
//! PUT|DELETE /api/editor/restaurants/{slug}
//! GET|POST   /api/editor/menus
//! PUT|DELETE /api/editor/menus/{id}
//!
//! # Status (no auth)
//! GET /api/health
//! GET /api/ai-status
//! GET /api/firebase-status
//! ```

pub mod admin;
pub mod ai;
pub mod auth;
pub mod chat;
pub mod editor;
pub mod pages;
pub mod status;

use axum::{
    Router,
    routing::{delete, get, post, put},
};

use crate::middleware::rate_limit::auth_rate_limiter;
use crate::state::AppState;

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/login", post(auth::login))
        .route("/register", post(auth::register))
        .route("/verify", post(auth::verify))
        .layer(auth_rate_limiter())
        .route("/status", get(auth::status))
}

/// Create the admin routes router.
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/restaurants",
            get(admin::list_restaurants).post(admin::create_restaurant),
        )
        .route(
            "/restaurants/{slug}",
            put(admin::update_restaurant).delete(admin::delete_restaurant),
        )
        .route(
            "/restaurants/{slug}/assign-role",
            post(admin::assign_restaurant_role),
        )
        .route(
            "/cuisines",
            get(admin::list_cuisines).post(admin::create_cuisine),
        )
        .route(
            "/cuisines/{id}",
            put(admin::update_cuisine).delete(admin::delete_cuisine),
        )
        .route("/users", get(admin::list_users).post(admin::create_user))
        .route("/users/{uid}", delete(admin::delete_user))
        .route("/users/{uid}/role", put(admin::set_user_role))
}

/// Create the editor routes router.
pub fn editor_routes() -> Router<AppState> {
    Router::new()
        .route("/restaurants", get(editor::list_restaurants))
        .route("/stats", get(editor::stats))
        .route(
            "/restaurants/{slug}",
            put(editor::update_restaurant).delete(editor::delete_restaurant),
        )
        .route("/menus", get(editor::list_menus).post(editor::create_menu))
        .route(
            "/menus/{id}",
            put(editor::update_menu).delete(editor::delete_menu),
        )
}

/// Create all routes for the server.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(pages::index))
        .route("/restaurant", get(pages::restaurant))
        .route("/logout", get(pages::logout))
        .nest("/api/auth", auth_routes())
        .route("/api/chat", post(chat::ask))
        .route("/api/chat/history", get(chat::history))
        .route("/api/usage/stats", get(chat::usage_stats))
        .route("/api/ai/analyze-menu-image", post(ai::analyze_menu_image))
        .nest("/api/admin", admin_routes())
        .nest("/api/editor", editor_routes())
        .route("/api/health", get(status::health))
        .route("/api/ai-status", get(status::ai_status))
        .route("/api/firebase-status", get(status::firebase_status))
}
