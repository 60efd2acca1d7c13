//! HTTP middleware: sessions, auth extractors, rate limiting.

pub mod auth;
pub mod rate_limit;
pub mod session;

pub use auth::{OptionalAuth, RequireAdmin, RequireAuth, RequireEditor};
pub use session::create_session_layer;
