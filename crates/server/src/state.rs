//! Application state shared across handlers.

use std::sync::Arc;

use crate::config::AppConfig;
use crate::firebase::IdentityClient;
use crate::firestore::FirestoreClient;
use crate::gemini::GeminiClient;

/// Application state shared across all handlers.
///
/// Cheaply cloneable via `Arc`; holds the configuration and the three
/// gateway clients, constructed once at startup and injected through axum
/// state.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: AppConfig,
    identity: IdentityClient,
    firestore: FirestoreClient,
    gemini: GeminiClient,
}

impl AppState {
    /// Create a new application state from configuration.
    #[must_use]
    pub fn new(config: AppConfig) -> Self {
        let identity = IdentityClient::new(&config.firebase);
        let firestore = FirestoreClient::new(&config.firebase);
        let gemini = GeminiClient::new(&config.gemini);

        Self {
            inner: Arc::new(AppStateInner {
                config,
                identity,
                firestore,
                gemini,
            }),
        }
    }

    /// Get a reference to the application configuration.
    #[must_use]
    pub fn config(&self) -> &AppConfig {
        &self.inner.config
    }

    /// Get a reference to the identity provider client.
    #[must_use]
    pub fn identity(&self) -> &IdentityClient {
        &self.inner.identity
    }

    /// Get a reference to the document store client.
    #[must_use]
    pub fn firestore(&self) -> &FirestoreClient {
        &self.inner.firestore
    }

    /// Get a reference to the AI completion client.
    #[must_use]
    pub fn gemini(&self) -> &GeminiClient {
        &self.inner.gemini
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_state_is_clone_send_sync() {
        fn assert_clone<T: Clone>() {}
        fn assert_send_sync<T: Send + Sync>() {}
        assert_clone::<AppState>();
        assert_send_sync::<AppState>();
    }
}
