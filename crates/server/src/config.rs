//! Server configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `FIREBASE_PROJECT_ID` - Firebase / Firestore project ID
//! - `FIREBASE_API_KEY` - Firebase Web API key (identity + record store REST)
//! - `GEMINI_API_KEY` - Gemini API key
//!
//! ## Optional
//! - `LEZZET_HOST` - Bind address (default: 127.0.0.1)
//! - `LEZZET_PORT` - Listen port (default: 5001)
//! - `LEZZET_BASE_URL` - Public base URL (default: `http://localhost:5001`)
//! - `LEZZET_DEFAULT_RESTAURANT` - Slug used for chat context (default: lezzet-duragi)
//! - `LEZZET_SEED_ADMIN_UID` - User ID given the admin role at startup
//! - `FIRESTORE_DATABASE_ID` - Firestore database (default: `(default)`)
//! - `GEMINI_MODEL` - Gemini model ID (default: gemini-1.5-flash-latest)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `SENTRY_SAMPLE_RATE` / `SENTRY_TRACES_SAMPLE_RATE` - Sampling (default 1.0)

use std::collections::HashMap;
use std::net::{IpAddr, SocketAddr};

use lezzet_core::RestaurantSlug;
use secrecy::SecretString;
use thiserror::Error;

const MIN_ENTROPY_BITS_PER_CHAR: f64 = 3.3;
const DEFAULT_GEMINI_MODEL: &str = "gemini-1.5-flash-latest";
const DEFAULT_RESTAURANT_SLUG: &str = "lezzet-duragi";

/// Blocklist of common placeholder patterns (case-insensitive)
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your-",
    "changeme",
    "replace",
    "placeholder",
    "example",
    "secret",
    "password",
    "xxx",
    "todo",
    "fixme",
    "insert",
    "enter-",
    "put-your",
    "add-your",
];

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Insecure secret in {0}: {1}")]
    InsecureSecret(String, String),
}

/// Server application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL (controls cookie Secure flag)
    pub base_url: String,
    /// Firebase identity + Firestore record store configuration
    pub firebase: FirebaseConfig,
    /// Gemini AI configuration
    pub gemini: GeminiConfig,
    /// Restaurant slug used as the chat Q&A context
    pub default_restaurant: RestaurantSlug,
    /// User ID seeded with the admin role at startup (if set)
    pub seed_admin_uid: Option<String>,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment (e.g., "development", "production")
    pub sentry_environment: Option<String>,
    /// Sentry error sample rate (0.0 to 1.0)
    pub sentry_sample_rate: f32,
    /// Sentry traces sample rate for performance monitoring (0.0 to 1.0)
    pub sentry_traces_sample_rate: f32,
}

/// Firebase project configuration.
///
/// One API key covers both the identity toolkit (token verification, user
/// lookup) and the Firestore REST endpoints. Implements `Debug` manually to
/// redact the key.
#[derive(Clone)]
pub struct FirebaseConfig {
    /// Firebase project ID (also the Firestore project)
    pub project_id: String,
    /// Firestore database ID (almost always `(default)`)
    pub database_id: String,
    /// Firebase Web API key
    pub api_key: SecretString,
}

impl std::fmt::Debug for FirebaseConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FirebaseConfig")
            .field("project_id", &self.project_id)
            .field("database_id", &self.database_id)
            .field("api_key", &"[REDACTED]")
            .finish()
    }
}

/// Gemini API configuration.
///
/// Implements `Debug` manually to redact the API key.
#[derive(Clone)]
pub struct GeminiConfig {
    /// Gemini API key
    pub api_key: SecretString,
    /// Model ID (e.g., gemini-1.5-flash-latest)
    pub model: String,
}

impl std::fmt::Debug for GeminiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiConfig")
            .field("api_key", &"[REDACTED]")
            .field("model", &self.model)
            .finish()
    }
}

impl AppConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing, invalid, or
    /// if secrets fail validation (placeholder detection, entropy check).
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let host = get_env_or_default("LEZZET_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar("LEZZET_HOST".to_string(), e.to_string()))?;
        let port = get_env_or_default("LEZZET_PORT", "5001")
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidEnvVar("LEZZET_PORT".to_string(), e.to_string()))?;
        let base_url = get_env_or_default("LEZZET_BASE_URL", "http://localhost:5001");

        let firebase = FirebaseConfig::from_env()?;
        let gemini = GeminiConfig::from_env()?;

        let default_restaurant = RestaurantSlug::new(get_env_or_default(
            "LEZZET_DEFAULT_RESTAURANT",
            DEFAULT_RESTAURANT_SLUG,
        ));
        let seed_admin_uid = get_optional_env("LEZZET_SEED_ADMIN_UID");

        let sentry_dsn = get_optional_env("SENTRY_DSN");
        let sentry_environment = get_optional_env("SENTRY_ENVIRONMENT");
        let sentry_sample_rate = get_optional_env("SENTRY_SAMPLE_RATE")
            .and_then(|s| s.parse().ok())
            .unwrap_or(1.0);
        let sentry_traces_sample_rate = get_optional_env("SENTRY_TRACES_SAMPLE_RATE")
            .and_then(|s| s.parse().ok())
            .unwrap_or(1.0);

        Ok(Self {
            host,
            port,
            base_url,
            firebase,
            gemini,
            default_restaurant,
            seed_admin_uid,
            sentry_dsn,
            sentry_environment,
            sentry_sample_rate,
            sentry_traces_sample_rate,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Whether the public base URL is served over HTTPS.
    #[must_use]
    pub fn is_secure(&self) -> bool {
        self.base_url.starts_with("https://")
    }
}

impl FirebaseConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            project_id: get_required_env("FIREBASE_PROJECT_ID")?,
            database_id: get_env_or_default("FIRESTORE_DATABASE_ID", "(default)"),
            api_key: get_validated_secret("FIREBASE_API_KEY")?,
        })
    }
}

impl GeminiConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            api_key: get_validated_secret("GEMINI_API_KEY")?,
            model: get_env_or_default("GEMINI_MODEL", DEFAULT_GEMINI_MODEL),
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Calculate Shannon entropy in bits per character.
fn shannon_entropy(s: &str) -> f64 {
    if s.is_empty() {
        return 0.0;
    }

    let mut freq: HashMap<char, usize> = HashMap::new();
    for c in s.chars() {
        *freq.entry(c).or_insert(0) += 1;
    }

    #[allow(clippy::cast_precision_loss)] // String length will never exceed f64 precision
    let len = s.len() as f64;
    freq.values()
        .map(|&count| {
            #[allow(clippy::cast_precision_loss)] // Character count will never exceed f64 precision
            let p = count as f64 / len;
            -p * p.log2()
        })
        .sum()
}

/// Validate that a secret is not a placeholder and has sufficient entropy.
fn validate_secret_strength(secret: &str, var_name: &str) -> Result<(), ConfigError> {
    let lower = secret.to_lowercase();

    // Check blocklist
    for pattern in PLACEHOLDER_PATTERNS {
        if lower.contains(pattern) {
            return Err(ConfigError::InsecureSecret(
                var_name.to_string(),
                format!("appears to be a placeholder (contains '{pattern}')"),
            ));
        }
    }

    // Check entropy (real secrets like API keys have high entropy)
    let entropy = shannon_entropy(secret);
    if entropy < MIN_ENTROPY_BITS_PER_CHAR {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "entropy too low ({entropy:.2} bits/char, need >= {MIN_ENTROPY_BITS_PER_CHAR:.1}). Use a real API key."
            ),
        ));
    }

    Ok(())
}

/// Load and validate a secret from environment.
fn get_validated_secret(key: &str) -> Result<SecretString, ConfigError> {
    let value = get_required_env(key)?;
    validate_secret_strength(&value, key)?;
    Ok(SecretString::from(value))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn test_config() -> AppConfig {
        AppConfig {
            host: "127.0.0.1".parse().unwrap(),
            port: 5001,
            base_url: "http://localhost:5001".to_string(),
            firebase: FirebaseConfig {
                project_id: "lezzet-test".to_string(),
                database_id: "(default)".to_string(),
                api_key: SecretString::from("AIzaSyB3kD9mQx7Lp2Wv8Rc4Tn6Jh1Fg5Zs0Yd"),
            },
            gemini: GeminiConfig {
                api_key: SecretString::from("AIzaSyC8qW2eRt5Yu9Io3Pa7Sd1Fg4Hj6Kl0Zx"),
                model: DEFAULT_GEMINI_MODEL.to_string(),
            },
            default_restaurant: RestaurantSlug::new(DEFAULT_RESTAURANT_SLUG),
            seed_admin_uid: None,
            sentry_dsn: None,
            sentry_environment: None,
            sentry_sample_rate: 1.0,
            sentry_traces_sample_rate: 1.0,
        }
    }

    #[test]
    fn test_shannon_entropy_empty() {
        assert!((shannon_entropy("") - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_shannon_entropy_single_char() {
        // All same character = 0 entropy
        assert!((shannon_entropy("aaaaaaa") - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_shannon_entropy_high() {
        // Random-looking string should have high entropy
        let entropy = shannon_entropy("aB3$xY9!mK2@nL5#");
        assert!(entropy > 3.3);
    }

    #[test]
    fn test_validate_secret_strength_placeholder() {
        let result = validate_secret_strength("your-api-key-here", "TEST_VAR");
        assert!(matches!(result, Err(ConfigError::InsecureSecret(_, _))));
    }

    #[test]
    fn test_validate_secret_strength_low_entropy() {
        let result = validate_secret_strength("aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa", "TEST_VAR");
        assert!(matches!(result, Err(ConfigError::InsecureSecret(_, _))));
    }

    #[test]
    fn test_validate_secret_strength_valid() {
        let result = validate_secret_strength("AIzaSyB3kD9mQx7Lp2Wv8Rc4Tn6Jh1Fg5Zs0Yd", "TEST_VAR");
        assert!(result.is_ok());
    }

    #[test]
    fn test_socket_addr() {
        let config = test_config();
        let addr = config.socket_addr();
        assert_eq!(addr.ip().to_string(), "127.0.0.1");
        assert_eq!(addr.port(), 5001);
    }

    #[test]
    fn test_is_secure() {
        let mut config = test_config();
        assert!(!config.is_secure());
        config.base_url = "https://lezzet.example.com".to_string();
        assert!(config.is_secure());
    }

    #[test]
    fn test_firebase_config_debug_redacts_secrets() {
        let config = test_config().firebase;
        let debug_output = format!("{config:?}");

        assert!(debug_output.contains("lezzet-test"));
        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains("AIzaSyB3kD9mQx7Lp2Wv8Rc4Tn6Jh1Fg5Zs0Yd"));
    }

    #[test]
    fn test_gemini_config_debug_redacts_secrets() {
        let config = test_config().gemini;
        let debug_output = format!("{config:?}");

        assert!(debug_output.contains(DEFAULT_GEMINI_MODEL));
        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains("AIzaSyC8qW2eRt5Yu9Io3Pa7Sd1Fg4Hj6Kl0Zx"));
    }
}
