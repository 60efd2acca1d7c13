//! Error types for the Firebase identity client.

use thiserror::Error;

/// Errors that can occur when talking to the identity provider.
#[derive(Debug, Error)]
pub enum IdentityError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Identity toolkit returned an error.
    #[error("API error: {0}")]
    Api(String),

    /// Authentication with the API key failed.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// Failed to parse a response.
    #[error("parse error: {0}")]
    Parse(String),
}

/// Error envelope returned by the identity toolkit.
#[derive(Debug, serde::Deserialize)]
pub struct ApiErrorResponse {
    /// Nested error details.
    pub error: ApiError,
}

/// Nested error details.
#[derive(Debug, serde::Deserialize)]
pub struct ApiError {
    /// Error message code (e.g. `INVALID_ID_TOKEN`).
    #[serde(default)]
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_error_display() {
        let err = IdentityError::Api("INVALID_ID_TOKEN".to_string());
        assert_eq!(err.to_string(), "API error: INVALID_ID_TOKEN");
    }

    #[test]
    fn test_api_error_deserialization() {
        let json = r#"{ "error": { "code": 400, "message": "INVALID_ID_TOKEN" } }"#;
        let response: ApiErrorResponse = serde_json::from_str(json).expect("deserialize");
        assert_eq!(response.error.message, "INVALID_ID_TOKEN");
    }
}
