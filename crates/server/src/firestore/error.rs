//! Error types for the Firestore REST client.

use thiserror::Error;

/// Errors that can occur when talking to Firestore.
#[derive(Debug, Error)]
pub enum FirestoreError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Firestore returned an error response.
    #[error("API error ({status}): {message}")]
    Api {
        /// gRPC-style status string (e.g. `PERMISSION_DENIED`).
        status: String,
        /// Error message.
        message: String,
    },

    /// Authentication failed.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// Failed to parse a response or document.
    #[error("parse error: {0}")]
    Parse(String),
}

/// Error envelope returned by Google APIs.
#[derive(Debug, serde::Deserialize)]
pub struct ApiErrorResponse {
    /// Nested error details.
    pub error: ApiError,
}

/// Nested error details.
#[derive(Debug, serde::Deserialize)]
pub struct ApiError {
    /// Numeric HTTP code.
    #[serde(default)]
    pub code: u16,
    /// Error message.
    #[serde(default)]
    pub message: String,
    /// gRPC-style status string.
    #[serde(default)]
    pub status: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_firestore_error_display() {
        let err = FirestoreError::Api {
            status: "PERMISSION_DENIED".to_string(),
            message: "Missing or insufficient permissions.".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "API error (PERMISSION_DENIED): Missing or insufficient permissions."
        );
    }

    #[test]
    fn test_api_error_deserialization() {
        let json = r#"{
            "error": {
                "code": 404,
                "message": "Document not found",
                "status": "NOT_FOUND"
            }
        }"#;

        let response: ApiErrorResponse = serde_json::from_str(json).expect("deserialize");
        assert_eq!(response.error.code, 404);
        assert_eq!(response.error.status, "NOT_FOUND");
    }
}
