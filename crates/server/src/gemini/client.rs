//! Gemini API client for text and vision generation.

use std::sync::Arc;

use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::config::GeminiConfig;

use super::error::{ApiErrorResponse, GeminiError};

const GEMINI_API_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Gemini API client.
///
/// Wraps the `generateContent` endpoint for plain-text prompts and for
/// prompts carrying an inline image.
#[derive(Clone)]
pub struct GeminiClient {
    inner: Arc<GeminiClientInner>,
}

struct GeminiClientInner {
    client: reqwest::Client,
    model: String,
    api_key: String,
}

impl GeminiClient {
    /// Create a new Gemini client.
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client cannot be constructed.
    #[must_use]
    pub fn new(config: &GeminiConfig) -> Self {
        let client = reqwest::Client::builder()
            .build()
            .expect("Failed to build HTTP client");

        Self {
            inner: Arc::new(GeminiClientInner {
                client,
                model: config.model.clone(),
                api_key: config.api_key.expose_secret().to_string(),
            }),
        }
    }

    /// The configured model ID.
    #[must_use]
    pub fn model(&self) -> &str {
        &self.inner.model
    }

    /// Generate a text completion for a plain-text prompt.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails, the API rejects it, or the
    /// response contains no text candidate.
    #[instrument(skip(self, prompt), fields(model = %self.inner.model))]
    pub async fn complete(&self, prompt: &str) -> Result<String, GeminiError> {
        let request = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part::text(prompt)],
            }],
        };
        self.generate(&request).await
    }

    /// Generate a text completion for a prompt plus an inline image.
    ///
    /// The image is passed as base64-encoded bytes with its MIME type.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails, the API rejects it, or the
    /// response contains no text candidate.
    #[instrument(skip(self, prompt, image_base64), fields(model = %self.inner.model))]
    pub async fn complete_with_image(
        &self,
        prompt: &str,
        image_base64: &str,
        mime_type: &str,
    ) -> Result<String, GeminiError> {
        let request = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![
                    Part::text(prompt),
                    Part::inline_data(mime_type, image_base64),
                ],
            }],
        };
        self.generate(&request).await
    }

    async fn generate(&self, request: &GenerateContentRequest) -> Result<String, GeminiError> {
        let url = format!(
            "{GEMINI_API_URL}/models/{}:generateContent",
            self.inner.model
        );

        let response = self
            .inner
            .client
            .post(&url)
            .query(&[("key", self.inner.api_key.as_str())])
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(self.handle_error_status(status, response).await);
        }

        let body = response.text().await?;
        let parsed: GenerateContentResponse = serde_json::from_str(&body)
            .map_err(|e| GeminiError::Parse(format!("Failed to parse response: {e}")))?;

        extract_text(&parsed)
            .ok_or_else(|| GeminiError::Parse("response contained no text candidate".to_string()))
    }

    /// Handle an error status code.
    async fn handle_error_status(
        &self,
        status: reqwest::StatusCode,
        response: reqwest::Response,
    ) -> GeminiError {
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse().ok())
                .unwrap_or(60);
            return GeminiError::RateLimited(retry_after);
        }

        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
            return GeminiError::Unauthorized("Invalid API key".to_string());
        }

        match response.text().await {
            Ok(body) => {
                if let Ok(api_error) = serde_json::from_str::<ApiErrorResponse>(&body) {
                    GeminiError::Api {
                        status: api_error.error.status,
                        message: api_error.error.message,
                    }
                } else {
                    GeminiError::Api {
                        status: status.as_u16().to_string(),
                        message: body,
                    }
                }
            }
            Err(e) => GeminiError::Http(e),
        }
    }
}

/// Concatenate the text parts of the first candidate, if any.
fn extract_text(response: &GenerateContentResponse) -> Option<String> {
    let candidate = response.candidates.first()?;
    let text: String = candidate
        .content
        .parts
        .iter()
        .filter_map(|p| p.text.as_deref())
        .collect();
    if text.is_empty() { None } else { Some(text) }
}

#[derive(Debug, Serialize)]
struct GenerateContentRequest {
    contents: Vec<Content>,
}

#[derive(Debug, Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Part {
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    inline_data: Option<InlineData>,
}

impl Part {
    fn text(text: &str) -> Self {
        Self {
            text: Some(text.to_string()),
            inline_data: None,
        }
    }

    fn inline_data(mime_type: &str, data: &str) -> Self {
        Self {
            text: None,
            inline_data: Some(InlineData {
                mime_type: mime_type.to_string(),
                data: data.to_string(),
            }),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct InlineData {
    mime_type: String,
    data: String,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: CandidateContent,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    #[serde(default)]
    text: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_text_joins_parts() {
        let response: GenerateContentResponse = serde_json::from_str(
            r#"{
                "candidates": [{
                    "content": {
                        "parts": [{"text": "Merhaba"}, {"text": " dünya"}]
                    }
                }]
            }"#,
        )
        .expect("deserialize");

        assert_eq!(extract_text(&response).as_deref(), Some("Merhaba dünya"));
    }

    #[test]
    fn test_extract_text_empty_candidates() {
        let response: GenerateContentResponse =
            serde_json::from_str(r#"{"candidates": []}"#).expect("deserialize");
        assert!(extract_text(&response).is_none());
    }

    #[test]
    fn test_image_request_wire_format() {
        let request = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part::text("oku"), Part::inline_data("image/jpeg", "aGk=")],
            }],
        };

        let json = serde_json::to_value(&request).expect("serialize");
        let parts = &json["contents"][0]["parts"];
        assert_eq!(parts[0]["text"], "oku");
        assert_eq!(parts[1]["inlineData"]["mimeType"], "image/jpeg");
        assert_eq!(parts[1]["inlineData"]["data"], "aGk=");
    }

    #[test]
    fn test_gemini_client_is_clone_send_sync() {
        fn assert_clone<T: Clone>() {}
        fn assert_send_sync<T: Send + Sync>() {}
        assert_clone::<GeminiClient>();
        assert_send_sync::<GeminiClient>();
    }
}
