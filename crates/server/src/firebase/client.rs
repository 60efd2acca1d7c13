//! Firebase identity client - the identity gateway.
//!
//! Wraps the identity toolkit's `accounts:lookup` endpoint for bearer token
//! verification and user lookup. Token verification and minting stay entirely
//! with the provider; this system only resolves tokens to profiles.

use std::sync::Arc;

use reqwest::StatusCode;
use secrecy::ExposeSecret;
use serde::Deserialize;
use serde_json::json;
use tracing::instrument;

use crate::config::FirebaseConfig;

use super::error::{ApiErrorResponse, IdentityError};

const IDENTITY_TOOLKIT_URL: &str = "https://identitytoolkit.googleapis.com/v1";

/// Identity-toolkit error codes that mean "bad token", not "gateway down".
const INVALID_TOKEN_CODES: &[&str] = &[
    "INVALID_ID_TOKEN",
    "TOKEN_EXPIRED",
    "USER_NOT_FOUND",
    "USER_DISABLED",
];

/// A verified user profile from the identity provider.
#[derive(Debug, Clone)]
pub struct AuthUser {
    /// Opaque user identifier (Firebase UID).
    pub uid: String,
    /// Email address, if the provider has one.
    pub email: Option<String>,
    /// Display name, if set.
    pub display_name: Option<String>,
    /// Profile photo URL, if set.
    pub photo_url: Option<String>,
    /// Whether the provider has verified the email.
    pub email_verified: bool,
}

/// Firebase identity client.
#[derive(Clone)]
pub struct IdentityClient {
    inner: Arc<IdentityClientInner>,
}

struct IdentityClientInner {
    client: reqwest::Client,
    api_key: String,
}

#[derive(Debug, Deserialize)]
struct LookupResponse {
    #[serde(default)]
    users: Vec<WireUser>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireUser {
    local_id: String,
    email: Option<String>,
    display_name: Option<String>,
    photo_url: Option<String>,
    #[serde(default)]
    email_verified: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SignUpResponse {
    local_id: String,
    email: Option<String>,
    id_token: String,
}

impl From<WireUser> for AuthUser {
    fn from(wire: WireUser) -> Self {
        Self {
            uid: wire.local_id,
            email: wire.email,
            display_name: wire.display_name,
            photo_url: wire.photo_url,
            email_verified: wire.email_verified,
        }
    }
}

impl IdentityClient {
    /// Create a new identity client.
    #[must_use]
    pub fn new(config: &FirebaseConfig) -> Self {
        Self {
            inner: Arc::new(IdentityClientInner {
                client: reqwest::Client::new(),
                api_key: config.api_key.expose_secret().to_owned(),
            }),
        }
    }

    /// Verify an ID token and resolve it to a user profile.
    ///
    /// Returns `Ok(None)` for invalid or expired tokens; only transport and
    /// unexpected API failures surface as errors.
    ///
    /// # Errors
    ///
    /// Returns `IdentityError` if the provider is unreachable or responds
    /// with something other than a token-validity verdict.
    #[instrument(skip(self, id_token))]
    pub async fn verify_token(&self, id_token: &str) -> Result<Option<AuthUser>, IdentityError> {
        self.lookup(json!({ "idToken": id_token })).await
    }

    /// Look up a user profile by UID.
    ///
    /// # Errors
    ///
    /// Returns `IdentityError` on transport or API failure.
    #[instrument(skip(self), fields(uid = %uid))]
    pub async fn lookup_user(&self, uid: &str) -> Result<Option<AuthUser>, IdentityError> {
        self.lookup(json!({ "localId": [uid] })).await
    }

    /// Look up a user profile by email address.
    ///
    /// # Errors
    ///
    /// Returns `IdentityError` on transport or API failure.
    #[instrument(skip(self, email))]
    pub async fn lookup_user_by_email(
        &self,
        email: &str,
    ) -> Result<Option<AuthUser>, IdentityError> {
        self.lookup(json!({ "email": [email] })).await
    }

    /// Create a new user account with an email and password.
    ///
    /// The display name, when given, is applied with a follow-up profile
    /// update using the fresh account's token.
    ///
    /// # Errors
    ///
    /// Returns `IdentityError` if the provider rejects the account (for
    /// example `EMAIL_EXISTS`) or is unreachable.
    #[instrument(skip_all)]
    pub async fn create_user(
        &self,
        email: &str,
        password: &str,
        display_name: Option<&str>,
    ) -> Result<AuthUser, IdentityError> {
        let url = format!("{IDENTITY_TOOLKIT_URL}/accounts:signUp");
        let response = self
            .inner
            .client
            .post(url)
            .query(&[("key", &self.inner.api_key)])
            .json(&json!({
                "email": email,
                "password": password,
                "returnSecureToken": true,
            }))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(self.api_error(status, response).await);
        }

        let body = response.text().await?;
        let created: SignUpResponse = serde_json::from_str(&body)
            .map_err(|e| IdentityError::Parse(format!("Failed to parse response: {e}")))?;

        if let Some(name) = display_name {
            self.set_display_name(&created.id_token, name).await?;
        }

        Ok(AuthUser {
            uid: created.local_id,
            email: created.email,
            display_name: display_name.map(ToOwned::to_owned),
            photo_url: None,
            email_verified: false,
        })
    }

    /// Delete a user account by UID.
    ///
    /// # Errors
    ///
    /// Returns `IdentityError` if the provider refuses the deletion or is
    /// unreachable.
    #[instrument(skip(self), fields(uid = %uid))]
    pub async fn delete_user(&self, uid: &str) -> Result<(), IdentityError> {
        let url = format!("{IDENTITY_TOOLKIT_URL}/accounts:delete");
        let response = self
            .inner
            .client
            .post(url)
            .query(&[("key", &self.inner.api_key)])
            .json(&json!({ "localId": uid }))
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(self.api_error(status, response).await)
        }
    }

    async fn set_display_name(&self, id_token: &str, name: &str) -> Result<(), IdentityError> {
        let url = format!("{IDENTITY_TOOLKIT_URL}/accounts:update");
        let response = self
            .inner
            .client
            .post(url)
            .query(&[("key", &self.inner.api_key)])
            .json(&json!({
                "idToken": id_token,
                "displayName": name,
                "returnSecureToken": false,
            }))
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(self.api_error(status, response).await)
        }
    }

    /// Turn a failed response into the matching `IdentityError`.
    async fn api_error(&self, status: StatusCode, response: reqwest::Response) -> IdentityError {
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return IdentityError::Unauthorized(format!("status {status}"));
        }
        match response.text().await {
            Ok(body) => match serde_json::from_str::<ApiErrorResponse>(&body) {
                Ok(api_error) => IdentityError::Api(api_error.error.message),
                Err(_) => IdentityError::Api(body),
            },
            Err(e) => IdentityError::Http(e),
        }
    }

    async fn lookup(&self, body: serde_json::Value) -> Result<Option<AuthUser>, IdentityError> {
        let url = format!("{IDENTITY_TOOLKIT_URL}/accounts:lookup");
        let response = self
            .inner
            .client
            .post(url)
            .query(&[("key", &self.inner.api_key)])
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            let body = response.text().await?;
            let lookup: LookupResponse = serde_json::from_str(&body)
                .map_err(|e| IdentityError::Parse(format!("Failed to parse response: {e}")))?;
            Ok(lookup.users.into_iter().next().map(AuthUser::from))
        } else {
            match self.classify_error(status, response).await {
                // Invalid credentials resolve to "no user", not an error
                Ok(()) => Ok(None),
                Err(e) => Err(e),
            }
        }
    }

    /// Decide whether an error response means "invalid token" (benign) or a
    /// real gateway failure.
    async fn classify_error(
        &self,
        status: StatusCode,
        response: reqwest::Response,
    ) -> Result<(), IdentityError> {
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(IdentityError::Unauthorized(format!("status {status}")));
        }

        let body = response.text().await?;
        if let Ok(api_error) = serde_json::from_str::<ApiErrorResponse>(&body) {
            let message = api_error.error.message;
            if INVALID_TOKEN_CODES
                .iter()
                .any(|code| message.starts_with(code))
            {
                return Ok(());
            }
            return Err(IdentityError::Api(message));
        }

        Err(IdentityError::Api(body))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_user_conversion() {
        let wire: WireUser = serde_json::from_str(
            r#"{
                "localId": "abc123",
                "email": "user@example.com",
                "displayName": "Ayşe",
                "photoUrl": "https://example.com/p.jpg",
                "emailVerified": true
            }"#,
        )
        .expect("deserialize");

        let user: AuthUser = wire.into();
        assert_eq!(user.uid, "abc123");
        assert_eq!(user.email.as_deref(), Some("user@example.com"));
        assert_eq!(user.display_name.as_deref(), Some("Ayşe"));
        assert!(user.email_verified);
    }

    #[test]
    fn test_lookup_response_empty_users() {
        let lookup: LookupResponse = serde_json::from_str(r#"{ "kind": "lookup" }"#)
            .expect("deserialize");
        assert!(lookup.users.is_empty());
    }

    #[test]
    fn test_invalid_token_codes_cover_expiry() {
        assert!(INVALID_TOKEN_CODES.contains(&"TOKEN_EXPIRED"));
        assert!(INVALID_TOKEN_CODES.contains(&"INVALID_ID_TOKEN"));
    }

    #[test]
    fn test_sign_up_response_parses() {
        let created: SignUpResponse = serde_json::from_str(
            r#"{
                "localId": "new-uid",
                "email": "new@example.com",
                "idToken": "tok"
            }"#,
        )
        .expect("deserialize");
        assert_eq!(created.local_id, "new-uid");
        assert_eq!(created.email.as_deref(), Some("new@example.com"));
        assert_eq!(created.id_token, "tok");
    }

    #[test]
    fn test_identity_client_is_clone_send_sync() {
        fn assert_clone<T: Clone>() {}
        fn assert_send_sync<T: Send + Sync>() {}
        assert_clone::<IdentityClient>();
        assert_send_sync::<IdentityClient>();
    }
}
