//! Role records and user listings.

use lezzet_core::types::{Email, Role, UserId};
use serde::Serialize;
use serde_json::json;
use tracing::{info, warn};

use crate::firebase::IdentityClient;
use crate::firestore::FirestoreClient;

use super::RepositoryError;

const USERS: &str = "users";

/// A user as shown in the admin listing: the stored role enriched with
/// identity-provider profile data when available.
#[derive(Debug, Clone, Serialize)]
pub struct UserSummary {
    pub uid: String,
    pub role: Role,
    pub email: Option<String>,
    pub display_name: Option<String>,
    pub photo_url: Option<String>,
    pub email_verified: bool,
}

/// Repository for user role records.
pub struct UserRepository<'a> {
    store: &'a FirestoreClient,
    identity: &'a IdentityClient,
}

impl<'a> UserRepository<'a> {
    #[must_use]
    pub const fn new(store: &'a FirestoreClient, identity: &'a IdentityClient) -> Self {
        Self { store, identity }
    }

    /// The user's stored role. Users without a role record, or with an
    /// unrecognized role string, are subscribers.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the store cannot be read.
    pub async fn role_of(&self, uid: &UserId) -> Result<Role, RepositoryError> {
        let Some(doc) = self.store.get_document(USERS, uid.as_str()).await? else {
            return Ok(Role::default());
        };

        let role = doc
            .fields
            .get("role")
            .and_then(|v| v.as_str())
            .and_then(|s| s.parse().ok())
            .unwrap_or_default();
        Ok(role)
    }

    /// Set the user's role, creating the role record if absent.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the write fails.
    pub async fn set_role(&self, uid: &UserId, role: Role) -> Result<(), RepositoryError> {
        self.store
            .merge_document(USERS, uid.as_str(), &json!({ "role": role.as_str() }))
            .await?;
        Ok(())
    }

    /// Create a subscriber role record for the user if none exists yet, so
    /// new sign-ups appear in the admin user listing.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the store cannot be read or written.
    pub async fn ensure_role_record(&self, uid: &UserId) -> Result<(), RepositoryError> {
        if self.store.get_document(USERS, uid.as_str()).await?.is_some() {
            return Ok(());
        }
        self.set_role(uid, Role::default()).await
    }

    /// Create an account with the identity provider and give it a role
    /// record.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the provider rejects the account or the
    /// role record cannot be written.
    pub async fn create_user(
        &self,
        email: &Email,
        password: &str,
        display_name: Option<&str>,
        role: Role,
    ) -> Result<UserSummary, RepositoryError> {
        let account = self
            .identity
            .create_user(email.as_str(), password, display_name)
            .await?;

        let uid = UserId::from(account.uid.as_str());
        self.set_role(&uid, role).await?;
        info!(uid = %uid, role = %role.as_str(), "user created");

        Ok(UserSummary {
            uid: account.uid,
            role,
            email: account.email,
            display_name: account.display_name,
            photo_url: account.photo_url,
            email_verified: account.email_verified,
        })
    }

    /// Delete the account with the identity provider, then drop its role
    /// record. A missing role record is not an error.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the provider refuses the deletion or the
    /// role record cannot be removed.
    pub async fn delete_user(&self, uid: &UserId) -> Result<(), RepositoryError> {
        self.identity.delete_user(uid.as_str()).await?;
        self.store.delete_document(USERS, uid.as_str()).await?;
        info!(uid = %uid, "user deleted");
        Ok(())
    }

    /// List all users with a role record, enriched with identity-provider
    /// profile data. Profile lookups that fail leave the profile fields
    /// empty rather than failing the listing.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the store cannot be read.
    pub async fn list_users(&self) -> Result<Vec<UserSummary>, RepositoryError> {
        let docs = self.store.list_documents(USERS).await?;

        let mut users = Vec::with_capacity(docs.len());
        for doc in docs {
            let role = doc
                .fields
                .get("role")
                .and_then(|v| v.as_str())
                .and_then(|s| s.parse().ok())
                .unwrap_or_default();

            let profile = match self.identity.lookup_user(&doc.id).await {
                Ok(profile) => profile,
                Err(err) => {
                    warn!(uid = %doc.id, error = %err, "profile lookup failed");
                    None
                }
            };

            users.push(match profile {
                Some(p) => UserSummary {
                    uid: doc.id,
                    role,
                    email: p.email,
                    display_name: p.display_name,
                    photo_url: p.photo_url,
                    email_verified: p.email_verified,
                },
                None => UserSummary {
                    uid: doc.id,
                    role,
                    email: None,
                    display_name: None,
                    photo_url: None,
                    email_verified: false,
                },
            });
        }

        Ok(users)
    }

    /// Grant the admin role to the configured seed UID if it does not
    /// already hold it. Run once at startup.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the store cannot be read or written.
    pub async fn ensure_admin_seed(&self, uid: &UserId) -> Result<(), RepositoryError> {
        if self.role_of(uid).await? == Role::Admin {
            return Ok(());
        }
        self.set_role(uid, Role::Admin).await?;
        info!(uid = %uid, "seeded admin role");
        Ok(())
    }
}
