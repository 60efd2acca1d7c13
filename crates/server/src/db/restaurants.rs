//! Restaurant records: CRUD, editor assignment, and ownership checks.

use chrono::Utc;
use lezzet_core::types::{Email, UserId};
use serde::Serialize;
use serde_json::{Value, json};
use tracing::info;

use crate::firebase::IdentityClient;
use crate::firestore::{FieldTransform, FirestoreClient};
use crate::models::Stored;
use crate::models::restaurant::{EditorRef, OwnerRef, Restaurant};
use crate::services::slug;

use super::{RepositoryError, decode};

const RESTAURANTS: &str = "restaurants";

/// Whether the given user is the assigned editor of the restaurant.
#[must_use]
pub fn editor_owns(restaurant: &Restaurant, uid: &UserId) -> bool {
    restaurant
        .editor
        .as_ref()
        .is_some_and(|editor| editor.user_id == uid.as_str())
}

/// Aggregate statistics for an editor's assigned restaurants.
#[derive(Debug, Clone, Serialize)]
pub struct EditorStats {
    pub total_restaurants: usize,
    pub active_restaurants: usize,
    /// Most recent update time across the editor's restaurants (RFC 3339).
    pub last_update: Option<String>,
}

/// Repository for restaurant records.
pub struct RestaurantRepository<'a> {
    store: &'a FirestoreClient,
    identity: &'a IdentityClient,
}

impl<'a> RestaurantRepository<'a> {
    #[must_use]
    pub const fn new(store: &'a FirestoreClient, identity: &'a IdentityClient) -> Self {
        Self { store, identity }
    }

    /// List every restaurant record.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the store cannot be read or a record
    /// fails to decode.
    pub async fn list(&self) -> Result<Vec<Stored<Restaurant>>, RepositoryError> {
        let docs = self.store.list_documents(RESTAURANTS).await?;
        docs.into_iter().map(decode).collect()
    }

    /// Fetch one restaurant by slug.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the store cannot be read or the record
    /// fails to decode.
    pub async fn get(&self, slug: &str) -> Result<Option<Stored<Restaurant>>, RepositoryError> {
        match self.store.get_document(RESTAURANTS, slug).await? {
            Some(doc) => Ok(Some(decode(doc)?)),
            None => Ok(None),
        }
    }

    /// Resolve an editor email to an editor reference via the identity
    /// provider. Unknown emails resolve to `None`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the identity provider cannot be reached.
    pub async fn resolve_editor(
        &self,
        email: &Email,
    ) -> Result<Option<EditorRef>, RepositoryError> {
        let user = self.identity.lookup_user_by_email(email.as_str()).await?;
        Ok(user.map(|u| EditorRef {
            email: email.to_string(),
            user_id: u.uid,
        }))
    }

    /// Create a restaurant, generating its slug from the name.
    ///
    /// The slug becomes the document ID and is written into the record. A
    /// name collision gets a timestamp suffix.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the store cannot be read or written.
    pub async fn create(
        &self,
        mut record: Restaurant,
    ) -> Result<Stored<Restaurant>, RepositoryError> {
        let now = Utc::now();
        let candidate = slug::restaurant_slug(&record.name, |_| false, now);
        let taken = self
            .store
            .get_document(RESTAURANTS, &candidate)
            .await?
            .is_some();
        let final_slug = slug::restaurant_slug(&record.name, |s| s == candidate && taken, now);

        record.slug = final_slug.clone();
        let fields = serde_json::to_value(&record)
            .map_err(|e| RepositoryError::DataCorruption(e.to_string()))?;
        let doc = self.store.set_document(RESTAURANTS, &final_slug, &fields).await?;
        info!(slug = %final_slug, "restaurant created");
        decode(doc)
    }

    /// Replace a restaurant record in place. The slug is immutable; the
    /// stored record always keeps the document's slug.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no restaurant has the slug,
    /// or a store error.
    pub async fn update(
        &self,
        slug: &str,
        mut record: Restaurant,
    ) -> Result<Stored<Restaurant>, RepositoryError> {
        if self.store.get_document(RESTAURANTS, slug).await?.is_none() {
            return Err(RepositoryError::NotFound);
        }
        record.slug = slug.to_string();
        let fields = serde_json::to_value(&record)
            .map_err(|e| RepositoryError::DataCorruption(e.to_string()))?;
        let doc = self.store.set_document(RESTAURANTS, slug, &fields).await?;
        decode(doc)
    }

    /// Delete a restaurant. Deleting a missing slug is not an error.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the store cannot be written.
    pub async fn delete(&self, slug: &str) -> Result<(), RepositoryError> {
        self.store.delete_document(RESTAURANTS, slug).await?;
        Ok(())
    }

    /// All restaurants assigned to the given editor.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the store cannot be read or a record
    /// fails to decode.
    pub async fn for_editor(
        &self,
        uid: &UserId,
    ) -> Result<Vec<Stored<Restaurant>>, RepositoryError> {
        let docs = self
            .store
            .query_eq(RESTAURANTS, "editor.userId", &Value::from(uid.as_str()))
            .await?;
        docs.into_iter().map(decode).collect()
    }

    /// Whether the editor may mutate the restaurant. Missing restaurants
    /// are not editable.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the store cannot be read.
    pub async fn can_editor_edit(
        &self,
        uid: &UserId,
        slug: &str,
    ) -> Result<bool, RepositoryError> {
        match self.get(slug).await? {
            Some(stored) => Ok(editor_owns(&stored.record, uid)),
            None => Ok(false),
        }
    }

    /// Assign the editor or owner role on a restaurant to the user with the
    /// given email.
    ///
    /// Editors become the restaurant's editor reference and are also added
    /// to the `editors` UID list; owners replace the owner contact.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the email resolves to no
    /// user, or a store/identity error.
    pub async fn assign_role(
        &self,
        slug: &str,
        email: &Email,
        role: AssignableRole,
    ) -> Result<(), RepositoryError> {
        let user = self
            .identity
            .lookup_user_by_email(email.as_str())
            .await?
            .ok_or(RepositoryError::NotFound)?;

        match role {
            AssignableRole::Editor => {
                let editor = EditorRef {
                    email: email.to_string(),
                    user_id: user.uid.clone(),
                };
                let base = json!({ "editor": editor });
                self.store
                    .commit_transforms(
                        RESTAURANTS,
                        slug,
                        &base,
                        &[FieldTransform::ArrayUnion {
                            field: "editors".to_string(),
                            values: vec![Value::from(user.uid.as_str())],
                        }],
                    )
                    .await?;
            }
            AssignableRole::Owner => {
                let owner = OwnerRef {
                    name: user.display_name.unwrap_or_default(),
                    email: email.to_string(),
                    phone: String::new(),
                };
                self.store
                    .merge_document(RESTAURANTS, slug, &json!({ "owner": owner }))
                    .await?;
            }
        }

        info!(slug = %slug, email = %email, role = ?role, "restaurant role assigned");
        Ok(())
    }

    /// Aggregate statistics over the editor's restaurants.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the store cannot be read.
    pub async fn editor_stats(&self, uid: &UserId) -> Result<EditorStats, RepositoryError> {
        let restaurants = self.for_editor(uid).await?;
        let active = restaurants
            .iter()
            .filter(|r| r.record.is_active)
            .count();
        let last_update = restaurants
            .iter()
            .filter_map(|r| r.updated_at.clone())
            .max();

        Ok(EditorStats {
            total_restaurants: restaurants.len(),
            active_restaurants: active,
            last_update,
        })
    }
}

/// Roles that can be assigned on a restaurant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssignableRole {
    Editor,
    Owner,
}

impl AssignableRole {
    /// Parse the role name from a request payload.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "editor" => Some(Self::Editor),
            "owner" => Some(Self::Owner),
            _ => None,
        }
    }
}
