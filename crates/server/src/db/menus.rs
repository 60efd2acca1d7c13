//! Menu records: CRUD scoped by restaurant, with editor ownership checks
//! delegated to the owning restaurant.

use lezzet_core::types::{MenuId, UserId};
use serde_json::Value;
use tracing::info;

use crate::firestore::FirestoreClient;
use crate::models::Stored;
use crate::models::menu::Menu;
use crate::models::restaurant::Restaurant;

use super::{RepositoryError, decode, editor_owns};

const MENUS: &str = "menus";
const RESTAURANTS: &str = "restaurants";

/// Repository for menu records.
pub struct MenuRepository<'a> {
    store: &'a FirestoreClient,
}

impl<'a> MenuRepository<'a> {
    #[must_use]
    pub const fn new(store: &'a FirestoreClient) -> Self {
        Self { store }
    }

    /// List every menu record.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the store cannot be read or a record
    /// fails to decode.
    pub async fn list(&self) -> Result<Vec<Stored<Menu>>, RepositoryError> {
        let docs = self.store.list_documents(MENUS).await?;
        docs.into_iter().map(decode).collect()
    }

    /// Fetch one menu by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the store cannot be read or the record
    /// fails to decode.
    pub async fn get(&self, id: &MenuId) -> Result<Option<Stored<Menu>>, RepositoryError> {
        match self.store.get_document(MENUS, id.as_str()).await? {
            Some(doc) => Ok(Some(decode(doc)?)),
            None => Ok(None),
        }
    }

    /// Create a menu with a store-generated ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the store cannot be written.
    pub async fn create(&self, record: &Menu) -> Result<Stored<Menu>, RepositoryError> {
        let fields = serde_json::to_value(record)
            .map_err(|e| RepositoryError::DataCorruption(e.to_string()))?;
        let doc = self.store.create_document(MENUS, &fields).await?;
        info!(id = %doc.id, name = %record.name, "menu created");
        decode(doc)
    }

    /// Replace a menu record in place.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the menu does not exist, or a
    /// store error.
    pub async fn update(
        &self,
        id: &MenuId,
        record: &Menu,
    ) -> Result<Stored<Menu>, RepositoryError> {
        if self.store.get_document(MENUS, id.as_str()).await?.is_none() {
            return Err(RepositoryError::NotFound);
        }
        let fields = serde_json::to_value(record)
            .map_err(|e| RepositoryError::DataCorruption(e.to_string()))?;
        let doc = self.store.set_document(MENUS, id.as_str(), &fields).await?;
        decode(doc)
    }

    /// Delete a menu. Deleting a missing ID is not an error.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the store cannot be written.
    pub async fn delete(&self, id: &MenuId) -> Result<(), RepositoryError> {
        self.store.delete_document(MENUS, id.as_str()).await?;
        Ok(())
    }

    /// All menus belonging to one restaurant.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the store cannot be read or a record
    /// fails to decode.
    pub async fn for_restaurant(
        &self,
        restaurant_id: &str,
    ) -> Result<Vec<Stored<Menu>>, RepositoryError> {
        let docs = self
            .store
            .query_eq(MENUS, "restaurantId", &Value::from(restaurant_id))
            .await?;
        docs.into_iter().map(decode).collect()
    }

    /// All menus across the restaurants assigned to the given editor, each
    /// annotated with its restaurant's display name.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the store cannot be read or a record
    /// fails to decode.
    pub async fn for_editor(&self, uid: &UserId) -> Result<Vec<Stored<Menu>>, RepositoryError> {
        let restaurant_docs = self
            .store
            .query_eq(RESTAURANTS, "editor.userId", &Value::from(uid.as_str()))
            .await?;

        let mut menus = Vec::new();
        for restaurant_doc in restaurant_docs {
            let restaurant: Stored<Restaurant> = decode(restaurant_doc)?;
            for menu_doc in self
                .store
                .query_eq(MENUS, "restaurantId", &Value::from(restaurant.id.as_str()))
                .await?
            {
                let mut menu: Stored<Menu> = decode(menu_doc)?;
                menu.record.restaurant_name = Some(restaurant.record.name.clone());
                menus.push(menu);
            }
        }
        Ok(menus)
    }

    /// Whether the editor may mutate the menu, decided by the editor
    /// reference on the owning restaurant. Missing menus or restaurants are
    /// not editable.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the store cannot be read.
    pub async fn can_editor_edit(
        &self,
        uid: &UserId,
        id: &MenuId,
    ) -> Result<bool, RepositoryError> {
        let Some(menu) = self.get(id).await? else {
            return Ok(false);
        };

        let Some(doc) = self
            .store
            .get_document(RESTAURANTS, &menu.record.restaurant_id)
            .await?
        else {
            return Ok(false);
        };

        let restaurant: Stored<Restaurant> = decode(doc)?;
        Ok(editor_owns(&restaurant.record, uid))
    }
}
