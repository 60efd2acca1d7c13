//! Cuisine records with derived restaurant counts.

use chrono::Utc;
use lezzet_core::types::CuisineId;
use serde_json::Value;
use tracing::info;

use crate::firestore::FirestoreClient;
use crate::models::Stored;
use crate::models::cuisine::{Cuisine, CuisineWithCount};
use crate::services::slug;

use super::{RepositoryError, decode};

const CUISINES: &str = "cuisines";
const RESTAURANTS: &str = "restaurants";

/// Repository for cuisine records.
pub struct CuisineRepository<'a> {
    store: &'a FirestoreClient,
}

impl<'a> CuisineRepository<'a> {
    #[must_use]
    pub const fn new(store: &'a FirestoreClient) -> Self {
        Self { store }
    }

    /// List every cuisine with the number of active restaurants that carry
    /// its name in their cuisine types. Counts are recomputed on each read.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the store cannot be read or a record
    /// fails to decode.
    pub async fn list_with_counts(
        &self,
    ) -> Result<Vec<Stored<CuisineWithCount>>, RepositoryError> {
        let docs = self.store.list_documents(CUISINES).await?;

        let mut cuisines = Vec::with_capacity(docs.len());
        for doc in docs {
            let stored: Stored<Cuisine> = decode(doc)?;
            let matches = self
                .store
                .query_array_contains(
                    RESTAURANTS,
                    "cuisineTypes",
                    &Value::from(stored.record.name.as_str()),
                )
                .await?;
            let count = matches
                .iter()
                .filter(|doc| {
                    doc.fields
                        .get("isActive")
                        .and_then(Value::as_bool)
                        .unwrap_or(true)
                })
                .count() as u64;

            cuisines.push(Stored {
                id: stored.id,
                created_at: stored.created_at,
                updated_at: stored.updated_at,
                record: CuisineWithCount {
                    cuisine: stored.record,
                    restaurant_count: count,
                },
            });
        }

        Ok(cuisines)
    }

    /// Create a cuisine, deriving its ID from the name.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the store cannot be read or written.
    pub async fn create(&self, record: &Cuisine) -> Result<Stored<Cuisine>, RepositoryError> {
        let now = Utc::now();
        let candidate = slug::cuisine_slug(&record.name, |_| false, now);
        let taken = self
            .store
            .get_document(CUISINES, &candidate)
            .await?
            .is_some();
        let id = slug::cuisine_slug(&record.name, |s| s == candidate && taken, now);

        let fields = serde_json::to_value(record)
            .map_err(|e| RepositoryError::DataCorruption(e.to_string()))?;
        let doc = self.store.set_document(CUISINES, &id, &fields).await?;
        info!(id = %id, name = %record.name, "cuisine created");
        decode(doc)
    }

    /// Replace a cuisine record in place.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the cuisine does not exist,
    /// or a store error.
    pub async fn update(
        &self,
        id: &CuisineId,
        record: &Cuisine,
    ) -> Result<Stored<Cuisine>, RepositoryError> {
        if self.store.get_document(CUISINES, id.as_str()).await?.is_none() {
            return Err(RepositoryError::NotFound);
        }
        let fields = serde_json::to_value(record)
            .map_err(|e| RepositoryError::DataCorruption(e.to_string()))?;
        let doc = self.store.set_document(CUISINES, id.as_str(), &fields).await?;
        decode(doc)
    }

    /// Delete a cuisine. Deleting a missing ID is not an error.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the store cannot be written.
    pub async fn delete(&self, id: &CuisineId) -> Result<(), RepositoryError> {
        self.store.delete_document(CUISINES, id.as_str()).await?;
        Ok(())
    }
}
