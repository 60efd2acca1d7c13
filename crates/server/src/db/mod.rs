//! Repositories over the document store.
//!
//! ## Collections
//!
//! - `users` - role records keyed by identity-provider UID
//! - `restaurants` - restaurant records keyed by slug
//! - `menus` - menu records with store-generated IDs
//! - `cuisines` - cuisine records keyed by slug
//! - `chat_history` - per-user chat transcripts, pruned to the last 5
//! - `user_daily_usage` - daily message counters keyed by `<uid>_<day>`
//!
//! Repositories borrow the gateway clients rather than owning them; all
//! record (de)serialization goes through serde with the store's camelCase
//! field names.

pub mod cuisines;
pub mod menus;
pub mod restaurants;
pub mod usage;
pub mod users;

use serde::de::DeserializeOwned;
use thiserror::Error;

pub use cuisines::CuisineRepository;
pub use menus::MenuRepository;
pub use restaurants::{AssignableRole, EditorStats, RestaurantRepository, editor_owns};
pub use usage::{ChatEntry, ChatRepository};
pub use users::{UserRepository, UserSummary};

use crate::firebase::IdentityError;
use crate::firestore::{Document, FirestoreError};
use crate::models::Stored;

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Document store error.
    #[error("store error: {0}")]
    Store(#[from] FirestoreError),

    /// Identity provider error.
    #[error("identity error: {0}")]
    Identity(#[from] IdentityError),

    /// Data in the store is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested record was not found.
    #[error("not found")]
    NotFound,

    /// Backing service is unreachable.
    #[error("unavailable: {0}")]
    Unavailable(String),
}

/// Decode a store document into a typed record with its ID and timestamps.
///
/// # Errors
///
/// Returns `RepositoryError::DataCorruption` if the document fields do not
/// match the record shape.
pub(crate) fn decode<T: DeserializeOwned>(doc: Document) -> Result<Stored<T>, RepositoryError> {
    let record = serde_json::from_value(doc.fields.clone())
        .map_err(|e| RepositoryError::DataCorruption(format!("document {}: {e}", doc.id)))?;
    Ok(Stored {
        id: doc.id,
        created_at: doc.create_time,
        updated_at: doc.update_time,
        record,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_errors_convert_into_repository_errors() {
        let err = RepositoryError::from(IdentityError::Unauthorized("bad key".to_string()));
        assert!(matches!(err, RepositoryError::Identity(_)));
    }
}
