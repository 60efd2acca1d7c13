//! Domain models for records and session state.
//!
//! Record models (de)serialize with the field names used in the document
//! store (`cuisineTypes`, `isActive`, ...), so repositories can pass them
//! through serde in both directions.

pub mod cuisine;
pub mod menu;
pub mod restaurant;
pub mod session;

use serde::Serialize;

pub use cuisine::{Cuisine, CuisineWithCount};
pub use menu::{Menu, MenuCategory, MenuItem};
pub use restaurant::{EditorRef, OwnerRef, Restaurant};
pub use session::{CurrentUser, session_keys};

/// A record paired with its document ID and server-assigned timestamps.
#[derive(Debug, Clone, Serialize)]
pub struct Stored<T> {
    /// Document ID.
    pub id: String,
    /// Server-assigned creation time (RFC 3339), if known.
    #[serde(rename = "createdAt", skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    /// Server-assigned last update time (RFC 3339), if known.
    #[serde(rename = "updatedAt", skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
    /// The record itself, flattened into the same JSON object.
    #[serde(flatten)]
    pub record: T,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stored_flattens_record() {
        #[derive(Serialize)]
        struct Probe {
            name: &'static str,
        }

        let stored = Stored {
            id: "doc-1".to_string(),
            created_at: Some("2024-03-07T12:00:00Z".to_string()),
            updated_at: None,
            record: Probe { name: "Kebap" },
        };

        let json = serde_json::to_value(&stored).expect("serialize");
        assert_eq!(json["id"], "doc-1");
        assert_eq!(json["createdAt"], "2024-03-07T12:00:00Z");
        assert_eq!(json["name"], "Kebap");
        assert!(json.get("updatedAt").is_none());
    }
}
