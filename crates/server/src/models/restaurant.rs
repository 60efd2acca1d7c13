//! Restaurant record types.

use serde::{Deserialize, Serialize};

/// Owner contact details attached to a restaurant.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct OwnerRef {
    /// Owner's display name.
    #[serde(default)]
    pub name: String,
    /// Owner's email address.
    pub email: String,
    /// Owner's phone number.
    #[serde(default)]
    pub phone: String,
}

/// Editor assignment attached to a restaurant.
///
/// This reference is the sole authorization source for editor-scoped
/// mutation of the restaurant and its menus.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditorRef {
    /// Editor's email address.
    pub email: String,
    /// Editor's resolved user identifier.
    pub user_id: String,
}

/// A restaurant record.
///
/// The document ID is the generated slug; the slug is also duplicated into
/// the record for client display and is immutable once assigned.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Restaurant {
    /// URL-safe identifier, duplicated from the document ID.
    pub slug: String,
    /// Display name.
    pub name: String,
    /// Free-text description.
    #[serde(default)]
    pub description: Option<String>,
    /// Cuisine-type labels (matched against cuisine names).
    #[serde(default)]
    pub cuisine_types: Vec<String>,
    /// Free-text tags.
    #[serde(default)]
    pub tags: Vec<String>,
    /// Contact phone.
    #[serde(default)]
    pub phone: Option<String>,
    /// Contact email.
    #[serde(default)]
    pub email: Option<String>,
    /// Website URL.
    #[serde(default)]
    pub website: Option<String>,
    /// Street address.
    #[serde(default)]
    pub address: Option<String>,
    /// Open/close hours keyed by day name.
    #[serde(default)]
    pub hours: serde_json::Map<String, serde_json::Value>,
    /// Whether the restaurant is visible.
    #[serde(default = "default_true")]
    pub is_active: bool,
    /// Whether the restaurant is featured on the landing page.
    #[serde(default)]
    pub is_featured: bool,
    /// Owner contact, if assigned.
    #[serde(default)]
    pub owner: Option<OwnerRef>,
    /// Editor assignment, if any.
    #[serde(default)]
    pub editor: Option<EditorRef>,
}

const fn default_true() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_deserializes_store_field_names() {
        let restaurant: Restaurant = serde_json::from_value(json!({
            "slug": "lezzet-duragi",
            "name": "Lezzet Durağı",
            "cuisineTypes": ["Kebap"],
            "tags": ["aile"],
            "isActive": true,
            "isFeatured": false,
            "editor": { "email": "editor@example.com", "userId": "uid-1" }
        }))
        .expect("deserialize");

        assert_eq!(restaurant.cuisine_types, vec!["Kebap"]);
        assert_eq!(
            restaurant.editor.expect("editor").user_id,
            "uid-1"
        );
    }

    #[test]
    fn test_missing_flags_default() {
        let restaurant: Restaurant = serde_json::from_value(json!({
            "slug": "x",
            "name": "X"
        }))
        .expect("deserialize");

        assert!(restaurant.is_active);
        assert!(!restaurant.is_featured);
        assert!(restaurant.owner.is_none());
    }

    #[test]
    fn test_serializes_camel_case() {
        let restaurant = Restaurant {
            slug: "x".to_string(),
            name: "X".to_string(),
            description: None,
            cuisine_types: vec!["Pide".to_string()],
            tags: vec![],
            phone: None,
            email: None,
            website: None,
            address: None,
            hours: serde_json::Map::new(),
            is_active: true,
            is_featured: true,
            owner: None,
            editor: None,
        };

        let json = serde_json::to_value(&restaurant).expect("serialize");
        assert_eq!(json["cuisineTypes"], json!(["Pide"]));
        assert_eq!(json["isFeatured"], json!(true));
    }
}
