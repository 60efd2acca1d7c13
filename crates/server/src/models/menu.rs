//! Menu record types.

use serde::{Deserialize, Serialize};

/// A single menu item within a category.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuItem {
    /// Item name.
    pub name: String,
    /// Price as a display string (e.g. "120 TL").
    #[serde(default)]
    pub price: String,
    /// Free-text description.
    #[serde(default)]
    pub description: Option<String>,
    /// Allergen labels.
    #[serde(default)]
    pub allergens: Vec<String>,
    /// Spice-level label (e.g. "acılı").
    #[serde(default)]
    pub spice_level: Option<String>,
}

/// An ordered category of menu items.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MenuCategory {
    /// Category name.
    pub name: String,
    /// Items in display order.
    #[serde(default)]
    pub items: Vec<MenuItem>,
}

/// A menu record. Each menu belongs to exactly one restaurant.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Menu {
    /// Menu display name.
    pub name: String,
    /// Free-text description.
    #[serde(default)]
    pub description: String,
    /// Owning restaurant's slug.
    pub restaurant_id: String,
    /// Language tag for the menu text (default Turkish).
    #[serde(default = "default_language")]
    pub language: String,
    /// Categories in display order.
    #[serde(default)]
    pub categories: Vec<MenuCategory>,
    /// Whether the menu is visible.
    #[serde(default = "default_true")]
    pub is_active: bool,
    /// Flags marking which text fields were AI-generated.
    #[serde(rename = "isAIGenerated", default)]
    pub is_ai_generated: serde_json::Map<String, serde_json::Value>,
    /// Owning restaurant's display name, annotated at read time for editor
    /// listings; never stored.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub restaurant_name: Option<String>,
}

fn default_language() -> String {
    "tr".to_string()
}

const fn default_true() -> bool {
    true
}
