//! Cuisine type records.

use serde::{Deserialize, Serialize};

/// A cuisine type record (e.g. "Kebap", "Ev Yemekleri").
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cuisine {
    /// Display name; also the source of the record slug.
    pub name: String,
    /// Free-text description.
    #[serde(default)]
    pub description: String,
    /// Whether the cuisine is visible.
    #[serde(default = "default_true")]
    pub is_active: bool,
}

/// A cuisine annotated with how many active restaurants reference it.
///
/// The count is recomputed on every read rather than stored, so stale
/// counters cannot survive restaurant edits.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CuisineWithCount {
    #[serde(flatten)]
    pub cuisine: Cuisine,
    pub restaurant_count: u64,
}

const fn default_true() -> bool {
    true
}
