//! Extraction of structured menu suggestions from model output.
//!
//! The model is asked for a fixed JSON shape but frequently wraps it in
//! markdown fences or prose. Parsing tries progressively looser
//! strategies and finally falls back to an empty placeholder rather than
//! failing the request.

use serde::{Deserialize, Serialize};

/// Structured menu extracted from a menu photo.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MenuSuggestions {
    #[serde(rename = "menuName", default)]
    pub menu_name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub categories: Vec<SuggestedCategory>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SuggestedCategory {
    pub name: String,
    #[serde(default)]
    pub products: Vec<SuggestedProduct>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SuggestedProduct {
    pub name: String,
    #[serde(default)]
    pub price: String,
    #[serde(default)]
    pub description: String,
}

/// Outcome of parsing model output into suggestions.
#[derive(Debug, Clone)]
pub struct ParsedSuggestions {
    pub suggestions: MenuSuggestions,
    /// Set when the model output was not parseable and a placeholder was
    /// substituted.
    pub warning: Option<String>,
}

/// Parse model output into menu suggestions.
///
/// Strategies, in order: strip markdown fences and parse directly; parse
/// the span from the first `{` to the last `}`; substitute a placeholder
/// with a warning. This never fails, mirroring the forgiving behavior the
/// editor UI expects.
#[must_use]
pub fn parse_menu_suggestions(raw: &str) -> ParsedSuggestions {
    let stripped = strip_markdown_fences(raw.trim());

    if let Ok(suggestions) = serde_json::from_str::<MenuSuggestions>(stripped.trim()) {
        return ParsedSuggestions {
            suggestions,
            warning: None,
        };
    }

    if let Some(span) = json_object_span(stripped)
        && let Ok(suggestions) = serde_json::from_str::<MenuSuggestions>(span)
    {
        return ParsedSuggestions {
            suggestions,
            warning: None,
        };
    }

    ParsedSuggestions {
        suggestions: MenuSuggestions {
            menu_name: "Menü Adı".to_string(),
            description: "Menü açıklaması buraya gelecek".to_string(),
            categories: vec![],
        },
        warning: Some(
            "AI yanıtı JSON formatında değil, varsayılan format kullanıldı".to_string(),
        ),
    }
}

fn strip_markdown_fences(text: &str) -> &str {
    let text = text
        .strip_prefix("```json")
        .or_else(|| text.strip_prefix("```"))
        .unwrap_or(text);
    text.strip_suffix("```").unwrap_or(text)
}

/// The span from the first `{` to the last `}`, inclusive.
fn json_object_span(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    if end < start {
        return None;
    }
    Some(&text[start..=end])
}

#[cfg(test)]
mod tests {
    use super::*;

    const WELL_FORMED: &str = r#"{
        "menuName": "Ana Menü",
        "description": "Günlük menü",
        "categories": [{
            "name": "Kebaplar",
            "products": [{"name": "Adana", "price": "240 TL", "description": ""}]
        }]
    }"#;

    #[test]
    fn test_parses_plain_json() {
        let parsed = parse_menu_suggestions(WELL_FORMED);
        assert!(parsed.warning.is_none());
        assert_eq!(parsed.suggestions.menu_name, "Ana Menü");
        assert_eq!(parsed.suggestions.categories[0].products[0].name, "Adana");
    }

    #[test]
    fn test_strips_markdown_fences() {
        let fenced = format!("```json\n{WELL_FORMED}\n```");
        let parsed = parse_menu_suggestions(&fenced);
        assert!(parsed.warning.is_none());
        assert_eq!(parsed.suggestions.menu_name, "Ana Menü");
    }

    #[test]
    fn test_extracts_json_span_from_prose() {
        let wrapped = format!("İşte menü bilgileri:\n{WELL_FORMED}\nUmarım yardımcı olur.");
        let parsed = parse_menu_suggestions(&wrapped);
        assert!(parsed.warning.is_none());
        assert_eq!(parsed.suggestions.categories.len(), 1);
    }

    #[test]
    fn test_unparseable_output_falls_back_with_warning() {
        let parsed = parse_menu_suggestions("Maalesef menüyü okuyamadım.");
        assert!(parsed.warning.is_some());
        assert_eq!(parsed.suggestions.menu_name, "Menü Adı");
        assert!(parsed.suggestions.categories.is_empty());
    }

    #[test]
    fn test_missing_optional_fields_default() {
        let parsed = parse_menu_suggestions(r#"{"menuName": "X"}"#);
        assert!(parsed.warning.is_none());
        assert_eq!(parsed.suggestions.description, "");
        assert!(parsed.suggestions.categories.is_empty());
    }

    #[test]
    fn test_json_object_span_bounds() {
        assert_eq!(json_object_span("ab {1} cd"), Some("{1}"));
        assert_eq!(json_object_span("no braces"), None);
        assert_eq!(json_object_span("} reversed {"), None);
    }
}
