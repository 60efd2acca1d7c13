//! Parsing of model output into structured menu suggestions.

use lezzet_server::gemini::parse_menu_suggestions;

const MODEL_JSON: &str = r#"{
    "menuName": "Akşam Menüsü",
    "description": "Izgara ağırlıklı",
    "categories": [
        {
            "name": "Izgaralar",
            "products": [
                {"name": "Pirzola", "price": "320 TL", "description": ""},
                {"name": "Köfte", "price": "260 TL", "description": "El yapımı"}
            ]
        }
    ]
}"#;

#[test]
fn test_clean_json_parses_fully() {
    let parsed = parse_menu_suggestions(MODEL_JSON);
    assert!(parsed.warning.is_none());
    assert_eq!(parsed.suggestions.menu_name, "Akşam Menüsü");
    assert_eq!(parsed.suggestions.categories[0].products.len(), 2);
}

#[test]
fn test_fenced_json_parses() {
    let fenced = format!("```json\n{MODEL_JSON}\n```");
    let parsed = parse_menu_suggestions(&fenced);
    assert!(parsed.warning.is_none());
    assert_eq!(parsed.suggestions.categories.len(), 1);
}

#[test]
fn test_json_buried_in_prose_parses() {
    let chatty = format!("Tabii, işte menü:\n\n{MODEL_JSON}\n\nBaşka bir isteğiniz var mı?");
    let parsed = parse_menu_suggestions(&chatty);
    assert!(parsed.warning.is_none());
    assert_eq!(parsed.suggestions.categories[0].products[1].name, "Köfte");
}

#[test]
fn test_garbage_output_yields_placeholder_with_warning() {
    let parsed = parse_menu_suggestions("Üzgünüm, bu görselde menü göremedim.");
    let warning = parsed.warning.expect("warning expected");
    assert!(!warning.is_empty());
    assert_eq!(parsed.suggestions.menu_name, "Menü Adı");
    assert!(parsed.suggestions.categories.is_empty());
}

#[test]
fn test_truncated_json_yields_placeholder_not_panic() {
    let truncated = r#"{"menuName": "Menü", "categories": [{"name": "Izgar"#;
    let parsed = parse_menu_suggestions(truncated);
    assert!(parsed.warning.is_some());
}
