//! Role gating and editor ownership rules.

use lezzet_core::types::{Role, UserId};
use lezzet_server::db::editor_owns;
use lezzet_server::models::restaurant::{EditorRef, Restaurant};

fn restaurant(editor_uid: Option<&str>) -> Restaurant {
    Restaurant {
        slug: "lezzet-duragi".to_string(),
        name: "Lezzet Durağı".to_string(),
        description: None,
        cuisine_types: vec!["Kebap".to_string()],
        tags: vec![],
        phone: None,
        email: None,
        website: None,
        address: None,
        hours: serde_json::Map::new(),
        is_active: true,
        is_featured: false,
        owner: None,
        editor: editor_uid.map(|uid| EditorRef {
            email: "editor@example.com".to_string(),
            user_id: uid.to_string(),
        }),
    }
}

#[test]
fn test_admin_gate_matrix() {
    assert!(Role::Admin.can_access_admin());
    assert!(!Role::Editor.can_access_admin());
    assert!(!Role::Owner.can_access_admin());
    assert!(!Role::Subscriber.can_access_admin());
}

#[test]
fn test_editor_gate_matrix() {
    assert!(Role::Admin.can_access_editor());
    assert!(Role::Editor.can_access_editor());
    assert!(!Role::Owner.can_access_editor());
    assert!(!Role::Subscriber.can_access_editor());
}

#[test]
fn test_unknown_role_strings_default_to_subscriber() {
    assert!("superuser".parse::<Role>().is_err());
    assert_eq!(Role::default(), Role::Subscriber);
}

#[test]
fn test_editor_reference_is_sole_authorization_source() {
    let assigned = restaurant(Some("editor-1"));
    assert!(editor_owns(&assigned, &UserId::from("editor-1")));
    assert!(!editor_owns(&assigned, &UserId::from("editor-2")));

    // No editor reference means no editor may mutate it.
    let unassigned = restaurant(None);
    assert!(!editor_owns(&unassigned, &UserId::from("editor-1")));
}

#[test]
fn test_editor_reference_round_trips_store_field_names() {
    let record = restaurant(Some("editor-1"));
    let json = serde_json::to_value(&record).expect("serialize");
    assert_eq!(json["editor"]["userId"], "editor-1");
    assert_eq!(json["cuisineTypes"][0], "Kebap");
    assert_eq!(json["isActive"], true);

    let back: Restaurant = serde_json::from_value(json).expect("deserialize");
    assert!(editor_owns(&back, &UserId::from("editor-1")));
}
