//! Slug generation properties.

use chrono::{DateTime, TimeZone, Utc};
use lezzet_server::services::slug::{cuisine_slug, normalize, restaurant_slug};

fn at(ts: i64) -> DateTime<Utc> {
    Utc.timestamp_opt(ts, 0).single().expect("valid timestamp")
}

#[test]
fn test_turkish_names_become_ascii_slugs() {
    let slug = restaurant_slug("Çiğ Köfteci Şükrü", |_| false, at(0));
    assert_eq!(slug, "cig-kofteci-sukru");
}

#[test]
fn test_normalization_is_idempotent() {
    for name in ["Lezzet Durağı", "A  &  B", "--x--", "Üç Güzeller"] {
        let once = normalize(name);
        assert_eq!(normalize(&once), once, "not idempotent for {name:?}");
    }
}

#[test]
fn test_removable_only_names_use_fallback_never_empty() {
    for name in ["", "!!!", "???", "., ,.", "שלום"] {
        let slug = restaurant_slug(name, |_| false, at(1_700_000_000));
        assert_eq!(slug, "restaurant-1700000000", "for name {name:?}");
    }
}

#[test]
fn test_always_colliding_predicate_appends_suffix_exactly_once() {
    let slug = restaurant_slug("Lezzet Durağı", |_| true, at(1_700_000_000));
    assert_eq!(slug, "lezzet-duragi-1700000000");
    // The suffixed form is itself a valid normalized slug.
    assert_eq!(normalize(&slug), slug);
}

#[test]
fn test_cuisine_variant_uses_cuisine_prefix() {
    assert_eq!(cuisine_slug("", |_| false, at(42)), "cuisine-42");
    assert_eq!(cuisine_slug("Ev Yemekleri", |_| false, at(42)), "ev-yemekleri");
}
