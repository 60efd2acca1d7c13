//! Slug generation for restaurant and cuisine identifiers.
//!
//! Slugs double as document IDs, so they must be URL-safe and unique
//! within their collection. Collisions are disambiguated with a Unix
//! timestamp suffix, appended once without a retry loop. Two collisions
//! within the same second are a known limitation.

use chrono::{DateTime, Utc};

/// Turkish characters that lowercase-and-strip would otherwise discard.
const TRANSLITERATIONS: [(char, char); 6] = [
    ('ı', 'i'),
    ('ğ', 'g'),
    ('ü', 'u'),
    ('ş', 's'),
    ('ö', 'o'),
    ('ç', 'c'),
];

/// Generate a unique restaurant slug from a display name.
///
/// `exists` reports whether a candidate slug is already taken. `now` is
/// passed explicitly so callers and tests control the timestamp used for
/// fallbacks and collision suffixes.
pub fn restaurant_slug(name: &str, exists: impl Fn(&str) -> bool, now: DateTime<Utc>) -> String {
    generate_slug(name, "restaurant", exists, now)
}

/// Generate a unique cuisine slug from a display name.
pub fn cuisine_slug(name: &str, exists: impl Fn(&str) -> bool, now: DateTime<Utc>) -> String {
    generate_slug(name, "cuisine", exists, now)
}

fn generate_slug(
    name: &str,
    fallback_prefix: &str,
    exists: impl Fn(&str) -> bool,
    now: DateTime<Utc>,
) -> String {
    let slug = normalize(name);

    let slug = if slug.is_empty() {
        format!("{fallback_prefix}-{}", now.timestamp())
    } else {
        slug
    };

    if exists(&slug) {
        return format!("{slug}-{}", now.timestamp());
    }
    slug
}

/// Lowercase, transliterate Turkish letters, strip everything outside
/// `[a-z0-9\s-]`, collapse whitespace runs to single hyphens, collapse
/// repeated hyphens, and trim leading/trailing hyphens.
#[must_use]
pub fn normalize(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut last_was_hyphen = false;

    for ch in name.trim().chars().flat_map(char::to_lowercase) {
        let ch = TRANSLITERATIONS
            .iter()
            .find(|(from, _)| *from == ch)
            .map_or(ch, |(_, to)| *to);

        let mapped = if ch.is_whitespace() || ch == '-' {
            Some('-')
        } else if ch.is_ascii_lowercase() || ch.is_ascii_digit() {
            Some(ch)
        } else {
            None
        };

        match mapped {
            Some('-') => {
                if !last_was_hyphen && !out.is_empty() {
                    out.push('-');
                    last_was_hyphen = true;
                }
            }
            Some(c) => {
                out.push(c);
                last_was_hyphen = false;
            }
            None => {}
        }
    }

    out.trim_end_matches('-').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(ts: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(ts, 0).single().expect("valid timestamp")
    }

    #[test]
    fn test_normalize_basic() {
        assert_eq!(normalize("Lezzet Durağı"), "lezzet-duragi");
        assert_eq!(normalize("  Çiğköfte  Salonu "), "cigkofte-salonu");
        assert_eq!(normalize("Kebab & Grill #1"), "kebab-grill-1");
    }

    #[test]
    fn test_normalize_collapses_hyphen_runs() {
        assert_eq!(normalize("a --  - b"), "a-b");
        assert_eq!(normalize("--edge--"), "edge");
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let inputs = ["Lezzet Durağı", "a --  - b", "Kebab & Grill #1"];
        for input in inputs {
            let once = normalize(input);
            assert_eq!(normalize(&once), once, "not idempotent for {input:?}");
        }
    }

    #[test]
    fn test_empty_and_punctuation_only_fall_back() {
        let now = at(1_700_000_000);
        assert_eq!(
            restaurant_slug("", |_| false, now),
            "restaurant-1700000000"
        );
        assert_eq!(
            restaurant_slug("!!! ???", |_| false, now),
            "restaurant-1700000000"
        );
        assert_eq!(cuisine_slug("", |_| false, now), "cuisine-1700000000");
    }

    #[test]
    fn test_collision_appends_timestamp_exactly_once() {
        let now = at(1_700_000_000);
        let slug = restaurant_slug("Lezzet Durağı", |_| true, now);
        assert_eq!(slug, "lezzet-duragi-1700000000");
    }

    #[test]
    fn test_no_collision_keeps_plain_slug() {
        let now = at(1_700_000_000);
        let slug = restaurant_slug("Lezzet Durağı", |s| s != "lezzet-duragi", now);
        assert_eq!(slug, "lezzet-duragi");
    }
}
