//! Newtype IDs for type-safe entity references.
//!
//! Use the `define_id!` macro to create type-safe ID wrappers that prevent
//! accidentally mixing IDs from different entity types. All identifiers in
//! the document store are strings: Firebase user UIDs, restaurant slugs,
//! store-generated menu document IDs, and cuisine IDs derived from names.

/// Macro to define a type-safe string ID wrapper.
///
/// Creates a newtype wrapper around `String` with:
/// - `Serialize`/`Deserialize` with `#[serde(transparent)]`
/// - `Debug`, `Clone`, `PartialEq`, `Eq`, `Hash`
/// - Conversion methods: `new()`, `as_str()`, `into_inner()`
/// - `From<String>`, `From<&str>`, and `Display` implementations
///
/// # Example
///
/// ```rust
/// # use lezzet_core::define_id;
/// define_id!(UserId);
/// define_id!(MenuId);
///
/// let user_id = UserId::new("abc123");
/// let menu_id = MenuId::new("abc123");
///
/// // These are different types, so this won't compile:
/// // let _: UserId = menu_id;
/// ```
#[macro_export]
macro_rules! define_id {
    ($name:ident) => {
        #[derive(
            Debug,
            Clone,
            PartialEq,
            Eq,
            Hash,
            ::serde::Serialize,
            ::serde::Deserialize
        )]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Create a new ID from a string value.
            #[must_use]
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Get the underlying string value.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consume the ID and return its inner string.
            #[must_use]
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_owned())
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

define_id!(UserId);
define_id!(RestaurantSlug);
define_id!(MenuId);
define_id!(CuisineId);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_are_distinct_types() {
        fn takes_user_id(_id: &UserId) {}
        let id = UserId::new("u-1");
        takes_user_id(&id);
    }

    #[test]
    fn test_id_display_and_accessors() {
        let slug = RestaurantSlug::new("lezzet-duragi");
        assert_eq!(slug.as_str(), "lezzet-duragi");
        assert_eq!(slug.to_string(), "lezzet-duragi");
        assert_eq!(slug.clone().into_inner(), "lezzet-duragi");
    }

    #[test]
    fn test_id_serde_transparent() {
        let id = MenuId::new("m-42");
        let json = serde_json::to_string(&id).expect("serialize");
        assert_eq!(json, "\"m-42\"");

        let back: MenuId = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, id);
    }

    #[test]
    fn test_id_from_conversions() {
        let a = CuisineId::from("kebap");
        let b: CuisineId = String::from("kebap").into();
        assert_eq!(a, b);
        let s: String = a.into();
        assert_eq!(s, "kebap");
    }
}
