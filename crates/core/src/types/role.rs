//! User roles and endpoint authorization capabilities.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Error returned when parsing an unknown role string.
#[derive(thiserror::Error, Debug, Clone)]
#[error("unknown role: {0}")]
pub struct RoleParseError(pub String);

/// A user's role, resolved from the record store.
///
/// Roles govern endpoint authorization: `/api/admin/*` requires [`Role::Admin`],
/// `/api/editor/*` requires [`Role::Editor`] or [`Role::Admin`]. New users
/// default to [`Role::Subscriber`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Full access to all admin and editor endpoints.
    Admin,
    /// May manage the restaurants (and their menus) assigned to them.
    Editor,
    /// Restaurant owner contact; no elevated endpoint access.
    Owner,
    /// Default role for newly verified users.
    #[default]
    Subscriber,
}

impl Role {
    /// All valid role names, in display order.
    pub const ALL: [Self; 4] = [Self::Admin, Self::Editor, Self::Owner, Self::Subscriber];

    /// Whether this role may access `/api/admin/*` endpoints.
    #[must_use]
    pub const fn can_access_admin(self) -> bool {
        matches!(self, Self::Admin)
    }

    /// Whether this role may access `/api/editor/*` endpoints.
    ///
    /// Admins pass the gate too; they additionally bypass per-restaurant
    /// ownership checks.
    #[must_use]
    pub const fn can_access_editor(self) -> bool {
        matches!(self, Self::Admin | Self::Editor)
    }

    /// The role name as stored in user documents.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Editor => "editor",
            Self::Owner => "owner",
            Self::Subscriber => "subscriber",
        }
    }

    /// Parse a stored role name.
    ///
    /// # Errors
    ///
    /// Returns `RoleParseError` for anything outside the fixed enumeration.
    pub fn parse(s: &str) -> Result<Self, RoleParseError> {
        match s {
            "admin" => Ok(Self::Admin),
            "editor" => Ok(Self::Editor),
            "owner" => Ok(Self::Owner),
            "subscriber" => Ok(Self::Subscriber),
            other => Err(RoleParseError(other.to_owned())),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = RoleParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
