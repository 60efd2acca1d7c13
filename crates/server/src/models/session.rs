//! Session-stored user identity.

use lezzet_core::types::Role;
use serde::{Deserialize, Serialize};

/// Session keys.
pub mod session_keys {
    pub const CURRENT_USER: &str = "current_user";
}

/// The signed-in user, as stored in the server-side session after a
/// successful token verification.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentUser {
    pub uid: String,
    pub email: Option<String>,
    pub display_name: Option<String>,
    pub photo_url: Option<String>,
    pub role: Role,
}

impl CurrentUser {
    pub fn is_admin(&self) -> bool {
        self.role.can_access_admin()
    }

    pub fn is_editor(&self) -> bool {
        self.role.can_access_editor()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user_with_role(role: Role) -> CurrentUser {
        CurrentUser {
            uid: "uid-1".to_string(),
            email: Some("user@example.com".to_string()),
            display_name: None,
            photo_url: None,
            role,
        }
    }

    #[test]
    fn test_admin_passes_both_gates() {
        let user = user_with_role(Role::Admin);
        assert!(user.is_admin());
        assert!(user.is_editor());
    }

    #[test]
    fn test_editor_is_not_admin() {
        let user = user_with_role(Role::Editor);
        assert!(!user.is_admin());
        assert!(user.is_editor());
    }

    #[test]
    fn test_subscriber_passes_neither_gate() {
        let user = user_with_role(Role::Subscriber);
        assert!(!user.is_admin());
        assert!(!user.is_editor());
    }

    #[test]
    fn test_round_trips_through_session_json() {
        let user = user_with_role(Role::Editor);
        let json = serde_json::to_string(&user).expect("serialize");
        let back: CurrentUser = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back.uid, "uid-1");
        assert_eq!(back.role, Role::Editor);
    }
}
