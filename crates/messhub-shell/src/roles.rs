//! Roles and permissions
//!
//! The three MessHub roles, their hierarchy, and what each may do.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    User,
    MessOwner,
    ProjectAdmin,
}

impl UserRole {
    /// Position in the role hierarchy; higher ranks include lower ones
    pub fn rank(&self) -> u8 {
        match self {
            UserRole::User => 1,
            UserRole::MessOwner => 2,
            UserRole::ProjectAdmin => 3,
        }
    }

    /// Permissions granted to this role
    pub fn permissions(&self) -> &'static [&'static str] {
        match self {
            UserRole::User => &["view_menu", "place_order", "view_orders", "update_profile"],
            UserRole::MessOwner => &[
                "view_menu",
                "place_order",
                "view_orders",
                "update_profile",
                "manage_menu",
                "view_analytics",
                "manage_orders",
                "view_customers",
            ],
            UserRole::ProjectAdmin => &[
                "view_menu",
                "place_order",
                "view_orders",
                "update_profile",
                "manage_menu",
                "view_analytics",
                "manage_orders",
                "view_customers",
                "manage_users",
                "create_admins",
                "system_settings",
                "view_all_data",
            ],
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            UserRole::User => "Food Lover",
            UserRole::MessOwner => "Mess Owner",
            UserRole::ProjectAdmin => "Project Admin",
        }
    }
}

pub fn has_permission(role: UserRole, permission: &str) -> bool {
    role.permissions().contains(&permission)
}

/// Whether `role` may access content gated at `target`
pub fn can_access_role(role: UserRole, target: UserRole) -> bool {
    role.rank() >= target.rank()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hierarchy_is_inclusive_upward() {
        assert!(can_access_role(UserRole::ProjectAdmin, UserRole::User));
        assert!(can_access_role(UserRole::MessOwner, UserRole::User));
        assert!(can_access_role(UserRole::User, UserRole::User));
        assert!(!can_access_role(UserRole::User, UserRole::MessOwner));
        assert!(!can_access_role(UserRole::MessOwner, UserRole::ProjectAdmin));
    }

    #[test]
    fn test_permissions_grow_with_rank() {
        assert!(has_permission(UserRole::User, "place_order"));
        assert!(!has_permission(UserRole::User, "manage_menu"));
        assert!(has_permission(UserRole::MessOwner, "manage_menu"));
        assert!(!has_permission(UserRole::MessOwner, "manage_users"));
        assert!(has_permission(UserRole::ProjectAdmin, "manage_users"));
    }

    #[test]
    fn test_role_serializes_snake_case() {
        assert_eq!(
            serde_json::to_string(&UserRole::MessOwner).unwrap(),
            r#""mess_owner""#
        );
        assert_eq!(
            serde_json::from_str::<UserRole>(r#""project_admin""#).unwrap(),
            UserRole::ProjectAdmin
        );
    }
}
