use serde::Serialize;

use crate::{ADMIN_FULL_ACCESS, PermissionName, UserAccount};

/// Derived view of what one user may do right now.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccessDecision {
    /// Whether the administrative area may be entered.
    pub can_access_admin: bool,
    /// Admin role flag of the account.
    pub is_admin: bool,
    /// Superadmin role flag of the account.
    pub is_super_admin: bool,
    /// Effective permission names, in store order. `["*"]` for superadmins.
    pub permissions: Vec<PermissionName>,
}

impl AccessDecision {
    /// Fail-closed decision for absent or inactive accounts.
    #[must_use]
    pub fn denied() -> Self {
        Self {
            can_access_admin: false,
            is_admin: false,
            is_super_admin: false,
            permissions: Vec::new(),
        }
    }

    /// Decision for a superadmin: everything, without consulting grants.
    #[must_use]
    pub fn super_admin(user: &UserAccount) -> Self {
        Self {
            can_access_admin: true,
            is_admin: user.is_admin,
            is_super_admin: true,
            permissions: vec![PermissionName::wildcard()],
        }
    }

    /// Decision for a regular account holding `permissions`.
    #[must_use]
    pub fn from_permissions(user: &UserAccount, permissions: Vec<PermissionName>) -> Self {
        let can_access_admin = user.is_admin
            || permissions
                .iter()
                .any(|permission| permission.as_str() == ADMIN_FULL_ACCESS)
            || permissions
                .iter()
                .any(PermissionName::is_admin_namespace);

        Self {
            can_access_admin,
            is_admin: user.is_admin,
            is_super_admin: false,
            permissions,
        }
    }

    /// Returns whether `required` is held, treating `*` as a universal match.
    #[must_use]
    pub fn allows(&self, required: &PermissionName) -> bool {
        self.permissions
            .iter()
            .any(|permission| permission.matches(required))
    }

    /// Returns whether the navigation menu `menu_name` is visible.
    #[must_use]
    pub fn can_access_menu(&self, menu_name: &str) -> bool {
        self.is_super_admin
            || PermissionName::menu(menu_name)
                .map(|required| self.allows(&required))
                .unwrap_or(false)
    }

    /// Returns whether the navigation submenu `submenu_path` is visible.
    #[must_use]
    pub fn can_access_submenu(&self, submenu_path: &str) -> bool {
        self.is_super_admin
            || PermissionName::submenu(submenu_path)
                .map(|required| self.allows(&required))
                .unwrap_or(false)
    }
}
