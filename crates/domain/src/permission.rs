use std::fmt::{Display, Formatter};
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tessera_core::{AppError, AppResult, NonEmptyString};
use uuid::Uuid;

/// Permission that alone confers entry to the administrative area.
pub const ADMIN_FULL_ACCESS: &str = "admin.full_access";

const ADMIN_NAMESPACE: &str = "admin.";

const WILDCARD: &str = "*";
const MENU_PREFIX: &str = "read:menu:";
const SUBMENU_PREFIX: &str = "read:submenu:";

/// Dot-namespaced permission name such as `reports.view`.
///
/// The wildcard `*` is a sentinel meaning "every permission". It can only be
/// built through [`PermissionName::wildcard`] and never parses from transport.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PermissionName(String);

impl PermissionName {
    /// Parses a stored or transported permission name.
    pub fn new(value: impl Into<String>) -> AppResult<Self> {
        let value = value.into();
        let trimmed = value.trim();

        if trimmed.is_empty() {
            return Err(AppError::Validation(
                "permission name must not be empty".to_owned(),
            ));
        }

        if trimmed == WILDCARD {
            return Err(AppError::Validation(
                "permission name '*' is reserved".to_owned(),
            ));
        }

        if let Some(invalid) = trimmed
            .chars()
            .find(|character| !is_permission_character(*character))
        {
            return Err(AppError::Validation(format!(
                "permission name '{trimmed}' contains invalid character '{invalid}'"
            )));
        }

        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the wildcard sentinel granted to superadmins.
    #[must_use]
    pub fn wildcard() -> Self {
        Self(WILDCARD.to_owned())
    }

    /// Returns the permission that opens one navigation menu.
    pub fn menu(menu_name: &str) -> AppResult<Self> {
        Self::new(format!("{MENU_PREFIX}{menu_name}"))
    }

    /// Returns the permission that opens one navigation submenu.
    pub fn submenu(submenu_path: &str) -> AppResult<Self> {
        Self::new(format!("{SUBMENU_PREFIX}{submenu_path}"))
    }

    /// Returns the underlying string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Returns whether this is the wildcard sentinel.
    #[must_use]
    pub fn is_wildcard(&self) -> bool {
        self.0 == WILDCARD
    }

    /// Returns whether the name lives in the `admin.` namespace.
    #[must_use]
    pub fn is_admin_namespace(&self) -> bool {
        self.0.starts_with(ADMIN_NAMESPACE)
    }

    /// Returns whether holding this permission satisfies `required`.
    #[must_use]
    pub fn matches(&self, required: &PermissionName) -> bool {
        self.is_wildcard() || self == required
    }
}

fn is_permission_character(character: char) -> bool {
    character.is_ascii_alphanumeric() || matches!(character, '.' | '_' | '-' | ':' | '/')
}

impl FromStr for PermissionName {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::new(value)
    }
}

impl TryFrom<String> for PermissionName {
    type Error = AppError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<PermissionName> for String {
    fn from(value: PermissionName) -> Self {
        value.0
    }
}

impl Display for PermissionName {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// Catalogue entry describing a grantable permission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PermissionDefinition {
    /// Stable catalogue identifier.
    pub permission_id: Uuid,
    /// Unique permission name.
    pub name: PermissionName,
    /// Optional human-readable description.
    pub description: Option<String>,
    /// Grouping label shown in administration screens.
    pub category: NonEmptyString,
    /// Whether new grants may reference this entry.
    pub is_active: bool,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}
