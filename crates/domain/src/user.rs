use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a user record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(Uuid);

impl UserId {
    /// Creates a new random user identifier.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates a user identifier from an existing UUID value.
    #[must_use]
    pub fn from_uuid(value: Uuid) -> Self {
        Self(value)
    }

    /// Returns the underlying UUID value.
    #[must_use]
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for UserId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

/// Account projection consumed by access resolution.
///
/// A superadmin is also shown as an admin, but the flag is evaluated on its
/// own and overrides everything else.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserAccount {
    /// Stable account identifier.
    pub user_id: UserId,
    /// Name shown in the session.
    pub display_name: String,
    /// Login email, when present.
    pub email: Option<String>,
    /// Role flag granting admin-area entry.
    pub is_admin: bool,
    /// Role flag granting every permission.
    pub is_super_admin: bool,
    /// Deactivated accounts resolve to no access at all.
    pub is_active: bool,
}

impl UserAccount {
    /// Returns whether the account may be resolved at all.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.is_active
    }
}
