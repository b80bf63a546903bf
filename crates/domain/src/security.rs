use serde::{Deserialize, Serialize};

/// Stable audit actions emitted by permission administration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditAction {
    /// Emitted when a catalogue permission is created.
    SecurityPermissionCreated,
    /// Emitted when a permission is granted to a user.
    SecurityPermissionGranted,
    /// Emitted when a user grant is revoked.
    SecurityPermissionRevoked,
    /// Emitted when a user grant expiry is changed.
    SecurityPermissionExpiryUpdated,
}

impl AuditAction {
    /// Returns a stable storage value for this action.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SecurityPermissionCreated => "security.permission.created",
            Self::SecurityPermissionGranted => "security.permission.granted",
            Self::SecurityPermissionRevoked => "security.permission.revoked",
            Self::SecurityPermissionExpiryUpdated => "security.permission.expiry_updated",
        }
    }
}
