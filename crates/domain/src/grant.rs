use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::{PermissionName, UserId};

/// Per-user permission grant.
///
/// Grants are never deleted; revocation flips `is_active` so history stays
/// auditable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PermissionGrant {
    /// Stable grant identifier.
    pub grant_id: Uuid,
    /// Grantee.
    pub user_id: UserId,
    /// Granted permission.
    pub permission: PermissionName,
    /// Cleared when the grant is revoked.
    pub is_active: bool,
    /// Instant after which the grant no longer applies. `None` never expires.
    pub expires_at: Option<DateTime<Utc>>,
    /// Administrator that created the grant.
    pub granted_by: Option<UserId>,
    /// Creation timestamp.
    pub granted_at: DateTime<Utc>,
}

impl PermissionGrant {
    /// Returns whether the grant applies at `as_of`.
    #[must_use]
    pub fn is_effective_at(&self, as_of: DateTime<Utc>) -> bool {
        self.is_active
            && self
                .expires_at
                .is_none_or(|expires_at| expires_at > as_of)
    }
}
