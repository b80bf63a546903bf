use std::sync::Arc;

use chrono::{DateTime, Utc};
use tessera_core::{AppResult, UserIdentity};
use tessera_domain::{PermissionName, UserId};

use crate::{
    AccessResolver, AuditEvent, AuditLogRepository, AuditRepository, PermissionCatalogRepository,
    PermissionGrantRepository, UserAccessRepository,
};

mod audit;
mod catalog;
mod grants;


/// Input payload for granting a permission to a user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GrantPermissionInput {
    /// Grantee.
    pub user_id: UserId,
    /// Catalogue permission to grant.
    pub permission: PermissionName,
    /// Optional expiry; must be in the future.
    pub expires_at: Option<DateTime<Utc>>,
}

/// Application service for permission catalogue and grant administration.
#[derive(Clone)]
pub struct PermissionAdminService {
    access_resolver: AccessResolver,
    user_repository: Arc<dyn UserAccessRepository>,
    grant_repository: Arc<dyn PermissionGrantRepository>,
    catalog_repository: Arc<dyn PermissionCatalogRepository>,
    audit_repository: Arc<dyn AuditRepository>,
    audit_log_repository: Arc<dyn AuditLogRepository>,
}

impl PermissionAdminService {
    /// Creates a new service from required dependencies.
    #[must_use]
    pub fn new(
        access_resolver: AccessResolver,
        user_repository: Arc<dyn UserAccessRepository>,
        grant_repository: Arc<dyn PermissionGrantRepository>,
        catalog_repository: Arc<dyn PermissionCatalogRepository>,
        audit_repository: Arc<dyn AuditRepository>,
        audit_log_repository: Arc<dyn AuditLogRepository>,
    ) -> Self {
        Self {
            access_resolver,
            user_repository,
            grant_repository,
            catalog_repository,
            audit_repository,
            audit_log_repository,
        }
    }

    async fn require_admin(&self, actor: &UserIdentity) -> AppResult<UserId> {
        let actor_id = UserId::from_uuid(actor.user_id());
        self.access_resolver.require_admin_access(actor_id).await?;
        Ok(actor_id)
    }

    async fn append_audit_event(&self, event: AuditEvent) -> AppResult<()> {
        self.audit_repository.append_event(event).await
    }
}
