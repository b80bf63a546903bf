use super::*;

use crate::{AuditLogEntry, AuditLogQuery};

impl PermissionAdminService {
    /// Lists recorded audit entries, newest first.
    pub async fn list_audit_entries(
        &self,
        actor: &UserIdentity,
        query: AuditLogQuery,
    ) -> AppResult<Vec<AuditLogEntry>> {
        self.require_admin(actor).await?;

        self.audit_log_repository
            .list_recent_entries(AuditLogQuery {
                limit: query.limit.clamp(1, 200),
                offset: query.offset.min(5_000),
                ..query
            })
            .await
    }
}
