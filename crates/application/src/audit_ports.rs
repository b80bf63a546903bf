use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tessera_core::AppResult;
use tessera_domain::{AuditAction, UserId};
use uuid::Uuid;

/// Immutable audit event payload emitted by application services.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditEvent {
    /// User that performed the action.
    pub actor_user_id: UserId,
    /// Stable audit action identifier.
    pub action: AuditAction,
    /// Resource type label.
    pub resource_type: String,
    /// Resource identifier.
    pub resource_id: String,
    /// Optional audit detail payload.
    pub detail: Option<String>,
}

/// Port for persisting append-only audit events.
#[async_trait]
pub trait AuditRepository: Send + Sync {
    /// Persists one audit event.
    async fn append_event(&self, event: AuditEvent) -> AppResult<()>;
}

/// Stored audit entry as read back for administrative views.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditLogEntry {
    /// Stable entry identifier.
    pub entry_id: Uuid,
    /// User that performed the action.
    pub actor_user_id: UserId,
    /// Stored action identifier.
    pub action: String,
    /// Resource type label.
    pub resource_type: String,
    /// Resource identifier.
    pub resource_id: String,
    /// Optional audit detail payload.
    pub detail: Option<String>,
    /// Time the entry was recorded.
    pub created_at: DateTime<Utc>,
}

/// Query parameters for audit log listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditLogQuery {
    /// Maximum rows returned.
    pub limit: usize,
    /// Number of rows skipped for offset pagination.
    pub offset: usize,
    /// Optional exact action filter.
    pub action: Option<String>,
    /// Optional actor filter.
    pub actor_user_id: Option<UserId>,
    /// Optional exact resource type filter.
    pub resource_type: Option<String>,
}

/// Read port over recorded audit entries.
#[async_trait]
pub trait AuditLogRepository: Send + Sync {
    /// Lists entries matching the query, newest first.
    async fn list_recent_entries(&self, query: AuditLogQuery) -> AppResult<Vec<AuditLogEntry>>;
}
