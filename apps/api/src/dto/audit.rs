use serde::{Deserialize, Serialize};
use tessera_application::AuditLogEntry;
use ts_rs::TS;

/// API representation of one recorded audit entry.
#[derive(Debug, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/audit-log-entry-response.ts"
)]
pub struct AuditLogEntryResponse {
    pub entry_id: String,
    pub actor_user_id: String,
    pub action: String,
    pub resource_type: String,
    pub resource_id: String,
    pub detail: Option<String>,
    pub created_at: String,
}

/// Query parameters for audit log listing.
#[derive(Debug, Default, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/list-audit-log-query.ts"
)]
pub struct ListAuditLogQuery {
    pub action: Option<String>,
    pub actor_user_id: Option<String>,
    pub resource_type: Option<String>,
    pub limit: Option<u32>,
    pub offset: Option<u32>,
}

impl From<AuditLogEntry> for AuditLogEntryResponse {
    fn from(value: AuditLogEntry) -> Self {
        Self {
            entry_id: value.entry_id.to_string(),
            actor_user_id: value.actor_user_id.to_string(),
            action: value.action,
            resource_type: value.resource_type,
            resource_id: value.resource_id,
            detail: value.detail,
            created_at: value.created_at.to_rfc3339(),
        }
    }
}
