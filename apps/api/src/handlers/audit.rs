use axum::Json;
use axum::extract::{Extension, Query, State};
use tessera_application::AuditLogQuery;
use tessera_core::UserIdentity;

use crate::dto::{AuditLogEntryResponse, ListAuditLogQuery};
use crate::error::ApiResult;
use crate::state::AppState;

pub async fn list_audit_log_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Query(query): Query<ListAuditLogQuery>,
) -> ApiResult<Json<Vec<AuditLogEntryResponse>>> {
    let entries = state
        .permission_admin_service
        .list_audit_entries(&user, AuditLogQuery::try_from(query)?)
        .await?
        .into_iter()
        .map(AuditLogEntryResponse::from)
        .collect();

    Ok(Json(entries))
}
