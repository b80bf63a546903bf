use serde::Serialize;
use ts_rs::TS;

mod access;
mod audit;
mod auth;
mod conversions;
mod permissions;

pub use access::AccessDecisionResponse;
pub use audit::{AuditLogEntryResponse, ListAuditLogQuery};
pub use auth::{BootstrapRequest, UserIdentityResponse};
pub use conversions::{parse_grant_id, parse_user_id};
pub use permissions::{
    CreatePermissionDefinitionRequest, GrantPermissionRequest, ListPermissionGrantsQuery,
    PermissionDefinitionResponse, PermissionGrantResponse, UpdateGrantExpiryRequest,
};

/// Health response payload.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/health-response.ts"
)]
pub struct HealthResponse {
    pub status: &'static str,
}
