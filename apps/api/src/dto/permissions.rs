use serde::{Deserialize, Serialize};
use tessera_domain::{PermissionDefinition, PermissionGrant};
use ts_rs::TS;

/// API representation of a catalogue entry.
#[derive(Debug, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/permission-definition-response.ts"
)]
pub struct PermissionDefinitionResponse {
    pub permission_id: String,
    pub name: String,
    pub description: Option<String>,
    pub category: String,
    pub is_active: bool,
    pub created_at: String,
}

/// Incoming payload for catalogue entry creation.
#[derive(Debug, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/create-permission-definition-request.ts"
)]
pub struct CreatePermissionDefinitionRequest {
    pub name: String,
    pub description: Option<String>,
    pub category: String,
}

/// API representation of a user permission grant.
#[derive(Debug, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/permission-grant-response.ts"
)]
pub struct PermissionGrantResponse {
    pub grant_id: String,
    pub user_id: String,
    pub permission: String,
    pub is_active: bool,
    pub expires_at: Option<String>,
    pub granted_by: Option<String>,
    pub granted_at: String,
}

/// Incoming payload for granting a permission.
#[derive(Debug, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/grant-permission-request.ts"
)]
pub struct GrantPermissionRequest {
    pub user_id: String,
    pub permission: String,
    /// RFC 3339 timestamp; omitted means the grant never expires.
    pub expires_at: Option<String>,
}

/// Incoming payload for changing a grant's expiry.
#[derive(Debug, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/update-grant-expiry-request.ts"
)]
pub struct UpdateGrantExpiryRequest {
    pub expires_at: Option<String>,
}

/// Query parameters for grant listing.
#[derive(Debug, Default, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/list-permission-grants-query.ts"
)]
pub struct ListPermissionGrantsQuery {
    pub user_id: Option<String>,
    pub active_only: Option<bool>,
    pub limit: Option<u32>,
    pub offset: Option<u32>,
}

impl From<PermissionDefinition> for PermissionDefinitionResponse {
    fn from(value: PermissionDefinition) -> Self {
        Self {
            permission_id: value.permission_id.to_string(),
            name: value.name.as_str().to_owned(),
            description: value.description,
            category: value.category.as_str().to_owned(),
            is_active: value.is_active,
            created_at: value.created_at.to_rfc3339(),
        }
    }
}

impl From<PermissionGrant> for PermissionGrantResponse {
    fn from(value: PermissionGrant) -> Self {
        Self {
            grant_id: value.grant_id.to_string(),
            user_id: value.user_id.to_string(),
            permission: value.permission.as_str().to_owned(),
            is_active: value.is_active,
            expires_at: value.expires_at.map(|expires_at| expires_at.to_rfc3339()),
            granted_by: value.granted_by.map(|granted_by| granted_by.to_string()),
            granted_at: value.granted_at.to_rfc3339(),
        }
    }
}
