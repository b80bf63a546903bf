use serde::{Deserialize, Serialize};
use tessera_core::UserIdentity;
use ts_rs::TS;

use super::AccessDecisionResponse;

/// Incoming payload for token bootstrap login.
#[derive(Debug, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/bootstrap-request.ts"
)]
pub struct BootstrapRequest {
    pub user_id: String,
    pub token: String,
}

/// Session identity with the caller's current access decision.
#[derive(Debug, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/user-identity-response.ts"
)]
pub struct UserIdentityResponse {
    pub user_id: String,
    pub display_name: String,
    pub email: Option<String>,
    pub access: AccessDecisionResponse,
}

impl UserIdentityResponse {
    pub fn from_identity_with_access(
        identity: UserIdentity,
        access: AccessDecisionResponse,
    ) -> Self {
        Self {
            user_id: identity.user_id().to_string(),
            display_name: identity.display_name().to_owned(),
            email: identity.email().map(ToOwned::to_owned),
            access,
        }
    }
}
