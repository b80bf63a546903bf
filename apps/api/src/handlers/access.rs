use axum::Json;
use axum::extract::{Extension, State};
use tessera_core::UserIdentity;
use tessera_domain::UserId;

use crate::dto::AccessDecisionResponse;
use crate::error::ApiResult;
use crate::state::AppState;

/// Resolves the session caller's access decision.
///
/// Never admin-gated: a caller without admin access receives a decision with
/// `canAccessAdmin = false` rather than an error.
pub async fn check_access_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
) -> ApiResult<Json<AccessDecisionResponse>> {
    let decision = state
        .access_resolver
        .resolve_access_until_cancelled(
            UserId::from_uuid(user.user_id()),
            &state.shutdown.child_token(),
        )
        .await?;

    Ok(Json(decision.into()))
}
