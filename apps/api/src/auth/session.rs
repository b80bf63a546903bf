use axum::Json;
use axum::extract::{Extension, State};
use axum::http::StatusCode;
use tessera_core::{AppError, UserIdentity};
use tessera_domain::UserId;
use tower_sessions::Session;
use tracing::info;

use crate::dto::UserIdentityResponse;
use crate::error::ApiResult;
use crate::state::AppState;

use super::SESSION_USER_KEY;

pub async fn logout_handler(session: Session) -> ApiResult<StatusCode> {
    let user_id = session
        .get::<UserIdentity>(SESSION_USER_KEY)
        .await
        .map_err(|error| AppError::Internal(format!("failed to read session identity: {error}")))?
        .map(|identity| identity.user_id());

    session
        .delete()
        .await
        .map_err(|error| AppError::Internal(format!("failed to delete session: {error}")))?;

    if let Some(user_id) = user_id {
        info!(%user_id, "session ended");
    }

    Ok(StatusCode::NO_CONTENT)
}

pub async fn me_handler(
    State(state): State<AppState>,
    Extension(identity): Extension<UserIdentity>,
) -> ApiResult<Json<UserIdentityResponse>> {
    let decision = state
        .access_resolver
        .resolve_access_until_cancelled(
            UserId::from_uuid(identity.user_id()),
            &state.shutdown.child_token(),
        )
        .await?;

    Ok(Json(UserIdentityResponse::from_identity_with_access(
        identity,
        decision.into(),
    )))
}
