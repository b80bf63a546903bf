use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use tessera_core::{AppError, UserIdentity};
use tower_sessions::Session;
use tracing::info;

use crate::dto::{BootstrapRequest, parse_user_id};
use crate::error::ApiResult;
use crate::state::AppState;

use super::{SESSION_CREATED_AT_KEY, SESSION_USER_KEY};

pub async fn bootstrap_handler(
    State(state): State<AppState>,
    session: Session,
    Json(payload): Json<BootstrapRequest>,
) -> ApiResult<StatusCode> {
    if payload.token != state.bootstrap_token {
        return Err(AppError::Unauthorized("invalid bootstrap token".to_owned()).into());
    }

    let user_id = parse_user_id(&payload.user_id)?;
    let account = state
        .user_repository
        .find_user_by_id(user_id)
        .await?
        .filter(|account| account.is_active())
        .ok_or_else(|| AppError::Unauthorized("unknown or inactive user".to_owned()))?;

    let identity = UserIdentity::new(
        account.user_id.as_uuid(),
        account.display_name,
        account.email,
    );

    session
        .cycle_id()
        .await
        .map_err(|error| AppError::Internal(format!("failed to cycle session id: {error}")))?;

    session
        .insert(SESSION_USER_KEY, &identity)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to persist session identity: {error}"))
        })?;

    session
        .insert(SESSION_CREATED_AT_KEY, chrono::Utc::now().timestamp())
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to persist session creation time: {error}"))
        })?;

    info!(%user_id, "bootstrap session established");

    Ok(StatusCode::NO_CONTENT)
}
