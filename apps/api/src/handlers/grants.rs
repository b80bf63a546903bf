use axum::Json;
use axum::extract::{Extension, Path, Query, State};
use axum::http::StatusCode;
use tessera_application::{GrantPermissionInput, PermissionGrantQuery};
use tessera_core::UserIdentity;

use crate::dto::{
    GrantPermissionRequest, ListPermissionGrantsQuery, PermissionGrantResponse,
    UpdateGrantExpiryRequest, parse_grant_id,
};
use crate::error::ApiResult;
use crate::state::AppState;

pub async fn list_grants_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Query(query): Query<ListPermissionGrantsQuery>,
) -> ApiResult<Json<Vec<PermissionGrantResponse>>> {
    let grants = state
        .permission_admin_service
        .list_grants(&user, PermissionGrantQuery::try_from(query)?)
        .await?
        .into_iter()
        .map(PermissionGrantResponse::from)
        .collect();

    Ok(Json(grants))
}

pub async fn grant_permission_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Json(payload): Json<GrantPermissionRequest>,
) -> ApiResult<(StatusCode, Json<PermissionGrantResponse>)> {
    let grant = state
        .permission_admin_service
        .grant_permission(&user, GrantPermissionInput::try_from(payload)?)
        .await?;

    Ok((StatusCode::CREATED, Json(grant.into())))
}

pub async fn revoke_grant_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path(grant_id): Path<String>,
) -> ApiResult<StatusCode> {
    state
        .permission_admin_service
        .revoke_grant(&user, parse_grant_id(&grant_id)?)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

pub async fn update_grant_expiry_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path(grant_id): Path<String>,
    Json(payload): Json<UpdateGrantExpiryRequest>,
) -> ApiResult<Json<PermissionGrantResponse>> {
    let grant = state
        .permission_admin_service
        .extend_grant_expiry(&user, parse_grant_id(&grant_id)?, payload.expires_at()?)
        .await?;

    Ok(Json(grant.into()))
}
