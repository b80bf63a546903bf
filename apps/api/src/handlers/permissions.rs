use axum::Json;
use axum::extract::{Extension, State};
use axum::http::StatusCode;
use tessera_application::CreatePermissionDefinitionInput;
use tessera_core::UserIdentity;

use crate::dto::{CreatePermissionDefinitionRequest, PermissionDefinitionResponse};
use crate::error::ApiResult;
use crate::state::AppState;

pub async fn list_permission_definitions_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
) -> ApiResult<Json<Vec<PermissionDefinitionResponse>>> {
    let definitions = state
        .permission_admin_service
        .list_permission_definitions(&user)
        .await?
        .into_iter()
        .map(PermissionDefinitionResponse::from)
        .collect();

    Ok(Json(definitions))
}

pub async fn create_permission_definition_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Json(payload): Json<CreatePermissionDefinitionRequest>,
) -> ApiResult<(StatusCode, Json<PermissionDefinitionResponse>)> {
    let definition = state
        .permission_admin_service
        .create_permission_definition(&user, CreatePermissionDefinitionInput::try_from(payload)?)
        .await?;

    Ok((StatusCode::CREATED, Json(definition.into())))
}
