use super::*;

use tessera_core::AppError;
use tessera_domain::{AuditAction, PermissionDefinition};
use tracing::info;

use crate::CreatePermissionDefinitionInput;

impl PermissionAdminService {
    /// Lists the permission catalogue.
    pub async fn list_permission_definitions(
        &self,
        actor: &UserIdentity,
    ) -> AppResult<Vec<PermissionDefinition>> {
        self.require_admin(actor).await?;

        self.catalog_repository.list_permission_definitions().await
    }

    /// Adds a grantable permission to the catalogue.
    pub async fn create_permission_definition(
        &self,
        actor: &UserIdentity,
        input: CreatePermissionDefinitionInput,
    ) -> AppResult<PermissionDefinition> {
        let actor_id = self.require_admin(actor).await?;

        if self
            .catalog_repository
            .find_permission_definition_by_name(&input.name)
            .await?
            .is_some()
        {
            return Err(AppError::Conflict(format!(
                "permission '{}' already exists",
                input.name
            )));
        }

        let definition = self
            .catalog_repository
            .create_permission_definition(input)
            .await?;

        info!(
            permission = %definition.name,
            actor = %actor_id,
            "permission definition created"
        );

        self.append_audit_event(AuditEvent {
            actor_user_id: actor_id,
            action: AuditAction::SecurityPermissionCreated,
            resource_type: "permission_definition".to_owned(),
            resource_id: definition.permission_id.to_string(),
            detail: Some(format!(
                "created permission '{}' in category '{}'",
                definition.name,
                definition.category.as_str()
            )),
        })
        .await?;

        Ok(definition)
    }
}
