use super::*;

use tessera_core::AppError;
use tessera_domain::{AuditAction, PermissionGrant};
use tracing::info;
use uuid::Uuid;

use crate::{CreatePermissionGrantInput, PermissionGrantQuery};

impl PermissionAdminService {
    /// Grants a catalogue permission to a user.
    pub async fn grant_permission(
        &self,
        actor: &UserIdentity,
        input: GrantPermissionInput,
    ) -> AppResult<PermissionGrant> {
        let actor_id = self.require_admin(actor).await?;
        let now = Utc::now();

        if let Some(expires_at) = input.expires_at {
            ensure_future_expiry(expires_at, now)?;
        }

        if self
            .user_repository
            .find_user_by_id(input.user_id)
            .await?
            .is_none()
        {
            return Err(AppError::NotFound(format!(
                "user '{}' does not exist",
                input.user_id
            )));
        }

        let definition = self
            .catalog_repository
            .find_permission_definition_by_name(&input.permission)
            .await?
            .filter(|definition| definition.is_active)
            .ok_or_else(|| {
                AppError::NotFound(format!(
                    "permission '{}' is not an active catalogue entry",
                    input.permission
                ))
            })?;

        if self
            .grant_repository
            .find_effective_grant(input.user_id, &input.permission, now)
            .await?
            .is_some()
        {
            return Err(AppError::Conflict(format!(
                "user '{}' already holds permission '{}'",
                input.user_id, input.permission
            )));
        }

        let grant = self
            .grant_repository
            .create_grant(CreatePermissionGrantInput {
                user_id: input.user_id,
                permission_id: definition.permission_id,
                permission: input.permission,
                expires_at: input.expires_at,
                granted_by: actor_id,
            })
            .await?;

        info!(
            grant_id = %grant.grant_id,
            user_id = %grant.user_id,
            permission = %grant.permission,
            "permission granted"
        );

        self.append_audit_event(AuditEvent {
            actor_user_id: actor_id,
            action: AuditAction::SecurityPermissionGranted,
            resource_type: "permission_grant".to_owned(),
            resource_id: grant.grant_id.to_string(),
            detail: Some(format!(
                "granted '{}' to user '{}' ({})",
                grant.permission,
                grant.user_id,
                describe_expiry(grant.expires_at)
            )),
        })
        .await?;

        Ok(grant)
    }

    /// Revokes a grant by marking it inactive.
    ///
    /// Revoking an already inactive grant succeeds without changes.
    pub async fn revoke_grant(&self, actor: &UserIdentity, grant_id: Uuid) -> AppResult<()> {
        let actor_id = self.require_admin(actor).await?;

        let grant = self
            .grant_repository
            .find_grant(grant_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("grant '{grant_id}' does not exist")))?;

        if !grant.is_active {
            return Ok(());
        }

        self.grant_repository.deactivate_grant(grant_id).await?;

        info!(%grant_id, user_id = %grant.user_id, "permission grant revoked");

        self.append_audit_event(AuditEvent {
            actor_user_id: actor_id,
            action: AuditAction::SecurityPermissionRevoked,
            resource_type: "permission_grant".to_owned(),
            resource_id: grant_id.to_string(),
            detail: Some(format!(
                "revoked '{}' from user '{}'",
                grant.permission, grant.user_id
            )),
        })
        .await
    }

    /// Replaces the expiry of an active grant. `None` makes it permanent.
    pub async fn extend_grant_expiry(
        &self,
        actor: &UserIdentity,
        grant_id: Uuid,
        expires_at: Option<DateTime<Utc>>,
    ) -> AppResult<PermissionGrant> {
        let actor_id = self.require_admin(actor).await?;
        let now = Utc::now();

        if let Some(expires_at) = expires_at {
            ensure_future_expiry(expires_at, now)?;
        }

        let existing = self
            .grant_repository
            .find_grant(grant_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("grant '{grant_id}' does not exist")))?;

        if !existing.is_active {
            return Err(AppError::Conflict(format!(
                "grant '{grant_id}' has been revoked"
            )));
        }

        // An expired grant may only come back when no other grant covers the permission.
        if !existing.is_effective_at(now)
            && self
                .grant_repository
                .find_effective_grant(existing.user_id, &existing.permission, now)
                .await?
                .is_some_and(|other| other.grant_id != grant_id)
        {
            return Err(AppError::Conflict(format!(
                "user '{}' already holds permission '{}' through another grant",
                existing.user_id, existing.permission
            )));
        }

        let grant = self
            .grant_repository
            .update_grant_expiry(grant_id, expires_at)
            .await?;

        info!(%grant_id, user_id = %grant.user_id, "permission grant expiry updated");

        self.append_audit_event(AuditEvent {
            actor_user_id: actor_id,
            action: AuditAction::SecurityPermissionExpiryUpdated,
            resource_type: "permission_grant".to_owned(),
            resource_id: grant_id.to_string(),
            detail: Some(format!(
                "changed expiry of '{}' for user '{}' from {} to {}",
                grant.permission,
                grant.user_id,
                describe_expiry(existing.expires_at),
                describe_expiry(grant.expires_at)
            )),
        })
        .await?;

        Ok(grant)
    }

    /// Lists grants, newest first.
    pub async fn list_grants(
        &self,
        actor: &UserIdentity,
        query: PermissionGrantQuery,
    ) -> AppResult<Vec<PermissionGrant>> {
        self.require_admin(actor).await?;

        self.grant_repository
            .list_grants(PermissionGrantQuery {
                limit: query.limit.clamp(1, 200),
                offset: query.offset.min(5_000),
                ..query
            })
            .await
    }
}

fn ensure_future_expiry(expires_at: DateTime<Utc>, now: DateTime<Utc>) -> AppResult<()> {
    if expires_at <= now {
        return Err(AppError::Validation(format!(
            "expires_at '{}' must be in the future",
            expires_at.to_rfc3339()
        )));
    }

    Ok(())
}

fn describe_expiry(expires_at: Option<DateTime<Utc>>) -> String {
    expires_at
        .map(|value| format!("expires {}", value.to_rfc3339()))
        .unwrap_or_else(|| "no expiry".to_owned())
}
