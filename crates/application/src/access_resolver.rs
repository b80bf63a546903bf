use std::sync::Arc;

use chrono::Utc;
use tessera_core::{AppError, AppResult};
use tessera_domain::{AccessDecision, PermissionName, UserId};
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::{PermissionGrantRepository, UserAccessRepository};


/// Resolves admin-area entry and effective permissions for one user.
///
/// Holds no state besides its ports: every call reads the stores again and
/// evaluates grant expiry against the instant of the call.
#[derive(Clone)]
pub struct AccessResolver {
    user_repository: Arc<dyn UserAccessRepository>,
    grant_repository: Arc<dyn PermissionGrantRepository>,
}

impl AccessResolver {
    /// Creates a resolver over the user and grant stores.
    #[must_use]
    pub fn new(
        user_repository: Arc<dyn UserAccessRepository>,
        grant_repository: Arc<dyn PermissionGrantRepository>,
    ) -> Self {
        Self {
            user_repository,
            grant_repository,
        }
    }

    /// Computes the access decision for `user_id`.
    ///
    /// Missing and inactive accounts yield [`AccessDecision::denied`], not an
    /// error. Store failures propagate unchanged.
    pub async fn resolve_access(&self, user_id: UserId) -> AppResult<AccessDecision> {
        let Some(user) = self.user_repository.find_user_by_id(user_id).await? else {
            debug!(%user_id, "access denied for unknown user");
            return Ok(AccessDecision::denied());
        };

        if !user.is_active() {
            debug!(%user_id, "access denied for inactive user");
            return Ok(AccessDecision::denied());
        }

        // Grants are never read for superadmins.
        if user.is_super_admin {
            return Ok(AccessDecision::super_admin(&user));
        }

        let as_of = Utc::now();
        let permissions = self
            .grant_repository
            .find_effective_grants_by_user_id(user_id, as_of)
            .await?
            .into_iter()
            .filter(|grant| grant.is_effective_at(as_of))
            .map(|grant| grant.permission)
            .collect();

        Ok(AccessDecision::from_permissions(&user, permissions))
    }

    /// Computes the access decision unless `cancellation` fires first.
    ///
    /// On cancellation the pending store calls are dropped and
    /// [`AppError::Canceled`] is returned.
    pub async fn resolve_access_until_cancelled(
        &self,
        user_id: UserId,
        cancellation: &CancellationToken,
    ) -> AppResult<AccessDecision> {
        tokio::select! {
            biased;
            () = cancellation.cancelled() => Err(AppError::Canceled(format!(
                "access resolution for user '{user_id}' was canceled"
            ))),
            decision = self.resolve_access(user_id) => decision,
        }
    }

    /// Returns the decision when it opens the admin area, otherwise forbidden.
    pub async fn require_admin_access(&self, user_id: UserId) -> AppResult<AccessDecision> {
        let decision = self.resolve_access(user_id).await?;

        if !decision.can_access_admin {
            return Err(AppError::Forbidden(format!(
                "user '{user_id}' cannot access the administrative area"
            )));
        }

        Ok(decision)
    }

    /// Returns the decision when it allows `permission`, otherwise forbidden.
    pub async fn require_permission(
        &self,
        user_id: UserId,
        permission: &PermissionName,
    ) -> AppResult<AccessDecision> {
        let decision = self.resolve_access(user_id).await?;

        if !decision.allows(permission) {
            return Err(AppError::Forbidden(format!(
                "user '{user_id}' is missing permission '{permission}'"
            )));
        }

        Ok(decision)
    }
}
