use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tessera_core::{AppResult, NonEmptyString};
use tessera_domain::{PermissionDefinition, PermissionGrant, PermissionName, UserAccount, UserId};
use uuid::Uuid;

/// Read port over user accounts.
#[async_trait]
pub trait UserAccessRepository: Send + Sync {
    /// Finds one account by id, active or not.
    async fn find_user_by_id(&self, user_id: UserId) -> AppResult<Option<UserAccount>>;
}

/// Input payload for persisting a new grant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatePermissionGrantInput {
    /// Grantee.
    pub user_id: UserId,
    /// Catalogue entry backing the grant.
    pub permission_id: Uuid,
    /// Granted permission name.
    pub permission: PermissionName,
    /// Optional expiry instant.
    pub expires_at: Option<DateTime<Utc>>,
    /// Administrator creating the grant.
    pub granted_by: UserId,
}

/// Query parameters for grant listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PermissionGrantQuery {
    /// Optional grantee filter.
    pub user_id: Option<UserId>,
    /// Whether to return only grants effective now.
    pub active_only: bool,
    /// Maximum rows returned.
    pub limit: usize,
    /// Number of rows skipped for pagination.
    pub offset: usize,
}

/// Port over per-user permission grants.
#[async_trait]
pub trait PermissionGrantRepository: Send + Sync {
    /// Lists grants of a user that are effective at `as_of`, in storage order.
    ///
    /// Implementations may return extra rows; callers filter again.
    async fn find_effective_grants_by_user_id(
        &self,
        user_id: UserId,
        as_of: DateTime<Utc>,
    ) -> AppResult<Vec<PermissionGrant>>;

    /// Finds the grant of `permission` to `user_id` effective at `as_of`, if any.
    async fn find_effective_grant(
        &self,
        user_id: UserId,
        permission: &PermissionName,
        as_of: DateTime<Utc>,
    ) -> AppResult<Option<PermissionGrant>>;

    /// Finds one grant by id.
    async fn find_grant(&self, grant_id: Uuid) -> AppResult<Option<PermissionGrant>>;

    /// Persists a new active grant.
    async fn create_grant(&self, input: CreatePermissionGrantInput) -> AppResult<PermissionGrant>;

    /// Marks a grant inactive. Fails with not found when the grant does not exist.
    async fn deactivate_grant(&self, grant_id: Uuid) -> AppResult<()>;

    /// Replaces the expiry of a grant and returns the updated row.
    async fn update_grant_expiry(
        &self,
        grant_id: Uuid,
        expires_at: Option<DateTime<Utc>>,
    ) -> AppResult<PermissionGrant>;

    /// Lists grants, newest first.
    async fn list_grants(&self, query: PermissionGrantQuery) -> AppResult<Vec<PermissionGrant>>;
}

/// Input payload for catalogue entry creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatePermissionDefinitionInput {
    /// Unique permission name.
    pub name: PermissionName,
    /// Optional description.
    pub description: Option<String>,
    /// Grouping label.
    pub category: NonEmptyString,
}

/// Port over the permission catalogue.
#[async_trait]
pub trait PermissionCatalogRepository: Send + Sync {
    /// Lists catalogue entries ordered by category and name.
    async fn list_permission_definitions(&self) -> AppResult<Vec<PermissionDefinition>>;

    /// Finds a catalogue entry by name.
    async fn find_permission_definition_by_name(
        &self,
        name: &PermissionName,
    ) -> AppResult<Option<PermissionDefinition>>;

    /// Creates a catalogue entry. Duplicate names are a conflict.
    async fn create_permission_definition(
        &self,
        input: CreatePermissionDefinitionInput,
    ) -> AppResult<PermissionDefinition>;
}
