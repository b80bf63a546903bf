use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tessera_application::{
    CreatePermissionDefinitionInput, CreatePermissionGrantInput, PermissionCatalogRepository,
    PermissionGrantQuery, PermissionGrantRepository, UserAccessRepository,
};
use tessera_core::{AppError, AppResult};
use tessera_domain::{PermissionDefinition, PermissionGrant, PermissionName, UserAccount, UserId};
use tokio::sync::RwLock;
use uuid::Uuid;

/// In-memory user, grant and catalogue store.
///
/// Grants keep insertion order, which is the order resolution reports them in.
#[derive(Debug, Default)]
pub struct InMemoryAccessRepository {
    users: RwLock<HashMap<UserId, UserAccount>>,
    grants: RwLock<Vec<PermissionGrant>>,
    definitions: RwLock<Vec<PermissionDefinition>>,
}

impl InMemoryAccessRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces a user account.
    pub async fn save_user(&self, account: UserAccount) {
        self.users.write().await.insert(account.user_id, account);
    }

    /// Appends a raw grant row, bypassing duplicate checks.
    pub async fn insert_grant(&self, grant: PermissionGrant) {
        self.grants.write().await.push(grant);
    }
}

#[async_trait]
impl UserAccessRepository for InMemoryAccessRepository {
    async fn find_user_by_id(&self, user_id: UserId) -> AppResult<Option<UserAccount>> {
        Ok(self.users.read().await.get(&user_id).cloned())
    }
}

#[async_trait]
impl PermissionGrantRepository for InMemoryAccessRepository {
    async fn find_effective_grants_by_user_id(
        &self,
        user_id: UserId,
        as_of: DateTime<Utc>,
    ) -> AppResult<Vec<PermissionGrant>> {
        Ok(self
            .grants
            .read()
            .await
            .iter()
            .filter(|grant| grant.user_id == user_id && grant.is_effective_at(as_of))
            .cloned()
            .collect())
    }

    async fn find_effective_grant(
        &self,
        user_id: UserId,
        permission: &PermissionName,
        as_of: DateTime<Utc>,
    ) -> AppResult<Option<PermissionGrant>> {
        Ok(self
            .grants
            .read()
            .await
            .iter()
            .rev()
            .find(|grant| {
                grant.user_id == user_id
                    && &grant.permission == permission
                    && grant.is_effective_at(as_of)
            })
            .cloned())
    }

    async fn find_grant(&self, grant_id: Uuid) -> AppResult<Option<PermissionGrant>> {
        Ok(self
            .grants
            .read()
            .await
            .iter()
            .find(|grant| grant.grant_id == grant_id)
            .cloned())
    }

    async fn create_grant(&self, input: CreatePermissionGrantInput) -> AppResult<PermissionGrant> {
        if !self.users.read().await.contains_key(&input.user_id) {
            return Err(AppError::NotFound(format!(
                "user '{}' does not exist",
                input.user_id
            )));
        }

        let now = Utc::now();
        let mut grants = self.grants.write().await;

        if grants.iter().any(|grant| {
            grant.user_id == input.user_id
                && grant.permission == input.permission
                && grant.is_effective_at(now)
        }) {
            return Err(AppError::Conflict(format!(
                "user '{}' already holds permission '{}'",
                input.user_id, input.permission
            )));
        }

        let grant = PermissionGrant {
            grant_id: Uuid::new_v4(),
            user_id: input.user_id,
            permission: input.permission,
            is_active: true,
            expires_at: input.expires_at,
            granted_by: Some(input.granted_by),
            granted_at: now,
        };
        grants.push(grant.clone());

        Ok(grant)
    }

    async fn deactivate_grant(&self, grant_id: Uuid) -> AppResult<()> {
        let mut grants = self.grants.write().await;
        let grant = grants
            .iter_mut()
            .find(|grant| grant.grant_id == grant_id)
            .ok_or_else(|| AppError::NotFound(format!("grant '{grant_id}' does not exist")))?;

        grant.is_active = false;
        Ok(())
    }

    async fn update_grant_expiry(
        &self,
        grant_id: Uuid,
        expires_at: Option<DateTime<Utc>>,
    ) -> AppResult<PermissionGrant> {
        let now = Utc::now();
        let mut grants = self.grants.write().await;
        let index = grants
            .iter()
            .position(|grant| grant.grant_id == grant_id)
            .ok_or_else(|| AppError::NotFound(format!("grant '{grant_id}' does not exist")))?;

        let target = &grants[index];
        if !target.is_active {
            return Err(AppError::Conflict(format!(
                "grant '{grant_id}' has been revoked"
            )));
        }
        if grants.iter().any(|other| {
            other.grant_id != grant_id
                && other.user_id == target.user_id
                && other.permission == target.permission
                && other.is_effective_at(now)
        }) {
            return Err(AppError::Conflict(format!(
                "user '{}' already holds permission '{}' through another grant",
                target.user_id, target.permission
            )));
        }

        let grant = &mut grants[index];
        grant.expires_at = expires_at;
        Ok(grant.clone())
    }

    async fn list_grants(&self, query: PermissionGrantQuery) -> AppResult<Vec<PermissionGrant>> {
        let now = Utc::now();
        let grants = self.grants.read().await;

        let mut values: Vec<PermissionGrant> = grants
            .iter()
            .filter(|grant| query.user_id.is_none_or(|user_id| grant.user_id == user_id))
            .filter(|grant| !query.active_only || grant.is_effective_at(now))
            .cloned()
            .collect();
        values.sort_by(|left, right| right.granted_at.cmp(&left.granted_at));

        Ok(values
            .into_iter()
            .skip(query.offset)
            .take(query.limit)
            .collect())
    }
}

#[async_trait]
impl PermissionCatalogRepository for InMemoryAccessRepository {
    async fn list_permission_definitions(&self) -> AppResult<Vec<PermissionDefinition>> {
        let mut values = self.definitions.read().await.clone();
        values.sort_by(|left, right| {
            left.category
                .as_str()
                .cmp(right.category.as_str())
                .then_with(|| left.name.as_str().cmp(right.name.as_str()))
        });

        Ok(values)
    }

    async fn find_permission_definition_by_name(
        &self,
        name: &PermissionName,
    ) -> AppResult<Option<PermissionDefinition>> {
        Ok(self
            .definitions
            .read()
            .await
            .iter()
            .find(|definition| &definition.name == name)
            .cloned())
    }

    async fn create_permission_definition(
        &self,
        input: CreatePermissionDefinitionInput,
    ) -> AppResult<PermissionDefinition> {
        let mut definitions = self.definitions.write().await;

        if definitions
            .iter()
            .any(|definition| definition.name == input.name)
        {
            return Err(AppError::Conflict(format!(
                "permission '{}' already exists",
                input.name
            )));
        }

        let definition = PermissionDefinition {
            permission_id: Uuid::new_v4(),
            name: input.name,
            description: input.description,
            category: input.category,
            is_active: true,
            created_at: Utc::now(),
        };
        definitions.push(definition.clone());

        Ok(definition)
    }
}
