use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use tessera_application::{
    CreatePermissionGrantInput, PermissionGrantQuery, PermissionGrantRepository,
};
use tessera_core::{AppError, AppResult};
use tessera_domain::{PermissionGrant, PermissionName, UserId};

use crate::store_error::store_error;

#[cfg(test)]
mod tests;

/// PostgreSQL-backed repository for per-user permission grants.
#[derive(Clone)]
pub struct PostgresPermissionGrantRepository {
    pool: PgPool,
}

impl PostgresPermissionGrantRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const GRANT_COLUMNS: &str = r#"
    grants.id AS grant_id,
    grants.user_id,
    definitions.name AS permission,
    grants.is_active,
    grants.expires_at,
    grants.granted_by,
    grants.granted_at
"#;

#[derive(Debug, FromRow)]
struct PermissionGrantRow {
    grant_id: Uuid,
    user_id: Uuid,
    permission: String,
    is_active: bool,
    expires_at: Option<DateTime<Utc>>,
    granted_by: Option<Uuid>,
    granted_at: DateTime<Utc>,
}

impl TryFrom<PermissionGrantRow> for PermissionGrant {
    type Error = AppError;

    fn try_from(row: PermissionGrantRow) -> Result<Self, Self::Error> {
        let permission = PermissionName::new(row.permission.as_str()).map_err(|error| {
            AppError::Internal(format!(
                "failed to decode permission '{}' of grant '{}': {error}",
                row.permission, row.grant_id
            ))
        })?;

        Ok(Self {
            grant_id: row.grant_id,
            user_id: UserId::from_uuid(row.user_id),
            permission,
            is_active: row.is_active,
            expires_at: row.expires_at,
            granted_by: row.granted_by.map(UserId::from_uuid),
            granted_at: row.granted_at,
        })
    }
}

fn decode_rows(rows: Vec<PermissionGrantRow>) -> AppResult<Vec<PermissionGrant>> {
    rows.into_iter().map(PermissionGrant::try_from).collect()
}

#[async_trait]
impl PermissionGrantRepository for PostgresPermissionGrantRepository {
    async fn find_effective_grants_by_user_id(
        &self,
        user_id: UserId,
        as_of: DateTime<Utc>,
    ) -> AppResult<Vec<PermissionGrant>> {
        let rows = sqlx::query_as::<_, PermissionGrantRow>(&format!(
            r#"
            SELECT {GRANT_COLUMNS}
            FROM user_permission_grants AS grants
            INNER JOIN permission_definitions AS definitions
                ON definitions.id = grants.permission_id
            WHERE grants.user_id = $1
              AND grants.is_active
              AND (grants.expires_at IS NULL OR grants.expires_at > $2)
            ORDER BY grants.granted_at, grants.id
            "#
        ))
        .bind(user_id.as_uuid())
        .bind(as_of)
        .fetch_all(&self.pool)
        .await
        .map_err(|error| {
            store_error(
                &format!("failed to load permission grants for user '{user_id}'"),
                error,
            )
        })?;

        decode_rows(rows)
    }

    async fn find_effective_grant(
        &self,
        user_id: UserId,
        permission: &PermissionName,
        as_of: DateTime<Utc>,
    ) -> AppResult<Option<PermissionGrant>> {
        let row = sqlx::query_as::<_, PermissionGrantRow>(&format!(
            r#"
            SELECT {GRANT_COLUMNS}
            FROM user_permission_grants AS grants
            INNER JOIN permission_definitions AS definitions
                ON definitions.id = grants.permission_id
            WHERE grants.user_id = $1
              AND definitions.name = $2
              AND grants.is_active
              AND (grants.expires_at IS NULL OR grants.expires_at > $3)
            ORDER BY grants.granted_at DESC
            LIMIT 1
            "#
        ))
        .bind(user_id.as_uuid())
        .bind(permission.as_str())
        .bind(as_of)
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| store_error("failed to look up effective grant", error))?;

        row.map(PermissionGrant::try_from).transpose()
    }

    async fn find_grant(&self, grant_id: Uuid) -> AppResult<Option<PermissionGrant>> {
        let row = sqlx::query_as::<_, PermissionGrantRow>(&format!(
            r#"
            SELECT {GRANT_COLUMNS}
            FROM user_permission_grants AS grants
            INNER JOIN permission_definitions AS definitions
                ON definitions.id = grants.permission_id
            WHERE grants.id = $1
            "#
        ))
        .bind(grant_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| store_error(&format!("failed to load grant '{grant_id}'"), error))?;

        row.map(PermissionGrant::try_from).transpose()
    }

    async fn create_grant(&self, input: CreatePermissionGrantInput) -> AppResult<PermissionGrant> {
        let mut transaction = self
            .pool
            .begin()
            .await
            .map_err(|error| store_error("failed to begin transaction", error))?;

        // Serializes concurrent grants to the same user.
        let locked = sqlx::query("SELECT id FROM users WHERE id = $1 FOR UPDATE")
            .bind(input.user_id.as_uuid())
            .fetch_optional(&mut *transaction)
            .await
            .map_err(|error| store_error("failed to lock grantee", error))?;
        if locked.is_none() {
            return Err(AppError::NotFound(format!(
                "user '{}' does not exist",
                input.user_id
            )));
        }

        let duplicate = sqlx::query(
            r#"
            SELECT id
            FROM user_permission_grants
            WHERE user_id = $1
              AND permission_id = $2
              AND is_active
              AND (expires_at IS NULL OR expires_at > now())
            "#,
        )
        .bind(input.user_id.as_uuid())
        .bind(input.permission_id)
        .fetch_optional(&mut *transaction)
        .await
        .map_err(|error| store_error("failed to check existing grants", error))?;
        if duplicate.is_some() {
            return Err(AppError::Conflict(format!(
                "user '{}' already holds permission '{}'",
                input.user_id, input.permission
            )));
        }

        let row = sqlx::query_as::<_, PermissionGrantRow>(
            r#"
            INSERT INTO user_permission_grants (user_id, permission_id, expires_at, granted_by)
            VALUES ($1, $2, $3, $4)
            RETURNING
                id AS grant_id,
                user_id,
                $5::TEXT AS permission,
                is_active,
                expires_at,
                granted_by,
                granted_at
            "#,
        )
        .bind(input.user_id.as_uuid())
        .bind(input.permission_id)
        .bind(input.expires_at)
        .bind(input.granted_by.as_uuid())
        .bind(input.permission.as_str())
        .fetch_one(&mut *transaction)
        .await
        .map_err(|error| store_error("failed to create permission grant", error))?;

        transaction
            .commit()
            .await
            .map_err(|error| store_error("failed to commit transaction", error))?;

        PermissionGrant::try_from(row)
    }

    async fn deactivate_grant(&self, grant_id: Uuid) -> AppResult<()> {
        let rows_affected = sqlx::query(
            r#"
            UPDATE user_permission_grants
            SET is_active = false,
                revoked_at = COALESCE(revoked_at, now())
            WHERE id = $1
            "#,
        )
        .bind(grant_id)
        .execute(&self.pool)
        .await
        .map_err(|error| store_error("failed to revoke permission grant", error))?
        .rows_affected();

        if rows_affected == 0 {
            return Err(AppError::NotFound(format!(
                "grant '{grant_id}' does not exist"
            )));
        }

        Ok(())
    }

    async fn update_grant_expiry(
        &self,
        grant_id: Uuid,
        expires_at: Option<DateTime<Utc>>,
    ) -> AppResult<PermissionGrant> {
        let mut transaction = self
            .pool
            .begin()
            .await
            .map_err(|error| store_error("failed to begin transaction", error))?;

        let (user_id, permission_id, is_active) = sqlx::query_as::<_, (Uuid, Uuid, bool)>(
            r#"
            SELECT user_id, permission_id, is_active
            FROM user_permission_grants
            WHERE id = $1
            FOR UPDATE
            "#,
        )
        .bind(grant_id)
        .fetch_optional(&mut *transaction)
        .await
        .map_err(|error| store_error(&format!("failed to lock grant '{grant_id}'"), error))?
        .ok_or_else(|| AppError::NotFound(format!("grant '{grant_id}' does not exist")))?;

        if !is_active {
            return Err(AppError::Conflict(format!(
                "grant '{grant_id}' has been revoked"
            )));
        }

        // Same lock as create_grant, so a concurrent grant cannot slip in.
        sqlx::query("SELECT id FROM users WHERE id = $1 FOR UPDATE")
            .bind(user_id)
            .fetch_optional(&mut *transaction)
            .await
            .map_err(|error| store_error("failed to lock grantee", error))?;

        let other_effective = sqlx::query(
            r#"
            SELECT id
            FROM user_permission_grants
            WHERE user_id = $1
              AND permission_id = $2
              AND id <> $3
              AND is_active
              AND (expires_at IS NULL OR expires_at > now())
            LIMIT 1
            "#,
        )
        .bind(user_id)
        .bind(permission_id)
        .bind(grant_id)
        .fetch_optional(&mut *transaction)
        .await
        .map_err(|error| store_error("failed to check existing grants", error))?;
        if other_effective.is_some() {
            return Err(AppError::Conflict(format!(
                "user '{user_id}' already holds the permission of grant '{grant_id}' through another grant"
            )));
        }

        let row = sqlx::query_as::<_, PermissionGrantRow>(
            r#"
            UPDATE user_permission_grants AS grants
            SET expires_at = $2
            FROM permission_definitions AS definitions
            WHERE grants.id = $1
              AND grants.is_active
              AND definitions.id = grants.permission_id
            RETURNING
                grants.id AS grant_id,
                grants.user_id,
                definitions.name AS permission,
                grants.is_active,
                grants.expires_at,
                grants.granted_by,
                grants.granted_at
            "#,
        )
        .bind(grant_id)
        .bind(expires_at)
        .fetch_optional(&mut *transaction)
        .await
        .map_err(|error| store_error("failed to update grant expiry", error))?
        .ok_or_else(|| AppError::NotFound(format!("grant '{grant_id}' does not exist")))?;

        transaction
            .commit()
            .await
            .map_err(|error| store_error("failed to commit transaction", error))?;

        PermissionGrant::try_from(row)
    }

    async fn list_grants(&self, query: PermissionGrantQuery) -> AppResult<Vec<PermissionGrant>> {
        let limit = i64::try_from(query.limit).unwrap_or(i64::MAX);
        let offset = i64::try_from(query.offset).unwrap_or(i64::MAX);

        let rows = sqlx::query_as::<_, PermissionGrantRow>(&format!(
            r#"
            SELECT {GRANT_COLUMNS}
            FROM user_permission_grants AS grants
            INNER JOIN permission_definitions AS definitions
                ON definitions.id = grants.permission_id
            WHERE ($1::UUID IS NULL OR grants.user_id = $1)
              AND (
                  $2::BOOLEAN = false
                  OR (grants.is_active AND (grants.expires_at IS NULL OR grants.expires_at > now()))
              )
            ORDER BY grants.granted_at DESC, grants.id
            LIMIT $3
            OFFSET $4
            "#
        ))
        .bind(query.user_id.map(|user_id| user_id.as_uuid()))
        .bind(query.active_only)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
        .map_err(|error| store_error("failed to list permission grants", error))?;

        decode_rows(rows)
    }
}
