use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use tessera_application::{CreatePermissionDefinitionInput, PermissionCatalogRepository};
use tessera_core::{AppError, AppResult, NonEmptyString};
use tessera_domain::{PermissionDefinition, PermissionName};

use crate::store_error::store_error;

/// PostgreSQL-backed permission catalogue.
#[derive(Clone)]
pub struct PostgresPermissionCatalogRepository {
    pool: PgPool,
}

impl PostgresPermissionCatalogRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct PermissionDefinitionRow {
    id: Uuid,
    name: String,
    description: Option<String>,
    category: String,
    is_active: bool,
    created_at: DateTime<Utc>,
}

impl TryFrom<PermissionDefinitionRow> for PermissionDefinition {
    type Error = AppError;

    fn try_from(row: PermissionDefinitionRow) -> Result<Self, Self::Error> {
        let decode_error = |error: AppError| {
            AppError::Internal(format!(
                "failed to decode permission definition '{}': {error}",
                row.id
            ))
        };

        Ok(Self {
            permission_id: row.id,
            name: PermissionName::new(row.name.as_str()).map_err(decode_error)?,
            description: row.description,
            category: NonEmptyString::new(row.category.as_str()).map_err(decode_error)?,
            is_active: row.is_active,
            created_at: row.created_at,
        })
    }
}

#[async_trait]
impl PermissionCatalogRepository for PostgresPermissionCatalogRepository {
    async fn list_permission_definitions(&self) -> AppResult<Vec<PermissionDefinition>> {
        let rows = sqlx::query_as::<_, PermissionDefinitionRow>(
            r#"
            SELECT id, name, description, category, is_active, created_at
            FROM permission_definitions
            ORDER BY category, name
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|error| store_error("failed to list permission definitions", error))?;

        rows.into_iter()
            .map(PermissionDefinition::try_from)
            .collect()
    }

    async fn find_permission_definition_by_name(
        &self,
        name: &PermissionName,
    ) -> AppResult<Option<PermissionDefinition>> {
        let row = sqlx::query_as::<_, PermissionDefinitionRow>(
            r#"
            SELECT id, name, description, category, is_active, created_at
            FROM permission_definitions
            WHERE name = $1
            "#,
        )
        .bind(name.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| {
            store_error(
                &format!("failed to load permission definition '{name}'"),
                error,
            )
        })?;

        row.map(PermissionDefinition::try_from).transpose()
    }

    async fn create_permission_definition(
        &self,
        input: CreatePermissionDefinitionInput,
    ) -> AppResult<PermissionDefinition> {
        let row = sqlx::query_as::<_, PermissionDefinitionRow>(
            r#"
            INSERT INTO permission_definitions (name, description, category)
            VALUES ($1, $2, $3)
            RETURNING id, name, description, category, is_active, created_at
            "#,
        )
        .bind(input.name.as_str())
        .bind(input.description)
        .bind(input.category.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(|error| {
            store_error(
                &format!("failed to create permission definition '{}'", input.name),
                error,
            )
        })?;

        PermissionDefinition::try_from(row)
    }
}
