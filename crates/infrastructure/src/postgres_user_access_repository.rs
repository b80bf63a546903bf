use async_trait::async_trait;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use tessera_application::UserAccessRepository;
use tessera_core::AppResult;
use tessera_domain::{UserAccount, UserId};

use crate::store_error::store_error;

/// PostgreSQL-backed read access to user accounts.
#[derive(Clone)]
pub struct PostgresUserAccessRepository {
    pool: PgPool,
}

impl PostgresUserAccessRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct UserAccountRow {
    id: Uuid,
    display_name: String,
    email: Option<String>,
    is_admin: bool,
    is_super_admin: bool,
    is_active: bool,
}

impl From<UserAccountRow> for UserAccount {
    fn from(row: UserAccountRow) -> Self {
        Self {
            user_id: UserId::from_uuid(row.id),
            display_name: row.display_name,
            email: row.email,
            is_admin: row.is_admin,
            is_super_admin: row.is_super_admin,
            is_active: row.is_active,
        }
    }
}

#[async_trait]
impl UserAccessRepository for PostgresUserAccessRepository {
    async fn find_user_by_id(&self, user_id: UserId) -> AppResult<Option<UserAccount>> {
        let row = sqlx::query_as::<_, UserAccountRow>(
            r#"
            SELECT id, display_name, email, is_admin, is_super_admin, is_active
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(user_id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| store_error(&format!("failed to load user '{user_id}'"), error))?;

        Ok(row.map(UserAccount::from))
    }
}
