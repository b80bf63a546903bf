use async_trait::async_trait;
use sqlx::PgPool;
use tracing::debug;
use uuid::Uuid;

use tessera_application::{AuditEvent, AuditRepository};
use tessera_core::AppResult;

use crate::store_error::store_error;

/// Append-only audit trail for permission administration, stored in
/// `audit_log_entries`.
#[derive(Clone)]
pub struct PostgresAuditRepository {
    pool: PgPool,
}

impl PostgresAuditRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AuditRepository for PostgresAuditRepository {
    async fn append_event(&self, event: AuditEvent) -> AppResult<()> {
        let action = event.action.as_str();
        let entry_id: Uuid = sqlx::query_scalar(
            r#"
            INSERT INTO audit_log_entries (actor_user_id, action, resource_type, resource_id, detail)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id
            "#,
        )
        .bind(event.actor_user_id.as_uuid())
        .bind(action)
        .bind(event.resource_type.as_str())
        .bind(event.resource_id.as_str())
        .bind(event.detail)
        .fetch_one(&self.pool)
        .await
        .map_err(|error| {
            store_error(
                &format!("failed to record audit action '{action}'"),
                error,
            )
        })?;

        debug!(
            %entry_id,
            actor = %event.actor_user_id,
            action,
            resource_type = %event.resource_type,
            resource_id = %event.resource_id,
            "audit event recorded"
        );

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use sqlx::PgPool;
    use sqlx::postgres::PgPoolOptions;
    use tessera_application::{AuditEvent, AuditRepository};
    use tessera_domain::{AuditAction, UserId};
    use uuid::Uuid;

    use super::PostgresAuditRepository;
    use crate::MIGRATOR;

    async fn test_pool() -> Option<PgPool> {
        let Ok(database_url) = std::env::var("DATABASE_URL") else {
            return None;
        };

        let pool = match PgPoolOptions::new()
            .max_connections(1)
            .connect(database_url.as_str())
            .await
        {
            Ok(pool) => pool,
            Err(error) => panic!("failed to connect to DATABASE_URL in test: {error}"),
        };

        if let Err(error) = MIGRATOR.run(&pool).await {
            panic!("failed to run migrations for audit tests: {error}");
        }

        Some(pool)
    }

    #[tokio::test]
    async fn append_event_stores_action_identifier() {
        let Some(pool) = test_pool().await else {
            return;
        };

        let repository = PostgresAuditRepository::new(pool.clone());
        let resource_id = Uuid::new_v4().to_string();
        let appended = repository
            .append_event(AuditEvent {
                actor_user_id: UserId::new(),
                action: AuditAction::SecurityPermissionRevoked,
                resource_type: "permission_grant".to_owned(),
                resource_id: resource_id.clone(),
                detail: None,
            })
            .await;
        assert!(appended.is_ok());

        let stored = sqlx::query_scalar::<_, String>(
            "SELECT action FROM audit_log_entries WHERE resource_id = $1",
        )
        .bind(resource_id)
        .fetch_one(&pool)
        .await;

        assert_eq!(
            stored.ok().as_deref(),
            Some(AuditAction::SecurityPermissionRevoked.as_str())
        );
    }
}
