use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use tessera_application::{AuditLogEntry, AuditLogQuery, AuditLogRepository};
use tessera_core::AppResult;
use tessera_domain::UserId;

use crate::store_error::store_error;

/// PostgreSQL-backed read model over `audit_log_entries`.
#[derive(Clone)]
pub struct PostgresAuditLogRepository {
    pool: PgPool,
}

impl PostgresAuditLogRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct AuditLogRow {
    entry_id: Uuid,
    actor_user_id: Uuid,
    action: String,
    resource_type: String,
    resource_id: String,
    detail: Option<String>,
    created_at: DateTime<Utc>,
}

impl From<AuditLogRow> for AuditLogEntry {
    fn from(row: AuditLogRow) -> Self {
        Self {
            entry_id: row.entry_id,
            actor_user_id: UserId::from_uuid(row.actor_user_id),
            action: row.action,
            resource_type: row.resource_type,
            resource_id: row.resource_id,
            detail: row.detail,
            created_at: row.created_at,
        }
    }
}

#[async_trait]
impl AuditLogRepository for PostgresAuditLogRepository {
    async fn list_recent_entries(&self, query: AuditLogQuery) -> AppResult<Vec<AuditLogEntry>> {
        let limit = i64::try_from(query.limit).unwrap_or(i64::MAX);
        let offset = i64::try_from(query.offset).unwrap_or(i64::MAX);

        let rows = sqlx::query_as::<_, AuditLogRow>(
            r#"
            SELECT
                id AS entry_id,
                actor_user_id,
                action,
                resource_type,
                resource_id,
                detail,
                created_at
            FROM audit_log_entries
            WHERE ($1::TEXT IS NULL OR action = $1)
              AND ($2::UUID IS NULL OR actor_user_id = $2)
              AND ($3::TEXT IS NULL OR resource_type = $3)
            ORDER BY created_at DESC, id
            LIMIT $4
            OFFSET $5
            "#,
        )
        .bind(query.action)
        .bind(query.actor_user_id.map(|user_id| user_id.as_uuid()))
        .bind(query.resource_type)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
        .map_err(|error| store_error("failed to list audit log entries", error))?;

        Ok(rows.into_iter().map(AuditLogEntry::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use sqlx::PgPool;
    use sqlx::postgres::PgPoolOptions;
    use tessera_application::{AuditEvent, AuditLogQuery, AuditLogRepository, AuditRepository};
    use tessera_domain::{AuditAction, UserId};
    use uuid::Uuid;

    use super::PostgresAuditLogRepository;
    use crate::{MIGRATOR, PostgresAuditRepository};

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
            panic!("failed to run migrations for audit log tests: {error}");
        }

        Some(pool)
    }

    #[tokio::test]
    async fn list_recent_entries_filters_by_actor_and_action() {
        let Some(pool) = test_pool().await else {
            return;
        };

        let writer = PostgresAuditRepository::new(pool.clone());
        let reader = PostgresAuditLogRepository::new(pool);
        let actor = UserId::new();
        let grant_id = Uuid::new_v4().to_string();
        for action in [
            AuditAction::SecurityPermissionGranted,
            AuditAction::SecurityPermissionRevoked,
        ] {
            let appended = writer
                .append_event(AuditEvent {
                    actor_user_id: actor,
                    action,
                    resource_type: "permission_grant".to_owned(),
                    resource_id: grant_id.clone(),
                    detail: None,
                })
                .await;
            assert!(appended.is_ok());
        }

        let Ok(by_actor) = reader
            .list_recent_entries(AuditLogQuery {
                limit: 10,
                offset: 0,
                action: None,
                actor_user_id: Some(actor),
                resource_type: None,
            })
            .await
        else {
            panic!("listing should succeed");
        };
        let Ok(revocations) = reader
            .list_recent_entries(AuditLogQuery {
                limit: 10,
                offset: 0,
                action: Some(AuditAction::SecurityPermissionRevoked.as_str().to_owned()),
                actor_user_id: Some(actor),
                resource_type: Some("permission_grant".to_owned()),
            })
            .await
        else {
            panic!("listing should succeed");
        };

        assert_eq!(by_actor.len(), 2);
        assert!(by_actor.iter().all(|entry| entry.resource_id == grant_id));
        assert_eq!(revocations.len(), 1);
        assert_eq!(
            revocations[0].action,
            AuditAction::SecurityPermissionRevoked.as_str()
        );
    }
}
