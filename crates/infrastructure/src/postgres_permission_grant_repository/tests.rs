use chrono::{Duration, Utc};
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use tessera_application::{
    AccessResolver, CreatePermissionDefinitionInput, CreatePermissionGrantInput,
    PermissionCatalogRepository, PermissionGrantQuery, PermissionGrantRepository,
};
use tessera_core::{AppError, NonEmptyString};
use tessera_domain::{PermissionDefinition, PermissionName, UserId};
use uuid::Uuid;

use std::sync::Arc;

use super::PostgresPermissionGrantRepository;
use crate::{MIGRATOR, PostgresPermissionCatalogRepository, PostgresUserAccessRepository};

async fn test_pool() -> Option<PgPool> {
    let Ok(database_url) = std::env::var("DATABASE_URL") else {
        return None;
    };

    let pool = match PgPoolOptions::new()
        .max_connections(2)
        .connect(database_url.as_str())
        .await
    {
        Ok(pool) => pool,
        Err(error) => panic!("failed to connect to DATABASE_URL in test: {error}"),
    };

    if let Err(error) = MIGRATOR.run(&pool).await {
        panic!("failed to run migrations for postgres grant tests: {error}");
    }

    Some(pool)
}

async fn insert_user(pool: &PgPool, is_admin: bool) -> UserId {
    let user_id = UserId::new();
    let insert = sqlx::query(
        r#"
        INSERT INTO users (id, display_name, email, is_admin)
        VALUES ($1, $2, $3, $4)
        "#,
    )
    .bind(user_id.as_uuid())
    .bind("Grant Tester")
    .bind(format!("{}@example.com", user_id.as_uuid()))
    .bind(is_admin)
    .execute(pool)
    .await;

    assert!(insert.is_ok());
    user_id
}

async fn insert_definition(pool: &PgPool, prefix: &str) -> PermissionDefinition {
    let catalog = PostgresPermissionCatalogRepository::new(pool.clone());
    let name = format!("{prefix}.t{}", Uuid::new_v4().simple());
    let (Ok(name), Ok(category)) = (PermissionName::new(name), NonEmptyString::new("tests")) else {
        panic!("valid catalogue input");
    };

    match catalog
        .create_permission_definition(CreatePermissionDefinitionInput {
            name,
            description: None,
            category,
        })
        .await
    {
        Ok(definition) => definition,
        Err(error) => panic!("failed to create permission definition: {error}"),
    }
}

fn grant_input(
    user_id: UserId,
    granted_by: UserId,
    definition: &PermissionDefinition,
) -> CreatePermissionGrantInput {
    CreatePermissionGrantInput {
        user_id,
        permission_id: definition.permission_id,
        permission: definition.name.clone(),
        expires_at: None,
        granted_by,
    }
}

#[tokio::test]
async fn effective_grants_exclude_revoked_and_expired_rows() {
    let Some(pool) = test_pool().await else {
        return;
    };

    let repository = PostgresPermissionGrantRepository::new(pool.clone());
    let admin_id = insert_user(&pool, true).await;
    let user_id = insert_user(&pool, false).await;
    let kept = insert_definition(&pool, "reports").await;
    let revoked = insert_definition(&pool, "suppliers").await;
    let expiring = insert_definition(&pool, "admin").await;

    let Ok(kept_grant) = repository
        .create_grant(grant_input(user_id, admin_id, &kept))
        .await
    else {
        panic!("grant should be created");
    };
    let Ok(revoked_grant) = repository
        .create_grant(grant_input(user_id, admin_id, &revoked))
        .await
    else {
        panic!("grant should be created");
    };
    let Ok(expiring_grant) = repository
        .create_grant(CreatePermissionGrantInput {
            expires_at: Some(Utc::now() + Duration::hours(1)),
            ..grant_input(user_id, admin_id, &expiring)
        })
        .await
    else {
        panic!("grant should be created");
    };

    assert!(repository.deactivate_grant(revoked_grant.grant_id).await.is_ok());

    let Ok(effective_now) = repository
        .find_effective_grants_by_user_id(user_id, Utc::now())
        .await
    else {
        panic!("effective grants should load");
    };
    let Ok(effective_later) = repository
        .find_effective_grants_by_user_id(user_id, Utc::now() + Duration::hours(2))
        .await
    else {
        panic!("effective grants should load");
    };

    let now_ids: Vec<Uuid> = effective_now.iter().map(|grant| grant.grant_id).collect();
    let later_ids: Vec<Uuid> = effective_later.iter().map(|grant| grant.grant_id).collect();
    assert_eq!(now_ids, vec![kept_grant.grant_id, expiring_grant.grant_id]);
    assert_eq!(later_ids, vec![kept_grant.grant_id]);

    let Ok(Some(stored)) = repository.find_grant(revoked_grant.grant_id).await else {
        panic!("revoked grant row must remain");
    };
    assert!(!stored.is_active);
}

#[tokio::test]
async fn create_grant_rejects_duplicate_effective_grant() {
    let Some(pool) = test_pool().await else {
        return;
    };

    let repository = PostgresPermissionGrantRepository::new(pool.clone());
    let admin_id = insert_user(&pool, true).await;
    let user_id = insert_user(&pool, false).await;
    let definition = insert_definition(&pool, "skus").await;

    let first = repository
        .create_grant(grant_input(user_id, admin_id, &definition))
        .await;
    let second = repository
        .create_grant(grant_input(user_id, admin_id, &definition))
        .await;

    assert!(first.is_ok());
    assert!(matches!(second, Err(AppError::Conflict(_))));
}

#[tokio::test]
async fn update_grant_expiry_round_trips_and_reports_missing_rows() {
    let Some(pool) = test_pool().await else {
        return;
    };

    let repository = PostgresPermissionGrantRepository::new(pool.clone());
    let admin_id = insert_user(&pool, true).await;
    let user_id = insert_user(&pool, false).await;
    let definition = insert_definition(&pool, "carriers").await;
    let Ok(grant) = repository
        .create_grant(grant_input(user_id, admin_id, &definition))
        .await
    else {
        panic!("grant should be created");
    };

    let new_expiry = Utc::now() + Duration::days(3);
    let Ok(updated) = repository
        .update_grant_expiry(grant.grant_id, Some(new_expiry))
        .await
    else {
        panic!("expiry update should succeed");
    };
    let missing = repository
        .update_grant_expiry(Uuid::new_v4(), None)
        .await;

    assert_eq!(
        updated.expires_at.map(|value| value.timestamp()),
        Some(new_expiry.timestamp())
    );
    assert_eq!(updated.permission, definition.name);
    assert!(matches!(missing, Err(AppError::NotFound(_))));
}

#[tokio::test]
async fn update_grant_expiry_refuses_to_revive_superseded_grant() {
    let Some(pool) = test_pool().await else {
        return;
    };

    let repository = PostgresPermissionGrantRepository::new(pool.clone());
    let admin_id = insert_user(&pool, true).await;
    let user_id = insert_user(&pool, false).await;
    let definition = insert_definition(&pool, "inventory").await;
    let Ok(superseded) = repository
        .create_grant(grant_input(user_id, admin_id, &definition))
        .await
    else {
        panic!("grant should be created");
    };
    let expired = sqlx::query(
        "UPDATE user_permission_grants SET expires_at = now() - INTERVAL '1 hour' WHERE id = $1",
    )
    .bind(superseded.grant_id)
    .execute(&pool)
    .await;
    assert!(expired.is_ok());
    assert!(
        repository
            .create_grant(grant_input(user_id, admin_id, &definition))
            .await
            .is_ok()
    );

    let revived = repository
        .update_grant_expiry(superseded.grant_id, Some(Utc::now() + Duration::days(1)))
        .await;

    assert!(matches!(revived, Err(AppError::Conflict(_))));
    let Ok(effective) = repository
        .find_effective_grants_by_user_id(user_id, Utc::now())
        .await
    else {
        panic!("effective grants should load");
    };
    assert_eq!(effective.len(), 1);
}

#[tokio::test]
async fn update_grant_expiry_rejects_revoked_grant() {
    let Some(pool) = test_pool().await else {
        return;
    };

    let repository = PostgresPermissionGrantRepository::new(pool.clone());
    let admin_id = insert_user(&pool, true).await;
    let user_id = insert_user(&pool, false).await;
    let definition = insert_definition(&pool, "locations").await;
    let Ok(grant) = repository
        .create_grant(grant_input(user_id, admin_id, &definition))
        .await
    else {
        panic!("grant should be created");
    };
    assert!(repository.deactivate_grant(grant.grant_id).await.is_ok());

    let result = repository.update_grant_expiry(grant.grant_id, None).await;

    assert!(matches!(result, Err(AppError::Conflict(_))));
}

#[tokio::test]
async fn list_grants_filters_by_user_and_activity() {
    let Some(pool) = test_pool().await else {
        return;
    };

    let repository = PostgresPermissionGrantRepository::new(pool.clone());
    let admin_id = insert_user(&pool, true).await;
    let user_id = insert_user(&pool, false).await;
    let first = insert_definition(&pool, "companies").await;
    let second = insert_definition(&pool, "warehouses").await;

    let Ok(revoked) = repository
        .create_grant(grant_input(user_id, admin_id, &first))
        .await
    else {
        panic!("grant should be created");
    };
    assert!(
        repository
            .create_grant(grant_input(user_id, admin_id, &second))
            .await
            .is_ok()
    );
    assert!(repository.deactivate_grant(revoked.grant_id).await.is_ok());

    let Ok(active) = repository
        .list_grants(PermissionGrantQuery {
            user_id: Some(user_id),
            active_only: true,
            limit: 50,
            offset: 0,
        })
        .await
    else {
        panic!("listing should succeed");
    };
    let Ok(all) = repository
        .list_grants(PermissionGrantQuery {
            user_id: Some(user_id),
            active_only: false,
            limit: 50,
            offset: 0,
        })
        .await
    else {
        panic!("listing should succeed");
    };

    assert_eq!(active.len(), 1);
    assert_eq!(active[0].permission, second.name);
    assert_eq!(all.len(), 2);
}

#[tokio::test]
async fn resolver_reads_postgres_stores() {
    let Some(pool) = test_pool().await else {
        return;
    };

    let grants = Arc::new(PostgresPermissionGrantRepository::new(pool.clone()));
    let users = Arc::new(PostgresUserAccessRepository::new(pool.clone()));
    let admin_id = insert_user(&pool, true).await;
    let user_id = insert_user(&pool, false).await;
    let definition = insert_definition(&pool, "admin").await;
    assert!(
        grants
            .create_grant(grant_input(user_id, admin_id, &definition))
            .await
            .is_ok()
    );

    let resolver = AccessResolver::new(users, grants);
    let Ok(decision) = resolver.resolve_access(user_id).await else {
        panic!("expected decision");
    };

    assert!(decision.can_access_admin);
    assert!(!decision.is_admin);
    assert_eq!(decision.permissions, vec![definition.name]);
}
