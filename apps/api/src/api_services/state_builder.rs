use std::sync::Arc;

use sqlx::PgPool;
use tessera_application::{AccessResolver, PermissionAdminService, UserAccessRepository};
use tessera_infrastructure::{
    PostgresAuditLogRepository, PostgresAuditRepository, PostgresPermissionCatalogRepository,
    PostgresPermissionGrantRepository, PostgresUserAccessRepository,
};
use tokio_util::sync::CancellationToken;

use crate::api_config::ApiConfig;
use crate::state::AppState;

pub fn build_app_state(pool: PgPool, config: &ApiConfig, shutdown: CancellationToken) -> AppState {
    let user_repository: Arc<dyn UserAccessRepository> =
        Arc::new(PostgresUserAccessRepository::new(pool.clone()));
    let grant_repository = Arc::new(PostgresPermissionGrantRepository::new(pool.clone()));
    let catalog_repository = Arc::new(PostgresPermissionCatalogRepository::new(pool.clone()));
    let audit_repository = Arc::new(PostgresAuditRepository::new(pool.clone()));
    let audit_log_repository = Arc::new(PostgresAuditLogRepository::new(pool));

    let access_resolver = AccessResolver::new(user_repository.clone(), grant_repository.clone());
    let permission_admin_service = PermissionAdminService::new(
        access_resolver.clone(),
        user_repository.clone(),
        grant_repository,
        catalog_repository,
        audit_repository,
        audit_log_repository,
    );

    AppState {
        access_resolver,
        permission_admin_service,
        user_repository,
        frontend_url: config.frontend_url.clone(),
        bootstrap_token: config.bootstrap_token.clone(),
        shutdown,
    }
}
