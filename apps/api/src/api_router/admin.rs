use axum::Router;
use axum::routing::{delete, get, put};

use crate::handlers;
use crate::state::AppState;

/// Administration routes. Callers must already carry a session identity.
pub(super) fn build_admin_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/api/admin/check-access",
            get(handlers::access::check_access_handler),
        )
        .route(
            "/api/admin/permissions",
            get(handlers::permissions::list_permission_definitions_handler)
                .post(handlers::permissions::create_permission_definition_handler),
        )
        .route(
            "/api/admin/user-permissions",
            get(handlers::grants::list_grants_handler)
                .post(handlers::grants::grant_permission_handler),
        )
        .route(
            "/api/admin/user-permissions/{grant_id}",
            delete(handlers::grants::revoke_grant_handler),
        )
        .route(
            "/api/admin/user-permissions/{grant_id}/expiry",
            put(handlers::grants::update_grant_expiry_handler),
        )
        .route(
            "/api/admin/audit-log",
            get(handlers::audit::list_audit_log_handler),
        )
}
