use std::sync::Arc;

use tessera_application::{AccessResolver, PermissionAdminService, UserAccessRepository};
use tokio_util::sync::CancellationToken;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub access_resolver: AccessResolver,
    pub permission_admin_service: PermissionAdminService,
    pub user_repository: Arc<dyn UserAccessRepository>,
    pub frontend_url: String,
    pub bootstrap_token: String,
    /// Cancelled on shutdown; each request resolves under a child token.
    pub shutdown: CancellationToken,
}
