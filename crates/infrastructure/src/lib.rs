//! Infrastructure adapters for application ports.

#![forbid(unsafe_code)]

mod in_memory_access_repository;
mod postgres_audit_log_repository;
mod postgres_audit_repository;
mod postgres_permission_catalog_repository;
mod postgres_permission_grant_repository;
mod postgres_user_access_repository;
mod store_error;

pub use in_memory_access_repository::InMemoryAccessRepository;
pub use postgres_audit_log_repository::PostgresAuditLogRepository;
pub use postgres_audit_repository::PostgresAuditRepository;
pub use postgres_permission_catalog_repository::PostgresPermissionCatalogRepository;
pub use postgres_permission_grant_repository::PostgresPermissionGrantRepository;
pub use postgres_user_access_repository::PostgresUserAccessRepository;

/// Migrations for every table owned by the adapters in this crate.
pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("./migrations");
