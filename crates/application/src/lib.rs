//! Application services and ports.

#![forbid(unsafe_code)]

mod access_ports;
mod access_resolver;
mod audit_ports;
mod permission_admin_service;

pub use access_ports::{
    CreatePermissionDefinitionInput, CreatePermissionGrantInput, PermissionCatalogRepository,
    PermissionGrantQuery, PermissionGrantRepository, UserAccessRepository,
};
pub use access_resolver::AccessResolver;
pub use audit_ports::{
    AuditEvent, AuditLogEntry, AuditLogQuery, AuditLogRepository, AuditRepository,
};
pub use permission_admin_service::{GrantPermissionInput, PermissionAdminService};
