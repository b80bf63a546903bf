//! Domain entities and invariants.

#![forbid(unsafe_code)]

mod access;
mod grant;
mod permission;
mod security;
mod user;

pub use access::AccessDecision;
pub use grant::PermissionGrant;
pub use permission::{ADMIN_FULL_ACCESS, PermissionDefinition, PermissionName};
pub use security::AuditAction;
pub use user::{UserAccount, UserId};
