pub mod access;
pub mod audit;
pub mod grants;
pub mod health;
pub mod permissions;
