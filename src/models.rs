pub mod auth;
pub mod inventory;
pub mod rbac;
