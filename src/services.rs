pub mod auth;
pub mod inventory_service;
pub mod session_cleanup;
