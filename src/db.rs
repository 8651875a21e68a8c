pub mod inventory_repo;
pub use inventory_repo::InventoryRepository;
pub mod rbac_repo;
pub use rbac_repo::RbacRepository;
pub mod session_repo;
pub use session_repo::SessionRepository;
