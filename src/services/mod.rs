//! Business logic services.

pub mod actor_admin;
pub mod catalog;
pub mod defect;
pub mod execution;

pub use actor_admin::configure_routes as configure_auth_routes;
pub use catalog::StatusCatalog;
