pub mod acl;
pub mod auth;

pub use acl::{require_roles, AllowedRoles};
pub use auth::auth_middleware;
