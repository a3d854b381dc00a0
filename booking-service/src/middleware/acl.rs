use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use service_core::error::AppError;

use crate::models::{Caller, Role};
use crate::services::policy;

/// Roles admitted to a route group.
#[derive(Debug, Clone, Copy)]
pub struct AllowedRoles(pub &'static [Role]);

pub const OWNERS: AllowedRoles = AllowedRoles(&[Role::Owner]);
pub const USERS: AllowedRoles = AllowedRoles(&[Role::User]);

/// Role gate. Must run after `auth_middleware` has attached the caller.
pub async fn require_roles(
    State(AllowedRoles(allowed)): State<AllowedRoles>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let caller = req.extensions().get::<Caller>().ok_or_else(|| {
        AppError::InternalError(anyhow::anyhow!("Caller missing from request extensions"))
    })?;

    if !policy::authorize(caller, allowed) {
        tracing::warn!(
            user_id = %caller.user_id,
            role = %caller.role,
            path = %req.uri().path(),
            "Role not allowed"
        );
        return Err(AppError::Unauthorized(anyhow::anyhow!(
            "Role is not allowed to access this resource"
        )));
    }

    Ok(next.run(req).await)
}
