use sqlx::FromRow;
use uuid::Uuid;

use super::user::Role;

/// The authenticated principal of one request, resolved from its bearer
/// token by the auth middleware.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Caller {
    pub user_id: Uuid,
    pub name: String,
    pub email: String,
    pub role: Role,
    /// Token the request was authenticated with; logout revokes it.
    pub token_id: Uuid,
}

/// Row shape of the token lookup.
#[derive(Debug, FromRow)]
pub(crate) struct CallerRow {
    pub token_id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub email: String,
    pub role_code: String,
}

impl From<CallerRow> for Caller {
    fn from(row: CallerRow) -> Self {
        Self {
            user_id: row.user_id,
            name: row.name,
            email: row.email,
            role: Role::parse(&row.role_code).unwrap_or(Role::User),
            token_id: row.token_id,
        }
    }
}
