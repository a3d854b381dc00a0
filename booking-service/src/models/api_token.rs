use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Opaque bearer token. Only the SHA-256 of the presented value is stored.
#[derive(Debug, Clone, FromRow)]
pub struct ApiToken {
    pub token_id: Uuid,
    pub user_id: Uuid,
    pub token_hash: String,
    pub expires_at: DateTime<Utc>,
    pub created_utc: DateTime<Utc>,
}
