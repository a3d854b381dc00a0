//! One-time verification codes. A user holds at most one row; issuing a new
//! code replaces it.

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, FromRow)]
pub struct OtpCode {
    pub otp_id: Uuid,
    pub user_id: Uuid,
    pub code_hash: String,
    pub expiry_utc: DateTime<Utc>,
    pub consumed_utc: Option<DateTime<Utc>>,
    pub failed_attempts: i32,
    pub created_utc: DateTime<Utc>,
}

impl OtpCode {
    pub fn is_consumed(&self) -> bool {
        self.consumed_utc.is_some()
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expiry_utc <= now
    }

    /// A code that has absorbed `max_attempts` wrong guesses is dead until
    /// a new one is issued.
    pub fn is_locked(&self, max_attempts: i32) -> bool {
        self.failed_attempts >= max_attempts
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn code(expiry_utc: DateTime<Utc>) -> OtpCode {
        OtpCode {
            otp_id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            code_hash: String::new(),
            expiry_utc,
            consumed_utc: None,
            failed_attempts: 0,
            created_utc: Utc::now(),
        }
    }

    #[test]
    fn expiry_is_exclusive() {
        let now = Utc::now();
        assert!(code(now).is_expired_at(now));
        assert!(!code(now + Duration::minutes(1)).is_expired_at(now));
    }

    #[test]
    fn locks_once_the_attempt_cap_is_reached() {
        let mut otp = code(Utc::now() + Duration::minutes(5));
        otp.failed_attempts = 4;
        assert!(!otp.is_locked(5));
        otp.failed_attempts = 5;
        assert!(otp.is_locked(5));
    }
}
