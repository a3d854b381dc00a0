//! Accounts: registration with an emailed OTP, verification, and opaque
//! bearer token sessions.

use chrono::{DateTime, Duration, Utc};
use sqlx::{PgPool, Postgres, Transaction};
use std::sync::Arc;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::config::AuthPolicyConfig;
use crate::dtos::auth::{LoginRequest, RegisterRequest, ResendOtpRequest, VerifyOtpRequest};
use crate::models::caller::CallerRow;
use crate::models::{ApiToken, Caller, OtpCode, SanitizedUser, User};
use crate::services::email::EmailProvider;
use crate::services::error::ServiceError;
use crate::services::metrics;
use crate::utils::{hash_password, otp, token, verify_password, Password, PasswordHashString};

const USER_COLUMNS: &str =
    "user_id, name, email, password_hash, role_code, is_verified, created_utc, updated_utc";

/// A freshly issued session token. `token` is shown to the client once.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
    pub user: SanitizedUser,
}

#[derive(Clone)]
pub struct AuthService {
    pool: PgPool,
    email: Arc<dyn EmailProvider>,
    policy: AuthPolicyConfig,
}

impl AuthService {
    pub fn new(pool: PgPool, email: Arc<dyn EmailProvider>, policy: AuthPolicyConfig) -> Self {
        Self {
            pool,
            email,
            policy,
        }
    }

    /// Create an unverified account, issue its OTP and mail it. The account
    /// only persists if the mail was accepted.
    #[instrument(skip(self, req), fields(email = %req.email))]
    pub async fn register(&self, req: RegisterRequest) -> Result<SanitizedUser, ServiceError> {
        let password_hash = hash_password(&Password::new(req.password))?;
        let user = User::new(
            req.name.trim().to_string(),
            req.email.trim().to_string(),
            password_hash.into_string(),
        );

        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO users (user_id, name, email, password_hash, role_code, is_verified, created_utc, updated_utc)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(user.user_id)
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(&user.role_code)
        .bind(user.is_verified)
        .bind(user.created_utc)
        .bind(user.updated_utc)
        .execute(&mut *tx)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => {
                ServiceError::EmailAlreadyRegistered
            }
            other => ServiceError::Database(other),
        })?;

        let code = self.issue_otp(&mut tx, user.user_id).await?;

        self.email
            .send_otp_email(&user.email, &user.name, &code, self.policy.otp_ttl_minutes)
            .await
            .map_err(|e| ServiceError::EmailError(e.to_string()))?;

        tx.commit().await?;

        metrics::record_registration();
        info!(user_id = %user.user_id, "User registered");

        Ok(user.sanitized())
    }

    /// Replace the user's outstanding code with a fresh one.
    async fn issue_otp(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user_id: Uuid,
    ) -> Result<String, ServiceError> {
        let code = otp::generate_otp();
        let expiry_utc = Utc::now() + Duration::minutes(self.policy.otp_ttl_minutes);

        sqlx::query(
            r#"
            INSERT INTO otp_codes (otp_id, user_id, code_hash, expiry_utc, consumed_utc, created_utc)
            VALUES ($1, $2, $3, $4, NULL, NOW())
            ON CONFLICT (user_id) DO UPDATE
            SET code_hash = EXCLUDED.code_hash,
                expiry_utc = EXCLUDED.expiry_utc,
                consumed_utc = NULL,
                failed_attempts = 0,
                created_utc = NOW()
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(otp::hash_otp(&code))
        .bind(expiry_utc)
        .execute(&mut **tx)
        .await?;

        Ok(code)
    }

    /// Issue and mail a fresh code to an account that is still unverified.
    /// The old code, and its failed attempt count, are replaced.
    #[instrument(skip(self, req), fields(email = %req.email))]
    pub async fn resend_otp(&self, req: ResendOtpRequest) -> Result<(), ServiceError> {
        let mut tx = self.pool.begin().await?;

        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE LOWER(email) = LOWER($1) FOR UPDATE"
        ))
        .bind(req.email.trim())
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(ServiceError::UserNotFound)?;

        if user.is_verified {
            return Err(ServiceError::AlreadyVerified);
        }

        let code = self.issue_otp(&mut tx, user.user_id).await?;

        self.email
            .send_otp_email(&user.email, &user.name, &code, self.policy.otp_ttl_minutes)
            .await
            .map_err(|e| ServiceError::EmailError(e.to_string()))?;

        tx.commit().await?;

        info!(user_id = %user.user_id, "OTP reissued");
        Ok(())
    }

    /// Check credentials and open a session.
    #[instrument(skip(self, req), fields(email = %req.email))]
    pub async fn login(&self, req: LoginRequest) -> Result<IssuedToken, ServiceError> {
        let user = self
            .find_user_by_email(&req.email)
            .await?
            .ok_or(ServiceError::InvalidCredentials)?;

        verify_password(
            &Password::new(req.password),
            &PasswordHashString::new(user.password_hash.clone()),
        )
        .map_err(|_| ServiceError::InvalidCredentials)?;

        if self.policy.require_verified_login && !user.is_verified {
            warn!(user_id = %user.user_id, "Login refused for unverified account");
            return Err(ServiceError::AccountNotVerified);
        }

        sqlx::query("DELETE FROM api_tokens WHERE user_id = $1 AND expires_at <= NOW()")
            .bind(user.user_id)
            .execute(&self.pool)
            .await?;

        let plain = token::generate_token();
        let expires_at = Utc::now() + Duration::hours(self.policy.token_ttl_hours);

        let stored = sqlx::query_as::<_, ApiToken>(
            r#"
            INSERT INTO api_tokens (token_id, user_id, token_hash, expires_at, created_utc)
            VALUES ($1, $2, $3, $4, NOW())
            RETURNING token_id, user_id, token_hash, expires_at, created_utc
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(user.user_id)
        .bind(token::hash_token(&plain))
        .bind(expires_at)
        .fetch_one(&self.pool)
        .await?;

        info!(user_id = %user.user_id, token_id = %stored.token_id, "User logged in");

        Ok(IssuedToken {
            token: plain,
            expires_at: stored.expires_at,
            user: user.sanitized(),
        })
    }

    /// Consume the user's OTP and mark the account verified.
    #[instrument(skip(self, req), fields(email = %req.email))]
    pub async fn verify_otp(&self, req: VerifyOtpRequest) -> Result<(), ServiceError> {
        let result = self.verify_otp_inner(&req).await;
        let outcome = match &result {
            Ok(()) => "verified",
            Err(ServiceError::UserNotFound | ServiceError::OtpNotFound) => "not_found",
            Err(ServiceError::OtpConsumed) => "consumed",
            Err(ServiceError::OtpExpired) => "expired",
            Err(ServiceError::OtpMismatch) => "mismatch",
            Err(ServiceError::OtpLocked) => "locked",
            Err(_) => "error",
        };
        metrics::record_otp_verification(outcome);
        result
    }

    async fn verify_otp_inner(&self, req: &VerifyOtpRequest) -> Result<(), ServiceError> {
        let mut tx = self.pool.begin().await?;

        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE LOWER(email) = LOWER($1) FOR UPDATE"
        ))
        .bind(req.email.trim())
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(ServiceError::UserNotFound)?;

        let otp_row = sqlx::query_as::<_, OtpCode>(
            r#"
            SELECT otp_id, user_id, code_hash, expiry_utc, consumed_utc, failed_attempts, created_utc
            FROM otp_codes
            WHERE user_id = $1
            FOR UPDATE
            "#,
        )
        .bind(user.user_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(ServiceError::OtpNotFound)?;

        if otp_row.is_consumed() {
            return Err(ServiceError::OtpConsumed);
        }
        if otp_row.is_expired_at(Utc::now()) {
            return Err(ServiceError::OtpExpired);
        }
        if otp_row.is_locked(self.policy.otp_max_attempts) {
            return Err(ServiceError::OtpLocked);
        }
        if !otp::otp_matches(&req.otp_code, &otp_row.code_hash) {
            // The miss must survive the rejection, so it commits on its own.
            sqlx::query(
                "UPDATE otp_codes SET failed_attempts = failed_attempts + 1 WHERE otp_id = $1",
            )
            .bind(otp_row.otp_id)
            .execute(&mut *tx)
            .await?;
            tx.commit().await?;

            warn!(
                user_id = %user.user_id,
                failed_attempts = otp_row.failed_attempts + 1,
                "OTP mismatch"
            );
            return Err(ServiceError::OtpMismatch);
        }

        sqlx::query("UPDATE otp_codes SET consumed_utc = NOW() WHERE otp_id = $1")
            .bind(otp_row.otp_id)
            .execute(&mut *tx)
            .await?;

        sqlx::query("UPDATE users SET is_verified = TRUE, updated_utc = NOW() WHERE user_id = $1")
            .bind(user.user_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        info!(user_id = %user.user_id, "Account verified");
        Ok(())
    }

    /// Resolve a presented bearer token to its caller. Expired and revoked
    /// tokens do not resolve.
    pub async fn authenticate(&self, bearer: &str) -> Result<Caller, ServiceError> {
        let row = sqlx::query_as::<_, CallerRow>(
            r#"
            SELECT t.token_id, u.user_id, u.name, u.email, u.role_code
            FROM api_tokens t
            JOIN users u ON u.user_id = t.user_id
            WHERE t.token_hash = $1 AND t.expires_at > NOW()
            "#,
        )
        .bind(token::hash_token(bearer))
        .fetch_optional(&self.pool)
        .await?
        .ok_or(ServiceError::InvalidToken)?;

        Ok(row.into())
    }

    #[instrument(skip(self, caller), fields(user_id = %caller.user_id))]
    pub async fn logout(&self, caller: &Caller) -> Result<(), ServiceError> {
        sqlx::query("DELETE FROM api_tokens WHERE token_id = $1")
            .bind(caller.token_id)
            .execute(&self.pool)
            .await?;

        info!(token_id = %caller.token_id, "Session revoked");
        Ok(())
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, ServiceError> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE LOWER(email) = LOWER($1)"
        ))
        .bind(email.trim())
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }
}
