use service_core::error::AppError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),

    #[error("Email error: {0}")]
    EmailError(String),

    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Account is not verified")]
    AccountNotVerified,

    #[error("Email already registered")]
    EmailAlreadyRegistered,

    #[error("Invalid or expired token")]
    InvalidToken,

    #[error("User not found")]
    UserNotFound,

    #[error("No OTP has been issued for this account")]
    OtpNotFound,

    #[error("OTP has already been used")]
    OtpConsumed,

    #[error("OTP has expired")]
    OtpExpired,

    #[error("OTP code does not match")]
    OtpMismatch,

    #[error("Too many failed attempts; request a new code")]
    OtpLocked,

    #[error("Account is already verified")]
    AlreadyVerified,

    #[error("Venue not found")]
    VenueNotFound,

    #[error("Field not found")]
    FieldNotFound,

    #[error("Booking not found")]
    BookingNotFound,

    #[error("This booking does not belong to you")]
    NotBookingOwner,

    #[error("Invalid play window: {0}")]
    InvalidPlayWindow(String),
}

impl From<ServiceError> for AppError {
    fn from(err: ServiceError) -> Self {
        let message = err.to_string();
        match err {
            ServiceError::Database(e) => AppError::DatabaseError(anyhow::anyhow!(e)),
            ServiceError::Internal(e) => AppError::InternalError(e),
            ServiceError::EmailError(e) => AppError::EmailError(e),
            ServiceError::InvalidCredentials => AppError::BadRequest(anyhow::anyhow!(message)),
            ServiceError::AccountNotVerified
            | ServiceError::InvalidToken
            | ServiceError::NotBookingOwner => AppError::Unauthorized(anyhow::anyhow!(message)),
            ServiceError::EmailAlreadyRegistered
            | ServiceError::AlreadyVerified
            | ServiceError::InvalidPlayWindow(_) => {
                AppError::Unprocessable(anyhow::anyhow!(message))
            }
            ServiceError::UserNotFound
            | ServiceError::OtpNotFound
            | ServiceError::VenueNotFound
            | ServiceError::FieldNotFound
            | ServiceError::BookingNotFound => AppError::NotFound(anyhow::anyhow!(message)),
            ServiceError::OtpConsumed
            | ServiceError::OtpExpired
            | ServiceError::OtpMismatch
            | ServiceError::OtpLocked => AppError::BadRequest(anyhow::anyhow!(message)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    fn status(err: ServiceError) -> StatusCode {
        AppError::from(err).status_code()
    }

    #[test]
    fn maps_domain_errors_to_http_classes() {
        assert_eq!(status(ServiceError::EmailAlreadyRegistered), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(status(ServiceError::InvalidCredentials), StatusCode::BAD_REQUEST);
        assert_eq!(status(ServiceError::AccountNotVerified), StatusCode::UNAUTHORIZED);
        assert_eq!(status(ServiceError::NotBookingOwner), StatusCode::UNAUTHORIZED);
        assert_eq!(status(ServiceError::BookingNotFound), StatusCode::NOT_FOUND);
        assert_eq!(status(ServiceError::OtpNotFound), StatusCode::NOT_FOUND);
        assert_eq!(status(ServiceError::OtpExpired), StatusCode::BAD_REQUEST);
        assert_eq!(status(ServiceError::OtpMismatch), StatusCode::BAD_REQUEST);
        assert_eq!(status(ServiceError::OtpLocked), StatusCode::BAD_REQUEST);
        assert_eq!(status(ServiceError::AlreadyVerified), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(
            status(ServiceError::EmailError("smtp down".to_string())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            status(ServiceError::Database(sqlx::Error::RowNotFound)),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
