use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::utils::validation::validate_not_blank;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RegisterRequest {
    #[serde(default)]
    #[validate(custom(function = "validate_not_blank"))]
    #[schema(example = "Rina Putri")]
    pub name: String,

    #[serde(default)]
    #[validate(email(message = "Invalid email format"))]
    #[schema(example = "rina@example.com")]
    pub email: String,

    #[serde(default)]
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    #[schema(example = "secret1", min_length = 6)]
    pub password: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    #[serde(default)]
    #[validate(email(message = "Invalid email format"))]
    #[schema(example = "rina@example.com")]
    pub email: String,

    #[serde(default)]
    #[validate(length(min = 1, message = "Password is required"))]
    #[schema(example = "secret1")]
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct LoginResponse {
    #[schema(example = "Login successful")]
    pub message: String,
    #[schema(example = "q9V1m0...")]
    pub token: String,
    #[schema(example = "Bearer")]
    pub token_type: String,
    pub expires_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct VerifyOtpRequest {
    #[serde(default)]
    #[validate(email(message = "Invalid email format"))]
    #[schema(example = "rina@example.com")]
    pub email: String,

    #[serde(default)]
    #[validate(length(equal = 6, message = "OTP code must be 6 digits"))]
    #[schema(example = "482913")]
    pub otp_code: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ResendOtpRequest {
    #[serde(default)]
    #[validate(email(message = "Invalid email format"))]
    #[schema(example = "rina@example.com")]
    pub email: String,
}
