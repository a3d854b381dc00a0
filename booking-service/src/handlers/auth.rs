use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use service_core::error::AppError;

use crate::{
    dtos::{
        auth::{LoginRequest, LoginResponse, RegisterRequest, ResendOtpRequest, VerifyOtpRequest},
        DataResponse, ErrorResponse, MessageResponse,
    },
    models::{Caller, SanitizedUser},
    utils::ValidatedForm,
    AppState,
};

/// Register an account and email its verification code
#[utoipa::path(
    post,
    path = "/api/v1/register",
    request_body(content = RegisterRequest, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 201, description = "Account created, OTP sent", body = SanitizedUser),
        (status = 422, description = "Validation error or email taken", body = ErrorResponse),
        (status = 429, description = "Too many requests", body = ErrorResponse),
        (status = 500, description = "Email could not be sent", body = ErrorResponse)
    ),
    tag = "Authentication"
)]
pub async fn register(
    State(state): State<AppState>,
    ValidatedForm(req): ValidatedForm<RegisterRequest>,
) -> Result<impl IntoResponse, AppError> {
    let user = state.auth_service.register(req).await?;
    Ok((
        StatusCode::CREATED,
        Json(DataResponse::new(
            "Registration successful. Check your email for the verification code.",
            user,
        )),
    ))
}

/// Log in with email and password
#[utoipa::path(
    post,
    path = "/api/v1/login",
    request_body(content = LoginRequest, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 200, description = "Login successful", body = LoginResponse),
        (status = 400, description = "Invalid credentials", body = ErrorResponse),
        (status = 401, description = "Account is not verified", body = ErrorResponse),
        (status = 422, description = "Validation error", body = ErrorResponse),
        (status = 429, description = "Too many requests", body = ErrorResponse)
    ),
    tag = "Authentication"
)]
pub async fn login(
    State(state): State<AppState>,
    ValidatedForm(req): ValidatedForm<LoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    let issued = state.auth_service.login(req).await?;
    Ok((
        StatusCode::OK,
        Json(LoginResponse {
            message: "Login successful".to_string(),
            token: issued.token,
            token_type: "Bearer".to_string(),
            expires_at: issued.expires_at,
        }),
    ))
}

/// Confirm an account with its emailed OTP
#[utoipa::path(
    post,
    path = "/api/v1/otp-verification",
    request_body(content = VerifyOtpRequest, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 200, description = "Account verified", body = MessageResponse),
        (status = 400, description = "OTP mismatched, used, expired or locked", body = ErrorResponse),
        (status = 404, description = "Unknown email or no OTP issued", body = ErrorResponse),
        (status = 422, description = "Validation error", body = ErrorResponse)
    ),
    tag = "Authentication"
)]
pub async fn verify_otp(
    State(state): State<AppState>,
    ValidatedForm(req): ValidatedForm<VerifyOtpRequest>,
) -> Result<impl IntoResponse, AppError> {
    state.auth_service.verify_otp(req).await?;
    Ok((
        StatusCode::OK,
        Json(MessageResponse::new("Account verified")),
    ))
}

/// Mail a fresh OTP to an unverified account
#[utoipa::path(
    post,
    path = "/api/v1/otp-resend",
    request_body(content = ResendOtpRequest, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 200, description = "New OTP sent", body = MessageResponse),
        (status = 404, description = "Unknown email", body = ErrorResponse),
        (status = 422, description = "Validation error or account already verified", body = ErrorResponse),
        (status = 429, description = "Too many requests", body = ErrorResponse)
    ),
    tag = "Authentication"
)]
pub async fn resend_otp(
    State(state): State<AppState>,
    ValidatedForm(req): ValidatedForm<ResendOtpRequest>,
) -> Result<impl IntoResponse, AppError> {
    state.auth_service.resend_otp(req).await?;
    Ok((StatusCode::OK, Json(MessageResponse::new("OTP sent"))))
}

/// Revoke the presented token
#[utoipa::path(
    post,
    path = "/api/v1/logout",
    responses(
        (status = 200, description = "Logged out", body = MessageResponse),
        (status = 401, description = "Invalid or expired token", body = ErrorResponse)
    ),
    tag = "Authentication",
    security(("bearer_auth" = []))
)]
pub async fn logout(
    State(state): State<AppState>,
    caller: Caller,
) -> Result<impl IntoResponse, AppError> {
    state.auth_service.logout(&caller).await?;
    Ok((StatusCode::OK, Json(MessageResponse::new("Logged out"))))
}
