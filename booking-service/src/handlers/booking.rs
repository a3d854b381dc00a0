use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use service_core::error::AppError;
use uuid::Uuid;

use crate::{
    dtos::{booking::BookingRequest, DataResponse, ErrorResponse, MessageResponse},
    models::{Booking, BookingDetail, Caller, FieldBookings},
    services::PlayWindow,
    utils::{validation::today, ApiPath, ValidatedForm},
    AppState,
};

/// Book a field
#[utoipa::path(
    post,
    path = "/api/v1/fields/{field_id}/bookings",
    params(("field_id" = Uuid, Path, description = "Field id")),
    request_body(content = BookingRequest, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 201, description = "Booking created with the caller on its roster", body = BookingDetail),
        (status = 401, description = "Not a user", body = ErrorResponse),
        (status = 404, description = "Field not found", body = ErrorResponse),
        (status = 422, description = "Invalid play dates", body = ErrorResponse)
    ),
    tag = "Bookings",
    security(("bearer_auth" = []))
)]
pub async fn create_booking(
    State(state): State<AppState>,
    ApiPath(field_id): ApiPath<Uuid>,
    caller: Caller,
    ValidatedForm(req): ValidatedForm<BookingRequest>,
) -> Result<impl IntoResponse, AppError> {
    let window = PlayWindow::parse(&req, today())?;
    let booking = state
        .booking_service
        .create(field_id, window, &caller)
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(DataResponse::new("Booking created", booking)),
    ))
}

/// Show a field with its venue and bookings
#[utoipa::path(
    get,
    path = "/api/v1/fields/{field_id}",
    params(("field_id" = Uuid, Path, description = "Field id")),
    responses(
        (status = 200, description = "Field, venue and bookings", body = FieldBookings),
        (status = 404, description = "Field not found", body = ErrorResponse)
    ),
    tag = "Bookings",
    security(("bearer_auth" = []))
)]
pub async fn field_bookings(
    State(state): State<AppState>,
    ApiPath(field_id): ApiPath<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let field = state.booking_service.by_field(field_id).await?;
    Ok(Json(DataResponse::new("Field bookings retrieved", field)))
}

/// List every booking
#[utoipa::path(
    get,
    path = "/api/v1/bookings",
    responses(
        (status = 200, description = "All bookings", body = [Booking]),
        (status = 401, description = "Not a user", body = ErrorResponse)
    ),
    tag = "Bookings",
    security(("bearer_auth" = []))
)]
pub async fn list_bookings(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let bookings = state.booking_service.list().await?;
    Ok(Json(DataResponse::new("Bookings retrieved", bookings)))
}

/// Show a booking with its players
#[utoipa::path(
    get,
    path = "/api/v1/bookings/{booking_id}",
    params(("booking_id" = Uuid, Path, description = "Booking id")),
    responses(
        (status = 200, description = "Booking with roster", body = BookingDetail),
        (status = 404, description = "Booking not found", body = ErrorResponse)
    ),
    tag = "Bookings",
    security(("bearer_auth" = []))
)]
pub async fn show_booking(
    State(state): State<AppState>,
    ApiPath(booking_id): ApiPath<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let booking = state.booking_service.show(booking_id).await?;
    Ok(Json(DataResponse::new("Booking retrieved", booking)))
}

/// Move an owned booking to a new window
#[utoipa::path(
    put,
    path = "/api/v1/bookings/{booking_id}",
    params(("booking_id" = Uuid, Path, description = "Booking id")),
    request_body(content = BookingRequest, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 200, description = "Booking updated", body = Booking),
        (status = 401, description = "Booking belongs to someone else", body = ErrorResponse),
        (status = 404, description = "Booking not found", body = ErrorResponse),
        (status = 422, description = "Invalid play dates", body = ErrorResponse)
    ),
    tag = "Bookings",
    security(("bearer_auth" = []))
)]
pub async fn update_booking(
    State(state): State<AppState>,
    ApiPath(booking_id): ApiPath<Uuid>,
    caller: Caller,
    ValidatedForm(req): ValidatedForm<BookingRequest>,
) -> Result<impl IntoResponse, AppError> {
    let window = PlayWindow::parse(&req, today())?;
    let booking = state
        .booking_service
        .update(booking_id, window, &caller)
        .await?;
    Ok(Json(DataResponse::new("Booking updated", booking)))
}

/// Delete an owned booking
#[utoipa::path(
    delete,
    path = "/api/v1/bookings/{booking_id}",
    params(("booking_id" = Uuid, Path, description = "Booking id")),
    responses(
        (status = 200, description = "Booking deleted", body = MessageResponse),
        (status = 401, description = "Booking belongs to someone else", body = ErrorResponse),
        (status = 404, description = "Booking not found", body = ErrorResponse)
    ),
    tag = "Bookings",
    security(("bearer_auth" = []))
)]
pub async fn delete_booking(
    State(state): State<AppState>,
    ApiPath(booking_id): ApiPath<Uuid>,
    caller: Caller,
) -> Result<impl IntoResponse, AppError> {
    state.booking_service.delete(booking_id, &caller).await?;
    Ok(Json(MessageResponse::new("Booking deleted")))
}

/// Join a booking's roster
#[utoipa::path(
    post,
    path = "/api/v1/bookings/{booking_id}/join",
    params(("booking_id" = Uuid, Path, description = "Booking id")),
    responses(
        (status = 200, description = "Joined; repeated joins change nothing", body = BookingDetail),
        (status = 404, description = "Booking not found", body = ErrorResponse)
    ),
    tag = "Bookings",
    security(("bearer_auth" = []))
)]
pub async fn join_booking(
    State(state): State<AppState>,
    ApiPath(booking_id): ApiPath<Uuid>,
    caller: Caller,
) -> Result<impl IntoResponse, AppError> {
    let booking = state.booking_service.join(booking_id, &caller).await?;
    Ok(Json(DataResponse::new("Joined booking", booking)))
}

/// Leave a booking's roster
#[utoipa::path(
    post,
    path = "/api/v1/bookings/{booking_id}/unjoin",
    params(("booking_id" = Uuid, Path, description = "Booking id")),
    responses(
        (status = 200, description = "Left the roster", body = BookingDetail),
        (status = 404, description = "Booking not found", body = ErrorResponse)
    ),
    tag = "Bookings",
    security(("bearer_auth" = []))
)]
pub async fn unjoin_booking(
    State(state): State<AppState>,
    ApiPath(booking_id): ApiPath<Uuid>,
    caller: Caller,
) -> Result<impl IntoResponse, AppError> {
    let booking = state.booking_service.unjoin(booking_id, &caller).await?;
    Ok(Json(DataResponse::new("Left booking", booking)))
}

/// Bookings the caller plays in
#[utoipa::path(
    get,
    path = "/api/v1/schedules",
    responses(
        (status = 200, description = "Bookings whose roster includes the caller", body = [Booking]),
        (status = 401, description = "Not a user", body = ErrorResponse)
    ),
    tag = "Bookings",
    security(("bearer_auth" = []))
)]
pub async fn schedules(
    State(state): State<AppState>,
    caller: Caller,
) -> Result<impl IntoResponse, AppError> {
    let bookings = state.booking_service.schedules(&caller).await?;
    Ok(Json(DataResponse::new("Schedules retrieved", bookings)))
}
