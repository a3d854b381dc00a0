use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use service_core::error::AppError;
use uuid::Uuid;

use crate::{
    dtos::{
        catalog::{VenueListQuery, VenueRequest, VenueShowQuery},
        DataResponse, ErrorResponse, MessageResponse,
    },
    models::{Venue, VenueDetail},
    utils::{validation::today, ApiPath, ApiQuery, ValidatedForm},
    AppState,
};

/// List venues
#[utoipa::path(
    get,
    path = "/api/v1/venues",
    params(VenueListQuery),
    responses(
        (status = 200, description = "Venues, narrowed by exact name when given", body = [Venue]),
        (status = 401, description = "Not an owner", body = ErrorResponse)
    ),
    tag = "Venues",
    security(("bearer_auth" = []))
)]
pub async fn list_venues(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<VenueListQuery>,
) -> Result<impl IntoResponse, AppError> {
    let venues = state
        .catalog_service
        .list_venues(query.name.as_deref())
        .await?;
    Ok(Json(DataResponse::new("Venues retrieved", venues)))
}

/// Create a venue
#[utoipa::path(
    post,
    path = "/api/v1/venues",
    request_body(content = VenueRequest, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 201, description = "Venue created", body = Venue),
        (status = 401, description = "Not an owner", body = ErrorResponse),
        (status = 422, description = "Validation error", body = ErrorResponse)
    ),
    tag = "Venues",
    security(("bearer_auth" = []))
)]
pub async fn create_venue(
    State(state): State<AppState>,
    ValidatedForm(req): ValidatedForm<VenueRequest>,
) -> Result<impl IntoResponse, AppError> {
    let venue = state.catalog_service.create_venue(req).await?;
    Ok((
        StatusCode::CREATED,
        Json(DataResponse::new("Venue created", venue)),
    ))
}

/// Show a venue with its fields and the bookings of one day
#[utoipa::path(
    get,
    path = "/api/v1/venues/{venue_id}",
    params(("venue_id" = Uuid, Path, description = "Venue id"), VenueShowQuery),
    responses(
        (status = 200, description = "Venue detail", body = VenueDetail),
        (status = 404, description = "Venue not found", body = ErrorResponse)
    ),
    tag = "Venues",
    security(("bearer_auth" = []))
)]
pub async fn show_venue(
    State(state): State<AppState>,
    ApiPath(venue_id): ApiPath<Uuid>,
    ApiQuery(query): ApiQuery<VenueShowQuery>,
) -> Result<impl IntoResponse, AppError> {
    let day = query.date.unwrap_or_else(today);
    let venue = state.catalog_service.get_venue(venue_id, day).await?;
    Ok(Json(DataResponse::new("Venue retrieved", venue)))
}

/// Replace a venue's details
#[utoipa::path(
    put,
    path = "/api/v1/venues/{venue_id}",
    params(("venue_id" = Uuid, Path, description = "Venue id")),
    request_body(content = VenueRequest, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 200, description = "Venue updated", body = Venue),
        (status = 404, description = "Venue not found", body = ErrorResponse),
        (status = 422, description = "Validation error", body = ErrorResponse)
    ),
    tag = "Venues",
    security(("bearer_auth" = []))
)]
pub async fn update_venue(
    State(state): State<AppState>,
    ApiPath(venue_id): ApiPath<Uuid>,
    ValidatedForm(req): ValidatedForm<VenueRequest>,
) -> Result<impl IntoResponse, AppError> {
    let venue = state.catalog_service.update_venue(venue_id, req).await?;
    Ok(Json(DataResponse::new("Venue updated", venue)))
}

/// Delete a venue with its fields and their bookings
#[utoipa::path(
    delete,
    path = "/api/v1/venues/{venue_id}",
    params(("venue_id" = Uuid, Path, description = "Venue id")),
    responses(
        (status = 200, description = "Venue deleted", body = MessageResponse),
        (status = 404, description = "Venue not found", body = ErrorResponse)
    ),
    tag = "Venues",
    security(("bearer_auth" = []))
)]
pub async fn delete_venue(
    State(state): State<AppState>,
    ApiPath(venue_id): ApiPath<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    state.catalog_service.delete_venue(venue_id).await?;
    Ok(Json(MessageResponse::new("Venue deleted")))
}
