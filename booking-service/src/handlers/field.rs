use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use service_core::error::AppError;
use uuid::Uuid;

use crate::{
    dtos::{catalog::FieldRequest, DataResponse, ErrorResponse, MessageResponse},
    models::{Field, FieldWithVenue},
    utils::{ApiPath, ValidatedForm},
    AppState,
};

/// List the fields of a venue
#[utoipa::path(
    get,
    path = "/api/v1/venues/{venue_id}/fields",
    params(("venue_id" = Uuid, Path, description = "Venue id")),
    responses(
        (status = 200, description = "Fields with their venue name", body = [FieldWithVenue]),
        (status = 404, description = "Venue not found", body = ErrorResponse)
    ),
    tag = "Fields",
    security(("bearer_auth" = []))
)]
pub async fn list_fields(
    State(state): State<AppState>,
    ApiPath(venue_id): ApiPath<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let fields = state.catalog_service.list_fields(venue_id).await?;
    Ok(Json(DataResponse::new("Fields retrieved", fields)))
}

/// Add a field to a venue
#[utoipa::path(
    post,
    path = "/api/v1/venues/{venue_id}/fields",
    params(("venue_id" = Uuid, Path, description = "Venue id")),
    request_body(content = FieldRequest, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 201, description = "Field created", body = Field),
        (status = 404, description = "Venue not found", body = ErrorResponse),
        (status = 422, description = "Validation error", body = ErrorResponse)
    ),
    tag = "Fields",
    security(("bearer_auth" = []))
)]
pub async fn create_field(
    State(state): State<AppState>,
    ApiPath(venue_id): ApiPath<Uuid>,
    ValidatedForm(req): ValidatedForm<FieldRequest>,
) -> Result<impl IntoResponse, AppError> {
    let field = state.catalog_service.create_field(venue_id, req).await?;
    Ok((
        StatusCode::CREATED,
        Json(DataResponse::new("Field created", field)),
    ))
}

/// Show a field of a venue
#[utoipa::path(
    get,
    path = "/api/v1/venues/{venue_id}/fields/{field_id}",
    params(
        ("venue_id" = Uuid, Path, description = "Venue id"),
        ("field_id" = Uuid, Path, description = "Field id")
    ),
    responses(
        (status = 200, description = "Field with its venue name", body = FieldWithVenue),
        (status = 404, description = "Field not found in this venue", body = ErrorResponse)
    ),
    tag = "Fields",
    security(("bearer_auth" = []))
)]
pub async fn show_field(
    State(state): State<AppState>,
    ApiPath((venue_id, field_id)): ApiPath<(Uuid, Uuid)>,
) -> Result<impl IntoResponse, AppError> {
    let field = state.catalog_service.get_field(venue_id, field_id).await?;
    Ok(Json(DataResponse::new("Field retrieved", field)))
}

/// Replace a field's name and type
#[utoipa::path(
    put,
    path = "/api/v1/venues/{venue_id}/fields/{field_id}",
    params(
        ("venue_id" = Uuid, Path, description = "Venue id"),
        ("field_id" = Uuid, Path, description = "Field id")
    ),
    request_body(content = FieldRequest, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 200, description = "Field updated", body = Field),
        (status = 404, description = "Field not found in this venue", body = ErrorResponse),
        (status = 422, description = "Validation error", body = ErrorResponse)
    ),
    tag = "Fields",
    security(("bearer_auth" = []))
)]
pub async fn update_field(
    State(state): State<AppState>,
    ApiPath((venue_id, field_id)): ApiPath<(Uuid, Uuid)>,
    ValidatedForm(req): ValidatedForm<FieldRequest>,
) -> Result<impl IntoResponse, AppError> {
    let field = state
        .catalog_service
        .update_field(venue_id, field_id, req)
        .await?;
    Ok(Json(DataResponse::new("Field updated", field)))
}

/// Delete a field and its bookings
#[utoipa::path(
    delete,
    path = "/api/v1/venues/{venue_id}/fields/{field_id}",
    params(
        ("venue_id" = Uuid, Path, description = "Venue id"),
        ("field_id" = Uuid, Path, description = "Field id")
    ),
    responses(
        (status = 200, description = "Field deleted", body = MessageResponse),
        (status = 404, description = "Field not found in this venue", body = ErrorResponse)
    ),
    tag = "Fields",
    security(("bearer_auth" = []))
)]
pub async fn delete_field(
    State(state): State<AppState>,
    ApiPath((venue_id, field_id)): ApiPath<(Uuid, Uuid)>,
) -> Result<impl IntoResponse, AppError> {
    state
        .catalog_service
        .delete_field(venue_id, field_id)
        .await?;
    Ok(Json(MessageResponse::new("Field deleted")))
}
