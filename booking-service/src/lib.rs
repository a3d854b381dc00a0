pub mod config;
pub mod db;
pub mod dtos;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;
pub mod utils;

use axum::{
    extract::State,
    http::{header, HeaderValue, Method},
    middleware::{from_fn, from_fn_with_state},
    routing::{get, post},
    Json, Router,
};
use metrics_exporter_prometheus::PrometheusHandle;
use service_core::middleware::{
    metrics::metrics_middleware,
    rate_limit::{create_ip_rate_limiter, ip_rate_limit_middleware, IpRateLimiter},
    security_headers::security_headers_middleware,
    tracing::request_id_middleware,
};
use sqlx::PgPool;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;

use crate::config::{BookingConfig, SwaggerMode};
use crate::middleware::{acl, auth_middleware, require_roles};
use crate::services::{AuthService, BookingService, CatalogService, EmailProvider};
use service_core::error::AppError;

#[derive(OpenApi)]
#[openapi(
    paths(
        health_check,
        handlers::auth::register,
        handlers::auth::login,
        handlers::auth::verify_otp,
        handlers::auth::resend_otp,
        handlers::auth::logout,
        handlers::venue::list_venues,
        handlers::venue::create_venue,
        handlers::venue::show_venue,
        handlers::venue::update_venue,
        handlers::venue::delete_venue,
        handlers::field::list_fields,
        handlers::field::create_field,
        handlers::field::show_field,
        handlers::field::update_field,
        handlers::field::delete_field,
        handlers::booking::create_booking,
        handlers::booking::field_bookings,
        handlers::booking::list_bookings,
        handlers::booking::show_booking,
        handlers::booking::update_booking,
        handlers::booking::delete_booking,
        handlers::booking::join_booking,
        handlers::booking::unjoin_booking,
        handlers::booking::schedules,
    ),
    components(
        schemas(
            dtos::ErrorResponse,
            dtos::MessageResponse,
            dtos::auth::RegisterRequest,
            dtos::auth::LoginRequest,
            dtos::auth::LoginResponse,
            dtos::auth::VerifyOtpRequest,
            dtos::auth::ResendOtpRequest,
            dtos::catalog::VenueRequest,
            dtos::catalog::FieldRequest,
            dtos::booking::BookingRequest,
            models::Role,
            models::SanitizedUser,
            models::Venue,
            models::VenueDetail,
            models::VenueField,
            models::Field,
            models::FieldType,
            models::FieldWithVenue,
            models::Booking,
            models::BookingDetail,
            models::Player,
            models::FieldBookings,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Authentication", description = "Registration, OTP verification and sessions"),
        (name = "Venues", description = "Venue management for owners"),
        (name = "Fields", description = "Field management for owners"),
        (name = "Bookings", description = "Bookings and rosters for users"),
        (name = "Observability", description = "Service health and monitoring"),
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(HttpBuilder::new().scheme(HttpAuthScheme::Bearer).build()),
            );
        }
    }
}

#[derive(Clone)]
pub struct AppState {
    pub config: BookingConfig,
    pub pool: PgPool,
    pub email: Arc<dyn EmailProvider>,
    pub auth_service: AuthService,
    pub catalog_service: CatalogService,
    pub booking_service: BookingService,
    pub metrics: PrometheusHandle,
    pub login_rate_limiter: IpRateLimiter,
    pub register_rate_limiter: IpRateLimiter,
    pub otp_rate_limiter: IpRateLimiter,
    pub ip_rate_limiter: IpRateLimiter,
}

impl AppState {
    pub fn new(
        config: BookingConfig,
        pool: PgPool,
        email: Arc<dyn EmailProvider>,
        metrics: PrometheusHandle,
    ) -> Self {
        let limits = &config.rate_limit;
        let trust = config.security.trust_forwarded_for;
        let login_rate_limiter =
            create_ip_rate_limiter(limits.login_attempts, limits.login_window_seconds, trust);
        let register_rate_limiter = create_ip_rate_limiter(
            limits.register_attempts,
            limits.register_window_seconds,
            trust,
        );
        let otp_rate_limiter =
            create_ip_rate_limiter(limits.otp_attempts, limits.otp_window_seconds, trust);
        let ip_rate_limiter = create_ip_rate_limiter(
            limits.global_ip_limit,
            limits.global_ip_window_seconds,
            trust,
        );

        let auth_service = AuthService::new(pool.clone(), email.clone(), config.auth.clone());
        let catalog_service = CatalogService::new(pool.clone());
        let booking_service = BookingService::new(pool.clone());

        Self {
            config,
            pool,
            email,
            auth_service,
            catalog_service,
            booking_service,
            metrics,
            login_rate_limiter,
            register_rate_limiter,
            otp_rate_limiter,
            ip_rate_limiter,
        }
    }
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let origins = origins
        .iter()
        .filter_map(|o| match o.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::error!("Invalid CORS origin '{}': {}. Skipping.", o, e);
                None
            }
        })
        .collect::<Vec<HeaderValue>>();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
}

/// Routes under `/api/v1`.
fn api_routes(state: &AppState) -> Router<AppState> {
    let login_route = Router::new()
        .route("/login", post(handlers::auth::login))
        .layer(from_fn_with_state(
            state.login_rate_limiter.clone(),
            ip_rate_limit_middleware,
        ));

    let register_route = Router::new()
        .route("/register", post(handlers::auth::register))
        .layer(from_fn_with_state(
            state.register_rate_limiter.clone(),
            ip_rate_limit_middleware,
        ));

    let otp_route = Router::new()
        .route("/otp-verification", post(handlers::auth::verify_otp))
        .route("/otp-resend", post(handlers::auth::resend_otp))
        .layer(from_fn_with_state(
            state.otp_rate_limiter.clone(),
            ip_rate_limit_middleware,
        ));

    let session_routes = Router::new()
        .route("/logout", post(handlers::auth::logout))
        .route_layer(from_fn_with_state(state.clone(), auth_middleware));

    // Layers run last-added first: authenticate, then check the role.
    let owner_routes = Router::new()
        .route(
            "/venues",
            get(handlers::venue::list_venues).post(handlers::venue::create_venue),
        )
        .route(
            "/venues/:venue_id",
            get(handlers::venue::show_venue)
                .put(handlers::venue::update_venue)
                .delete(handlers::venue::delete_venue),
        )
        .route(
            "/venues/:venue_id/fields",
            get(handlers::field::list_fields).post(handlers::field::create_field),
        )
        .route(
            "/venues/:venue_id/fields/:field_id",
            get(handlers::field::show_field)
                .put(handlers::field::update_field)
                .delete(handlers::field::delete_field),
        )
        .route_layer(from_fn_with_state(acl::OWNERS, require_roles))
        .route_layer(from_fn_with_state(state.clone(), auth_middleware));

    let user_routes = Router::new()
        .route(
            "/fields/:field_id/bookings",
            post(handlers::booking::create_booking),
        )
        .route("/fields/:field_id", get(handlers::booking::field_bookings))
        .route("/bookings", get(handlers::booking::list_bookings))
        .route(
            "/bookings/:booking_id",
            get(handlers::booking::show_booking)
                .put(handlers::booking::update_booking)
                .delete(handlers::booking::delete_booking),
        )
        .route(
            "/bookings/:booking_id/join",
            post(handlers::booking::join_booking),
        )
        .route(
            "/bookings/:booking_id/unjoin",
            post(handlers::booking::unjoin_booking),
        )
        .route("/schedules", get(handlers::booking::schedules))
        .route_layer(from_fn_with_state(acl::USERS, require_roles))
        .route_layer(from_fn_with_state(state.clone(), auth_middleware));

    Router::new()
        .merge(login_route)
        .merge(register_route)
        .merge(otp_route)
        .merge(session_routes)
        .merge(owner_routes)
        .merge(user_routes)
}

pub fn build_router(state: AppState) -> Router {
    let mut app = Router::new()
        .route("/health", get(health_check))
        .route("/metrics", get(handlers::metrics::metrics));

    if state.config.swagger.enabled == SwaggerMode::Public {
        app = app.merge(SwaggerUi::new("/docs").url("/.well-known/openapi.json", ApiDoc::openapi()));
    } else {
        // Keep the document available for programmatic clients.
        app = app.route(
            "/.well-known/openapi.json",
            get(|| async { Json(ApiDoc::openapi()) }),
        );
    }

    let ip_limiter = state.ip_rate_limiter.clone();
    let cors = cors_layer(&state.config.security.allowed_origins);

    app.nest("/api/v1", api_routes(&state))
        .with_state(state)
        .layer(from_fn_with_state(ip_limiter, ip_rate_limit_middleware))
        .layer(from_fn(metrics_middleware))
        .layer(TraceLayer::new_for_http().make_span_with(
            |request: &axum::http::Request<_>| {
                let request_id = request
                    .headers()
                    .get("x-request-id")
                    .and_then(|value| value.to_str().ok())
                    .unwrap_or("-");

                tracing::info_span!(
                    "http_request",
                    request_id = %request_id,
                    method = %request.method(),
                    uri = %request.uri(),
                    version = ?request.version(),
                )
            },
        ))
        .layer(from_fn(request_id_middleware))
        .layer(from_fn(security_headers_middleware))
        .layer(cors)
}

/// Service health check
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service is healthy"),
        (status = 503, description = "Database is unreachable", body = dtos::ErrorResponse)
    ),
    tag = "Observability"
)]
pub async fn health_check(State(state): State<AppState>) -> Result<Json<serde_json::Value>, AppError> {
    db::health_check(&state.pool).await.map_err(|e| {
        tracing::error!(error = %e, "PostgreSQL health check failed");
        AppError::ServiceUnavailable
    })?;

    Ok(Json(serde_json::json!({
        "status": "healthy",
        "service": state.config.service_name,
        "version": state.config.service_version,
        "environment": format!("{:?}", state.config.environment),
        "checks": {
            "postgres": "up"
        }
    })))
}
