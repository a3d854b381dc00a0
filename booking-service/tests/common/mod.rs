//! Shared helpers for booking-service integration tests.
//!
//! Router tests run against a lazy pool that never connects. Scenario tests
//! need `TEST_DATABASE_URL` and are `#[ignore]`d by default.

#![allow(dead_code)]

use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    Router,
};
use booking_service::{
    build_router,
    config::BookingConfig,
    db,
    services::MockEmailService,
    AppState,
};
use secrecy::Secret;
use serde_json::Value;
use service_core::observability::metrics::detached_handle;
use sqlx::PgPool;
use std::sync::{Arc, Once};
use tower::ServiceExt;
use uuid::Uuid;

static INIT: Once = Once::new();

pub fn init_tracing() {
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter("info,booking_service=debug,sqlx=warn")
            .with_test_writer()
            .try_init()
            .ok();
    });
}

pub struct TestApp {
    pub router: Router,
    pub state: AppState,
    pub mailer: MockEmailService,
}

impl TestApp {
    pub fn with_state(state: AppState, mailer: MockEmailService) -> Self {
        Self {
            router: build_router(state.clone()),
            state,
            mailer,
        }
    }

    pub async fn request(&self, req: Request<Body>) -> (StatusCode, Value) {
        let res = self.router.clone().oneshot(req).await.unwrap();
        let status = res.status();
        let bytes = to_bytes(res.into_body(), usize::MAX).await.unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, body)
    }

    pub async fn post_form(&self, uri: &str, body: &str, token: Option<&str>) -> (StatusCode, Value) {
        self.request(form_request("POST", uri, body, token)).await
    }

    pub async fn put_form(&self, uri: &str, body: &str, token: &str) -> (StatusCode, Value) {
        self.request(form_request("PUT", uri, body, Some(token))).await
    }

    pub async fn get(&self, uri: &str, token: &str) -> (StatusCode, Value) {
        self.request(bearer_request("GET", uri, token)).await
    }

    pub async fn delete(&self, uri: &str, token: &str) -> (StatusCode, Value) {
        self.request(bearer_request("DELETE", uri, token)).await
    }

    /// Register, verify with the mailed code, and log in. Returns the token.
    pub async fn signed_in_user(&self, name: &str) -> (String, String) {
        let email = unique_email(name);
        let (status, _) = self
            .post_form(
                "/api/v1/register",
                &format!("name={}&email={}&password=secret123", name, email),
                None,
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);

        let code = self.mailer.last_code_for(&email).expect("otp was mailed");
        let (status, _) = self
            .post_form(
                "/api/v1/otp-verification",
                &format!("email={}&otp_code={}", email, code),
                None,
            )
            .await;
        assert_eq!(status, StatusCode::OK);

        let token = self.login(&email, "secret123").await;
        (token, email)
    }

    /// Same as `signed_in_user`, promoted to venue owner before logging in.
    pub async fn signed_in_owner(&self, name: &str) -> String {
        let (_, email) = self.signed_in_user(name).await;
        sqlx::query("UPDATE users SET role_code = 'owner' WHERE LOWER(email) = LOWER($1)")
            .bind(&email)
            .execute(&self.state.pool)
            .await
            .unwrap();
        self.login(&email, "secret123").await
    }

    pub async fn login(&self, email: &str, password: &str) -> String {
        let (status, body) = self
            .post_form(
                "/api/v1/login",
                &format!("email={}&password={}", email, password),
                None,
            )
            .await;
        assert_eq!(status, StatusCode::OK, "login failed: {}", body);
        body["token"].as_str().unwrap().to_string()
    }
}

pub fn form_request(method: &str, uri: &str, body: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("x-forwarded-for", "203.0.113.10")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

pub fn bearer_request(method: &str, uri: &str, token: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("x-forwarded-for", "203.0.113.10")
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap()
}

pub fn unique_email(prefix: &str) -> String {
    format!("{}-{}@example.com", prefix.to_lowercase(), Uuid::new_v4().simple())
}

/// App backed by a pool that never connects; only routes that fail before
/// touching the database are meaningful.
pub fn offline_app(config: BookingConfig) -> TestApp {
    init_tracing();
    let pool = db::create_lazy_pool(&config.database).unwrap();
    let mailer = MockEmailService::new();
    let state = AppState::new(config, pool, Arc::new(mailer.clone()), detached_handle());
    TestApp::with_state(state, mailer)
}

async fn test_pool(config: &mut BookingConfig) -> PgPool {
    let database_url = std::env::var("TEST_DATABASE_URL")
        .expect("TEST_DATABASE_URL must be set to run database tests");
    config.database.url = Secret::new(database_url);
    config.database.min_connections = 0;

    let pool = db::create_pool(&config.database)
        .await
        .expect("Failed to connect to test database");
    db::run_migrations(&pool)
        .await
        .expect("Failed to run migrations");
    pool
}

/// Relaxed rate limits so a scenario can make many calls from one address.
pub fn scenario_config() -> BookingConfig {
    let mut config = BookingConfig::development();
    config.rate_limit.login_attempts = 1000;
    config.rate_limit.register_attempts = 1000;
    config.rate_limit.otp_attempts = 1000;
    config.rate_limit.global_ip_limit = 10_000;
    config
}

pub async fn spawn_app() -> TestApp {
    spawn_app_with(scenario_config(), MockEmailService::new()).await
}

pub async fn spawn_app_with(mut config: BookingConfig, mailer: MockEmailService) -> TestApp {
    init_tracing();
    let pool = test_pool(&mut config).await;
    let state = AppState::new(config, pool, Arc::new(mailer.clone()), detached_handle());
    TestApp::with_state(state, mailer)
}
