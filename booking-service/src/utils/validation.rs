use axum::{
    extract::{FromRequest, Request},
    http::header::CONTENT_TYPE,
    Form, Json,
};
use chrono::{Local, NaiveDate, NaiveDateTime};
use serde::de::DeserializeOwned;
use service_core::error::AppError;
use thiserror::Error;
use validator::{Validate, ValidationError};

use crate::models::booking::PLAY_DATE_FORMAT;

/// Request body accepted as `application/json` or, by default, as an
/// urlencoded form, then run through `validator`.
pub struct ValidatedForm<T>(pub T);

#[axum::async_trait]
impl<T, S> FromRequest<S> for ValidatedForm<T>
where
    T: DeserializeOwned + Validate + 'static,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let is_json = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|ct| ct.starts_with("application/json"))
            .unwrap_or(false);

        let value = if is_json {
            let Json(value) = Json::<T>::from_request(req, state)
                .await
                .map_err(|e| AppError::BadRequest(anyhow::anyhow!(e.body_text())))?;
            value
        } else {
            let Form(value) = Form::<T>::from_request(req, state)
                .await
                .map_err(|e| AppError::BadRequest(anyhow::anyhow!(e.body_text())))?;
            value
        };

        value.validate()?;

        Ok(ValidatedForm(value))
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PlayDateError {
    #[error("must use the format yyyy-MM-dd HH:mm:ss")]
    Format,
    #[error("must fall after today")]
    NotAfterToday,
}

/// Parse a play date and require its calendar day to be strictly after
/// `today`. Times on the current day are rejected regardless of the hour.
pub fn parse_play_date(raw: &str, today: NaiveDate) -> Result<NaiveDateTime, PlayDateError> {
    let parsed = NaiveDateTime::parse_from_str(raw.trim(), PLAY_DATE_FORMAT)
        .map_err(|_| PlayDateError::Format)?;

    if parsed.date() <= today {
        return Err(PlayDateError::NotAfterToday);
    }

    Ok(parsed)
}

pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

pub fn validate_play_date(value: &str) -> Result<(), ValidationError> {
    parse_play_date(value, today()).map(|_| ()).map_err(|e| {
        let code = match e {
            PlayDateError::Format => "play_date_format",
            PlayDateError::NotAfterToday => "play_date_after_today",
        };
        ValidationError::new(code).with_message(e.to_string().into())
    })
}

pub fn validate_field_type(value: &str) -> Result<(), ValidationError> {
    match crate::models::FieldType::parse(value) {
        Some(_) => Ok(()),
        None => Err(ValidationError::new("field_type").with_message(
            "must be one of soccer, futsal, mini soccer, basketball, volleyball".into(),
        )),
    }
}

pub fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("required").with_message("is required".into()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, http::StatusCode, response::IntoResponse, routing::post, Router};
    use serde::Deserialize;
    use tower::ServiceExt;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn accepts_tomorrow_at_midnight() {
        let parsed = parse_play_date("2030-05-02 00:00:00", day(2030, 5, 1)).unwrap();
        assert_eq!(parsed.date(), day(2030, 5, 2));
    }

    #[test]
    fn rejects_later_today() {
        assert_eq!(
            parse_play_date("2030-05-01 23:59:59", day(2030, 5, 1)),
            Err(PlayDateError::NotAfterToday)
        );
    }

    #[test]
    fn rejects_other_formats() {
        let today = day(2030, 5, 1);
        assert_eq!(
            parse_play_date("2030-05-02T10:00:00", today),
            Err(PlayDateError::Format)
        );
        assert_eq!(parse_play_date("2030-05-02", today), Err(PlayDateError::Format));
        assert_eq!(
            parse_play_date("02-05-2030 10:00:00", today),
            Err(PlayDateError::Format)
        );
    }

    #[test]
    fn field_type_must_be_known() {
        assert!(validate_field_type("mini soccer").is_ok());
        assert!(validate_field_type("Mini Soccer").is_err());
        assert!(validate_field_type("tennis").is_err());
    }

    #[derive(Deserialize, Validate)]
    struct Sample {
        #[serde(default)]
        #[validate(custom(function = "validate_not_blank"))]
        name: String,
    }

    async fn echo(ValidatedForm(sample): ValidatedForm<Sample>) -> impl IntoResponse {
        sample.name
    }

    fn app() -> Router {
        Router::new().route("/", post(echo))
    }

    #[tokio::test]
    async fn accepts_urlencoded_and_json_bodies() {
        let form = app()
            .oneshot(
                axum::http::Request::builder()
                    .method("POST")
                    .uri("/")
                    .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
                    .body(Body::from("name=Arena"))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(form.status(), StatusCode::OK);

        let json = app()
            .oneshot(
                axum::http::Request::builder()
                    .method("POST")
                    .uri("/")
                    .header(CONTENT_TYPE, "application/json")
                    .body(Body::from(r#"{"name":"Arena"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(json.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn missing_field_is_unprocessable() {
        let res = app()
            .oneshot(
                axum::http::Request::builder()
                    .method("POST")
                    .uri("/")
                    .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
                    .body(Body::from("other=1"))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }
}
