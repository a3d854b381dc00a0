use chrono::NaiveDate;
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::utils::validation::{validate_field_type, validate_not_blank};

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct VenueRequest {
    #[serde(default)]
    #[validate(custom(function = "validate_not_blank"))]
    #[schema(example = "Gelora Arena")]
    pub name: String,

    #[serde(default)]
    #[validate(custom(function = "validate_not_blank"))]
    #[schema(example = "Jl. Sudirman 10, Jakarta")]
    pub address: String,

    #[serde(default)]
    #[validate(custom(function = "validate_not_blank"))]
    #[schema(example = "0812345678")]
    pub phone: String,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct VenueListQuery {
    /// Exact venue name
    pub name: Option<String>,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct VenueShowQuery {
    /// Day whose bookings are listed per field, `YYYY-MM-DD`; defaults to today
    #[param(value_type = Option<String>, example = "2030-01-01")]
    pub date: Option<NaiveDate>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct FieldRequest {
    #[serde(default)]
    #[validate(custom(function = "validate_not_blank"))]
    #[schema(example = "Court A")]
    pub name: String,

    #[serde(default, rename = "type")]
    #[validate(custom(function = "validate_field_type"))]
    #[schema(example = "futsal")]
    pub field_type: String,
}
