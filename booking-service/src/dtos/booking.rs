use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

use crate::utils::validation::validate_play_date;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct BookingRequest {
    #[serde(default)]
    #[validate(custom(function = "validate_play_date"))]
    #[schema(example = "2030-01-01 19:00:00")]
    pub play_date_start: String,

    #[serde(default)]
    #[validate(custom(function = "validate_play_date"))]
    #[schema(example = "2030-01-01 21:00:00")]
    pub play_date_end: String,
}
