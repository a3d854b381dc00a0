use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use super::{booking::Booking, field::FieldType};

#[derive(Debug, Clone, FromRow, Serialize, ToSchema)]
pub struct Venue {
    pub venue_id: Uuid,
    pub name: String,
    pub address: String,
    pub phone: String,
    pub created_utc: DateTime<Utc>,
    pub updated_utc: DateTime<Utc>,
}

/// A field as listed under its venue, with the bookings of the viewed day.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct VenueField {
    pub field_id: Uuid,
    pub name: String,
    pub field_type: FieldType,
    pub bookings: Vec<Booking>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct VenueDetail {
    #[serde(flatten)]
    pub venue: Venue,
    pub fields: Vec<VenueField>,
}
