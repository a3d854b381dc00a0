use chrono::{DateTime, NaiveDateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use super::field::FieldType;

/// Wall-clock format used for play dates on the wire.
pub const PLAY_DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

mod play_date {
    use super::PLAY_DATE_FORMAT;
    use chrono::NaiveDateTime;
    use serde::Serializer;

    pub fn serialize<S: Serializer>(value: &NaiveDateTime, s: S) -> Result<S::Ok, S::Error> {
        s.collect_str(&value.format(PLAY_DATE_FORMAT))
    }
}

#[derive(Debug, Clone, FromRow, Serialize, ToSchema)]
pub struct Booking {
    pub booking_id: Uuid,
    pub field_id: Uuid,
    pub booking_user_id: Uuid,
    #[serde(with = "play_date")]
    #[schema(value_type = String, example = "2030-01-01 19:00:00")]
    pub play_date_start: NaiveDateTime,
    #[serde(with = "play_date")]
    #[schema(value_type = String, example = "2030-01-01 21:00:00")]
    pub play_date_end: NaiveDateTime,
    pub created_utc: DateTime<Utc>,
    pub updated_utc: DateTime<Utc>,
}

/// Roster member as shown on a booking.
#[derive(Debug, Clone, FromRow, Serialize, ToSchema)]
pub struct Player {
    pub user_id: Uuid,
    pub name: String,
    pub email: String,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct BookingDetail {
    #[serde(flatten)]
    pub booking: Booking,
    pub players_count: usize,
    pub players: Vec<Player>,
}

impl BookingDetail {
    pub fn new(booking: Booking, players: Vec<Player>) -> Self {
        Self {
            booking,
            players_count: players.len(),
            players,
        }
    }
}

/// A field with its venue and every booking made against it.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct FieldBookings {
    pub field_id: Uuid,
    pub name: String,
    pub field_type: FieldType,
    pub venue_id: Uuid,
    pub venue_name: String,
    pub venue_address: String,
    pub venue_phone: String,
    pub bookings: Vec<Booking>,
}
