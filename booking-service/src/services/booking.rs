//! Bookings against fields and the rosters of users sharing them.

use chrono::{NaiveDate, NaiveDateTime};
use sqlx::{PgPool, Postgres, Transaction};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::dtos::booking::BookingRequest;
use crate::models::{Booking, BookingDetail, Caller, FieldBookings, FieldType, Player};
use crate::services::error::ServiceError;
use crate::services::{metrics, policy};
use crate::utils::parse_play_date;

const BOOKING_COLUMNS: &str =
    "booking_id, field_id, booking_user_id, play_date_start, play_date_end, created_utc, updated_utc";

/// Validated start and end of a booking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlayWindow {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl PlayWindow {
    /// Both ends must fall on a day after `today`, and the window must not
    /// be empty. Overlap with other bookings is not checked.
    pub fn parse(req: &BookingRequest, today: NaiveDate) -> Result<Self, ServiceError> {
        let start = parse_play_date(&req.play_date_start, today)
            .map_err(|e| ServiceError::InvalidPlayWindow(format!("play_date_start {}", e)))?;
        let end = parse_play_date(&req.play_date_end, today)
            .map_err(|e| ServiceError::InvalidPlayWindow(format!("play_date_end {}", e)))?;

        if end <= start {
            return Err(ServiceError::InvalidPlayWindow(
                "play_date_end must be after play_date_start".to_string(),
            ));
        }

        Ok(Self { start, end })
    }
}

#[derive(sqlx::FromRow)]
struct FieldVenueRow {
    field_id: Uuid,
    name: String,
    field_type: String,
    venue_id: Uuid,
    venue_name: String,
    venue_address: String,
    venue_phone: String,
}

#[derive(Clone)]
pub struct BookingService {
    pool: PgPool,
}

impl BookingService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Every booking, past ones included.
    #[instrument(skip(self))]
    pub async fn list(&self) -> Result<Vec<Booking>, ServiceError> {
        let bookings = sqlx::query_as::<_, Booking>(&format!(
            "SELECT {BOOKING_COLUMNS} FROM bookings ORDER BY play_date_start, booking_id"
        ))
        .fetch_all(&self.pool)
        .await?;
        Ok(bookings)
    }

    /// Bookings whose roster includes the caller.
    #[instrument(skip(self, caller), fields(user_id = %caller.user_id))]
    pub async fn schedules(&self, caller: &Caller) -> Result<Vec<Booking>, ServiceError> {
        let bookings = sqlx::query_as::<_, Booking>(
            r#"
            SELECT b.booking_id, b.field_id, b.booking_user_id, b.play_date_start, b.play_date_end,
                   b.created_utc, b.updated_utc
            FROM bookings b
            JOIN booking_user bu ON bu.booking_id = b.booking_id
            WHERE bu.user_id = $1
            ORDER BY b.play_date_start, b.booking_id
            "#,
        )
        .bind(caller.user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(bookings)
    }

    /// Book a field; the caller owns the booking and is its first player.
    #[instrument(skip(self, caller), fields(user_id = %caller.user_id))]
    pub async fn create(
        &self,
        field_id: Uuid,
        window: PlayWindow,
        caller: &Caller,
    ) -> Result<BookingDetail, ServiceError> {
        let mut tx = self.pool.begin().await?;

        let field_exists = sqlx::query_scalar::<_, Uuid>("SELECT field_id FROM fields WHERE field_id = $1")
            .bind(field_id)
            .fetch_optional(&mut *tx)
            .await?
            .is_some();
        if !field_exists {
            return Err(ServiceError::FieldNotFound);
        }

        let booking = sqlx::query_as::<_, Booking>(&format!(
            r#"
            INSERT INTO bookings (booking_id, field_id, booking_user_id, play_date_start, play_date_end)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {BOOKING_COLUMNS}
            "#
        ))
        .bind(Uuid::new_v4())
        .bind(field_id)
        .bind(caller.user_id)
        .bind(window.start)
        .bind(window.end)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query("INSERT INTO booking_user (booking_id, user_id) VALUES ($1, $2)")
            .bind(booking.booking_id)
            .bind(caller.user_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        metrics::record_booking_created();
        info!(booking_id = %booking.booking_id, field_id = %field_id, "Booking created");

        let player = Player {
            user_id: caller.user_id,
            name: caller.name.clone(),
            email: caller.email.clone(),
        };
        Ok(BookingDetail::new(booking, vec![player]))
    }

    /// Lock the booking row and check the caller owns it.
    async fn lock_owned(
        tx: &mut Transaction<'_, Postgres>,
        booking_id: Uuid,
        caller: &Caller,
    ) -> Result<Booking, ServiceError> {
        let booking = sqlx::query_as::<_, Booking>(&format!(
            "SELECT {BOOKING_COLUMNS} FROM bookings WHERE booking_id = $1 FOR UPDATE"
        ))
        .bind(booking_id)
        .fetch_optional(&mut **tx)
        .await?
        .ok_or(ServiceError::BookingNotFound)?;

        if !policy::is_owner(caller, booking.booking_user_id) {
            return Err(ServiceError::NotBookingOwner);
        }

        Ok(booking)
    }

    #[instrument(skip(self, caller), fields(user_id = %caller.user_id))]
    pub async fn update(
        &self,
        booking_id: Uuid,
        window: PlayWindow,
        caller: &Caller,
    ) -> Result<Booking, ServiceError> {
        let mut tx = self.pool.begin().await?;
        Self::lock_owned(&mut tx, booking_id, caller).await?;

        let booking = sqlx::query_as::<_, Booking>(&format!(
            r#"
            UPDATE bookings
            SET play_date_start = $2, play_date_end = $3, updated_utc = NOW()
            WHERE booking_id = $1
            RETURNING {BOOKING_COLUMNS}
            "#
        ))
        .bind(booking_id)
        .bind(window.start)
        .bind(window.end)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        info!(booking_id = %booking_id, "Booking updated");
        Ok(booking)
    }

    /// Delete an owned booking; its roster goes with it.
    #[instrument(skip(self, caller), fields(user_id = %caller.user_id))]
    pub async fn delete(&self, booking_id: Uuid, caller: &Caller) -> Result<(), ServiceError> {
        let mut tx = self.pool.begin().await?;
        Self::lock_owned(&mut tx, booking_id, caller).await?;

        sqlx::query("DELETE FROM bookings WHERE booking_id = $1")
            .bind(booking_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        info!(booking_id = %booking_id, "Booking deleted");
        Ok(())
    }

    async fn ensure_booking(&self, booking_id: Uuid) -> Result<(), ServiceError> {
        sqlx::query_scalar::<_, Uuid>("SELECT booking_id FROM bookings WHERE booking_id = $1")
            .bind(booking_id)
            .fetch_optional(&self.pool)
            .await?
            .map(|_| ())
            .ok_or(ServiceError::BookingNotFound)
    }

    /// Add the caller to the roster. Joining twice changes nothing.
    #[instrument(skip(self, caller), fields(user_id = %caller.user_id))]
    pub async fn join(&self, booking_id: Uuid, caller: &Caller) -> Result<BookingDetail, ServiceError> {
        let inserted = sqlx::query(
            r#"
            INSERT INTO booking_user (booking_id, user_id)
            SELECT booking_id, $2 FROM bookings WHERE booking_id = $1
            ON CONFLICT (booking_id, user_id) DO NOTHING
            "#,
        )
        .bind(booking_id)
        .bind(caller.user_id)
        .execute(&self.pool)
        .await?
        .rows_affected();

        if inserted == 0 {
            // Either already a member or no such booking.
            self.ensure_booking(booking_id).await?;
        } else {
            info!(booking_id = %booking_id, "Player joined");
        }

        self.show(booking_id).await
    }

    /// Remove the caller from the roster; a no-op for non-members.
    #[instrument(skip(self, caller), fields(user_id = %caller.user_id))]
    pub async fn unjoin(&self, booking_id: Uuid, caller: &Caller) -> Result<BookingDetail, ServiceError> {
        self.ensure_booking(booking_id).await?;

        let removed = sqlx::query("DELETE FROM booking_user WHERE booking_id = $1 AND user_id = $2")
            .bind(booking_id)
            .bind(caller.user_id)
            .execute(&self.pool)
            .await?
            .rows_affected();

        if removed > 0 {
            info!(booking_id = %booking_id, "Player left");
        }

        self.show(booking_id).await
    }

    /// Booking with its roster.
    #[instrument(skip(self))]
    pub async fn show(&self, booking_id: Uuid) -> Result<BookingDetail, ServiceError> {
        let booking = sqlx::query_as::<_, Booking>(&format!(
            "SELECT {BOOKING_COLUMNS} FROM bookings WHERE booking_id = $1"
        ))
        .bind(booking_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(ServiceError::BookingNotFound)?;

        let players = sqlx::query_as::<_, Player>(
            r#"
            SELECT u.user_id, u.name, u.email
            FROM booking_user bu
            JOIN users u ON u.user_id = bu.user_id
            WHERE bu.booking_id = $1
            ORDER BY bu.joined_utc, u.user_id
            "#,
        )
        .bind(booking_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(BookingDetail::new(booking, players))
    }

    /// A field, its venue, and every booking made against it.
    #[instrument(skip(self))]
    pub async fn by_field(&self, field_id: Uuid) -> Result<FieldBookings, ServiceError> {
        let row = sqlx::query_as::<_, FieldVenueRow>(
            r#"
            SELECT f.field_id, f.name, f.field_type, v.venue_id, v.name AS venue_name,
                   v.address AS venue_address, v.phone AS venue_phone
            FROM fields f
            JOIN venues v ON v.venue_id = f.venue_id
            WHERE f.field_id = $1
            "#,
        )
        .bind(field_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(ServiceError::FieldNotFound)?;

        let field_type = FieldType::parse(&row.field_type).ok_or_else(|| {
            anyhow::anyhow!("Unknown field type '{}' on {}", row.field_type, row.field_id)
        })?;

        let bookings = sqlx::query_as::<_, Booking>(&format!(
            "SELECT {BOOKING_COLUMNS} FROM bookings WHERE field_id = $1 ORDER BY play_date_start, booking_id"
        ))
        .bind(field_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(FieldBookings {
            field_id: row.field_id,
            name: row.name,
            field_type,
            venue_id: row.venue_id,
            venue_name: row.venue_name,
            venue_address: row.venue_address,
            venue_phone: row.venue_phone,
            bookings,
        })
    }
}
