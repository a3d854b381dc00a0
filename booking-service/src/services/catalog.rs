//! Venue and field catalog maintained by venue owners.

use chrono::{Duration, NaiveDate};
use sqlx::PgPool;
use std::collections::HashMap;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::dtos::catalog::{FieldRequest, VenueRequest};
use crate::models::{Booking, Field, FieldWithVenue, Venue, VenueDetail, VenueField};
use crate::services::error::ServiceError;

const VENUE_COLUMNS: &str = "venue_id, name, address, phone, created_utc, updated_utc";
const FIELD_COLUMNS: &str = "field_id, venue_id, name, field_type, created_utc, updated_utc";

#[derive(Clone)]
pub struct CatalogService {
    pool: PgPool,
}

impl CatalogService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// All venues, optionally narrowed to an exact name.
    #[instrument(skip(self))]
    pub async fn list_venues(&self, name: Option<&str>) -> Result<Vec<Venue>, ServiceError> {
        let venues = sqlx::query_as::<_, Venue>(&format!(
            "SELECT {VENUE_COLUMNS} FROM venues WHERE ($1::TEXT IS NULL OR name = $1) ORDER BY created_utc, venue_id"
        ))
        .bind(name)
        .fetch_all(&self.pool)
        .await?;
        Ok(venues)
    }

    #[instrument(skip(self, req), fields(name = %req.name))]
    pub async fn create_venue(&self, req: VenueRequest) -> Result<Venue, ServiceError> {
        let venue = sqlx::query_as::<_, Venue>(&format!(
            r#"
            INSERT INTO venues (venue_id, name, address, phone)
            VALUES ($1, $2, $3, $4)
            RETURNING {VENUE_COLUMNS}
            "#
        ))
        .bind(Uuid::new_v4())
        .bind(req.name.trim())
        .bind(req.address.trim())
        .bind(req.phone.trim())
        .fetch_one(&self.pool)
        .await?;

        info!(venue_id = %venue.venue_id, "Venue created");
        Ok(venue)
    }

    async fn find_venue(&self, venue_id: Uuid) -> Result<Venue, ServiceError> {
        sqlx::query_as::<_, Venue>(&format!(
            "SELECT {VENUE_COLUMNS} FROM venues WHERE venue_id = $1"
        ))
        .bind(venue_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(ServiceError::VenueNotFound)
    }

    /// Venue with its fields; each field lists the bookings starting on `day`.
    #[instrument(skip(self))]
    pub async fn get_venue(&self, venue_id: Uuid, day: NaiveDate) -> Result<VenueDetail, ServiceError> {
        let venue = self.find_venue(venue_id).await?;

        let fields = sqlx::query_as::<_, Field>(&format!(
            "SELECT {FIELD_COLUMNS} FROM fields WHERE venue_id = $1 ORDER BY name, field_id"
        ))
        .bind(venue_id)
        .fetch_all(&self.pool)
        .await?;

        let day_start = day.and_time(chrono::NaiveTime::MIN);
        let day_end = day_start + Duration::days(1);

        let bookings = sqlx::query_as::<_, Booking>(
            r#"
            SELECT b.booking_id, b.field_id, b.booking_user_id, b.play_date_start, b.play_date_end,
                   b.created_utc, b.updated_utc
            FROM bookings b
            JOIN fields f ON f.field_id = b.field_id
            WHERE f.venue_id = $1 AND b.play_date_start >= $2 AND b.play_date_start < $3
            ORDER BY b.play_date_start
            "#,
        )
        .bind(venue_id)
        .bind(day_start)
        .bind(day_end)
        .fetch_all(&self.pool)
        .await?;

        let mut by_field: HashMap<Uuid, Vec<Booking>> = HashMap::new();
        for booking in bookings {
            by_field.entry(booking.field_id).or_default().push(booking);
        }

        let fields = fields
            .into_iter()
            .map(|field| -> Result<VenueField, ServiceError> {
                let field_type = field.parsed_type().ok_or_else(|| {
                    anyhow::anyhow!("Unknown field type '{}' on {}", field.field_type, field.field_id)
                })?;
                Ok(VenueField {
                    bookings: by_field.remove(&field.field_id).unwrap_or_default(),
                    field_id: field.field_id,
                    name: field.name,
                    field_type,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(VenueDetail { venue, fields })
    }

    #[instrument(skip(self, req))]
    pub async fn update_venue(&self, venue_id: Uuid, req: VenueRequest) -> Result<Venue, ServiceError> {
        let venue = sqlx::query_as::<_, Venue>(&format!(
            r#"
            UPDATE venues
            SET name = $2, address = $3, phone = $4, updated_utc = NOW()
            WHERE venue_id = $1
            RETURNING {VENUE_COLUMNS}
            "#
        ))
        .bind(venue_id)
        .bind(req.name.trim())
        .bind(req.address.trim())
        .bind(req.phone.trim())
        .fetch_optional(&self.pool)
        .await?
        .ok_or(ServiceError::VenueNotFound)?;

        info!(venue_id = %venue_id, "Venue updated");
        Ok(venue)
    }

    /// Deleting a venue removes its fields and their bookings.
    #[instrument(skip(self))]
    pub async fn delete_venue(&self, venue_id: Uuid) -> Result<(), ServiceError> {
        let result = sqlx::query("DELETE FROM venues WHERE venue_id = $1")
            .bind(venue_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(ServiceError::VenueNotFound);
        }

        info!(venue_id = %venue_id, "Venue deleted");
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn list_fields(&self, venue_id: Uuid) -> Result<Vec<FieldWithVenue>, ServiceError> {
        self.find_venue(venue_id).await?;

        let fields = sqlx::query_as::<_, FieldWithVenue>(
            r#"
            SELECT f.field_id, f.venue_id, f.name, f.field_type, v.name AS venue_name,
                   f.created_utc, f.updated_utc
            FROM fields f
            JOIN venues v ON v.venue_id = f.venue_id
            WHERE f.venue_id = $1
            ORDER BY f.name, f.field_id
            "#,
        )
        .bind(venue_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(fields)
    }

    #[instrument(skip(self, req), fields(name = %req.name))]
    pub async fn create_field(&self, venue_id: Uuid, req: FieldRequest) -> Result<Field, ServiceError> {
        let field = sqlx::query_as::<_, Field>(&format!(
            r#"
            INSERT INTO fields (field_id, venue_id, name, field_type)
            VALUES ($1, $2, $3, $4)
            RETURNING {FIELD_COLUMNS}
            "#
        ))
        .bind(Uuid::new_v4())
        .bind(venue_id)
        .bind(req.name.trim())
        .bind(&req.field_type)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db_err) if db_err.is_foreign_key_violation() => {
                ServiceError::VenueNotFound
            }
            other => ServiceError::Database(other),
        })?;

        info!(field_id = %field.field_id, venue_id = %venue_id, "Field created");
        Ok(field)
    }

    /// A field of the given venue; a field under another venue is not found.
    #[instrument(skip(self))]
    pub async fn get_field(&self, venue_id: Uuid, field_id: Uuid) -> Result<FieldWithVenue, ServiceError> {
        sqlx::query_as::<_, FieldWithVenue>(
            r#"
            SELECT f.field_id, f.venue_id, f.name, f.field_type, v.name AS venue_name,
                   f.created_utc, f.updated_utc
            FROM fields f
            JOIN venues v ON v.venue_id = f.venue_id
            WHERE f.field_id = $1 AND f.venue_id = $2
            "#,
        )
        .bind(field_id)
        .bind(venue_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(ServiceError::FieldNotFound)
    }

    #[instrument(skip(self, req))]
    pub async fn update_field(
        &self,
        venue_id: Uuid,
        field_id: Uuid,
        req: FieldRequest,
    ) -> Result<Field, ServiceError> {
        let field = sqlx::query_as::<_, Field>(&format!(
            r#"
            UPDATE fields
            SET name = $3, field_type = $4, updated_utc = NOW()
            WHERE field_id = $1 AND venue_id = $2
            RETURNING {FIELD_COLUMNS}
            "#
        ))
        .bind(field_id)
        .bind(venue_id)
        .bind(req.name.trim())
        .bind(&req.field_type)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(ServiceError::FieldNotFound)?;

        info!(field_id = %field_id, "Field updated");
        Ok(field)
    }

    #[instrument(skip(self))]
    pub async fn delete_field(&self, venue_id: Uuid, field_id: Uuid) -> Result<(), ServiceError> {
        let result = sqlx::query("DELETE FROM fields WHERE field_id = $1 AND venue_id = $2")
            .bind(field_id)
            .bind(venue_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(ServiceError::FieldNotFound);
        }

        info!(field_id = %field_id, "Field deleted");
        Ok(())
    }
}
