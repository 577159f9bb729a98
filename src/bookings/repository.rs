use chrono::NaiveDate;
use sqlx::PgPool;
use uuid::Uuid;

use crate::bookings::error::BookingError;
use crate::bookings::models::{Booking, CreateBookingRequest, UpdateBookingRequest};

const BOOKING_COLUMNS: &str = "id, queue_no, booking_code, date, start_time, end_time, slot, \
     supplier_id, supplier_code, supplier_name, truck_type, truck_register, \
     rubber_type, recorder, checkin_at, created_at, updated_at";

/// Repository for booking persistence
#[derive(Clone)]
pub struct BookingsRepository {
    pool: PgPool,
}

impl BookingsRepository {
    /// Create a new BookingsRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert a booking with an allocated queue number.
    ///
    /// Returns the raw `sqlx::Error` so the service can distinguish a
    /// uniqueness-constraint violation (a lost allocation race) from other
    /// store failures.
    pub async fn create(
        &self,
        request: &CreateBookingRequest,
        slot: &str,
        queue_no: i32,
        booking_code: &str,
    ) -> Result<Booking, sqlx::Error> {
        let booking = sqlx::query_as::<_, Booking>(&format!(
            r#"
            INSERT INTO bookings (queue_no, booking_code, date, start_time, end_time, slot,
                                  supplier_id, supplier_code, supplier_name, truck_type,
                                  truck_register, rubber_type, recorder)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            RETURNING {BOOKING_COLUMNS}
            "#
        ))
        .bind(queue_no)
        .bind(booking_code)
        .bind(request.date)
        .bind(&request.start_time)
        .bind(&request.end_time)
        .bind(slot)
        .bind(&request.supplier_id)
        .bind(&request.supplier_code)
        .bind(&request.supplier_name)
        .bind(&request.truck_type)
        .bind(&request.truck_register)
        .bind(&request.rubber_type)
        .bind(&request.recorder)
        .fetch_one(&self.pool)
        .await?;

        Ok(booking)
    }

    /// All bookings whose booking code starts with the given day prefix,
    /// spanning every slot of that day.
    pub async fn find_by_code_prefix(&self, prefix: &str) -> Result<Vec<Booking>, BookingError> {
        let bookings = sqlx::query_as::<_, Booking>(&format!(
            "SELECT {BOOKING_COLUMNS} FROM bookings WHERE booking_code LIKE $1 ORDER BY queue_no"
        ))
        .bind(format!("{prefix}%"))
        .fetch_all(&self.pool)
        .await?;

        Ok(bookings)
    }

    /// List bookings with optional date and slot filters, ordered by queue
    /// number.
    pub async fn find_all(
        &self,
        date: Option<NaiveDate>,
        slot: Option<&str>,
    ) -> Result<Vec<Booking>, BookingError> {
        let query = format!(
            r#"
            SELECT {BOOKING_COLUMNS} FROM bookings
            WHERE ($1::date IS NULL OR date = $1)
              AND ($2::text IS NULL OR slot = $2)
            ORDER BY queue_no
            "#
        );

        let bookings = sqlx::query_as::<_, Booking>(&query)
            .bind(date)
            .bind(slot)
            .fetch_all(&self.pool)
            .await?;

        Ok(bookings)
    }

    /// Find a booking by id
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Booking>, BookingError> {
        let booking = sqlx::query_as::<_, Booking>(&format!(
            "SELECT {BOOKING_COLUMNS} FROM bookings WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(booking)
    }

    /// Update supplier/truck detail fields, keeping existing values for
    /// omitted fields. Queue number and booking code are never touched.
    pub async fn update(
        &self,
        id: Uuid,
        existing: &Booking,
        request: &UpdateBookingRequest,
    ) -> Result<Booking, BookingError> {
        let booking = sqlx::query_as::<_, Booking>(&format!(
            r#"
            UPDATE bookings
            SET supplier_id = $1,
                supplier_code = $2,
                supplier_name = $3,
                truck_type = $4,
                truck_register = $5,
                rubber_type = $6,
                recorder = $7,
                updated_at = NOW()
            WHERE id = $8
            RETURNING {BOOKING_COLUMNS}
            "#
        ))
        .bind(request.supplier_id.as_ref().unwrap_or(&existing.supplier_id))
        .bind(
            request
                .supplier_code
                .as_ref()
                .unwrap_or(&existing.supplier_code),
        )
        .bind(
            request
                .supplier_name
                .as_ref()
                .unwrap_or(&existing.supplier_name),
        )
        .bind(request.truck_type.as_ref().unwrap_or(&existing.truck_type))
        .bind(
            request
                .truck_register
                .as_ref()
                .unwrap_or(&existing.truck_register),
        )
        .bind(request.rubber_type.as_ref().unwrap_or(&existing.rubber_type))
        .bind(request.recorder.as_ref().unwrap_or(&existing.recorder))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(BookingError::NotFound)?;

        Ok(booking)
    }

    /// Hard delete, returning the removed row so its display fields are
    /// available for the cancellation notification.
    pub async fn delete(&self, id: Uuid) -> Result<Booking, BookingError> {
        let booking = sqlx::query_as::<_, Booking>(&format!(
            "DELETE FROM bookings WHERE id = $1 RETURNING {BOOKING_COLUMNS}"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(BookingError::NotFound)?;

        Ok(booking)
    }
}
