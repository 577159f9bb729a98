use chrono::NaiveDate;
use std::collections::HashMap;
use uuid::Uuid;

use crate::bookings::models::{
    Booking, BookingStats, CreateBookingRequest, SlotStats, UpdateBookingRequest,
};
use crate::bookings::{
    booking_code, error::BookingError, queue_allocator, repository::BookingsRepository,
    slot_config,
};
use crate::notifications::{EventPayload, NotificationDispatcher};

const SOURCE_APP: &str = "Booking";

/// Service for booking business logic
#[derive(Clone)]
pub struct BookingService {
    repository: BookingsRepository,
    dispatcher: NotificationDispatcher,
}

impl BookingService {
    /// Create a new BookingService
    pub fn new(repository: BookingsRepository, dispatcher: NotificationDispatcher) -> Self {
        Self {
            repository,
            dispatcher,
        }
    }

    /// Create a booking
    ///
    /// 1. Resolves the slot configuration for the requested slot and date
    /// 2. Gathers the day's bookings by code prefix
    /// 3. Allocates the next queue number (gap-filling, capacity and
    ///    duplicate-truck checks)
    /// 4. Inserts the row; a uniqueness violation means a concurrent
    ///    allocation won the race and surfaces as `CreateFailed`
    /// 5. Fires the CREATE event (best-effort, never fails the create)
    ///
    /// There is no lock between steps 2 and 4; the unique index on
    /// (date, slot, queue_no) is the correctness backstop.
    pub async fn create(&self, request: CreateBookingRequest) -> Result<Booking, BookingError> {
        let slot = request.slot();
        let config = slot_config::resolve(&slot, request.date);
        let prefix = booking_code::day_prefix(request.date);

        tracing::debug!(
            "Allocating booking for slot {} on {} (prefix {})",
            slot,
            request.date,
            prefix
        );

        let day_bookings = self.repository.find_by_code_prefix(&prefix).await?;

        let allocation = queue_allocator::allocate(
            config,
            request.date,
            &slot,
            &request.supplier_id,
            &request.truck_register,
            &day_bookings,
        )?;

        let booking = self
            .repository
            .create(&request, &slot, allocation.queue_no, &allocation.booking_code)
            .await
            .map_err(|e| {
                if is_unique_violation(&e) {
                    tracing::warn!(
                        "Lost allocation race for slot {} queue {}: {}",
                        slot,
                        allocation.queue_no,
                        e
                    );
                    BookingError::CreateFailed
                } else {
                    BookingError::from(e)
                }
            })?;

        tracing::info!(
            "Created booking {} (queue {}) for {}",
            booking.booking_code,
            booking.queue_no,
            booking.supplier_name
        );

        self.dispatcher
            .dispatch(
                SOURCE_APP,
                "CREATE",
                EventPayload {
                    title: "New Booking Created".to_string(),
                    message: format!(
                        "Booking {} created for {} at {}",
                        booking.booking_code, booking.supplier_name, booking.slot
                    ),
                    entity_id: Some(booking.id.to_string()),
                    action_url: Some(format!("/bookings/{}", booking.booking_code)),
                },
            )
            .await;

        Ok(booking)
    }

    /// List bookings with optional date and slot filters
    pub async fn find_all(
        &self,
        date: Option<NaiveDate>,
        slot: Option<&str>,
    ) -> Result<Vec<Booking>, BookingError> {
        self.repository.find_all(date, slot).await
    }

    /// Fetch a booking by id
    pub async fn find_one(&self, id: Uuid) -> Result<Booking, BookingError> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or(BookingError::NotFound)
    }

    /// Correct supplier/truck details on a booking. The queue number and
    /// booking code stay as allocated.
    pub async fn update(
        &self,
        id: Uuid,
        request: UpdateBookingRequest,
    ) -> Result<Booking, BookingError> {
        let existing = self.find_one(id).await?;
        let updated = self.repository.update(id, &existing, &request).await?;

        self.dispatcher
            .dispatch(
                SOURCE_APP,
                "UPDATE",
                EventPayload {
                    title: "Booking Updated".to_string(),
                    message: format!("Booking {} has been updated.", updated.booking_code),
                    entity_id: Some(updated.id.to_string()),
                    action_url: Some(format!("/bookings/{}", updated.booking_code)),
                },
            )
            .await;

        Ok(updated)
    }

    /// Cancel a booking. The row is hard-deleted; its display fields are
    /// captured by the returning delete so the cancellation notification
    /// can still reference them.
    pub async fn remove(&self, id: Uuid) -> Result<Booking, BookingError> {
        let removed = self.repository.delete(id).await?;

        tracing::info!(
            "Deleted booking {} (queue {})",
            removed.booking_code,
            removed.queue_no
        );

        self.dispatcher
            .dispatch(
                SOURCE_APP,
                "DELETE",
                EventPayload {
                    title: "Booking Cancelled".to_string(),
                    message: format!(
                        "Booking {} for {} at {} has been cancelled.",
                        removed.booking_code, removed.supplier_name, removed.slot
                    ),
                    entity_id: Some(removed.id.to_string()),
                    action_url: None,
                },
            )
            .await;

        Ok(removed)
    }

    /// Daily stats: totals, check-in counts, and a breakdown per canonical
    /// slot.
    pub async fn stats(&self, date: NaiveDate) -> Result<BookingStats, BookingError> {
        let bookings = self.repository.find_all(Some(date), None).await?;

        let total = bookings.len();
        let checked_in = bookings.iter().filter(|b| b.checkin_at.is_some()).count();

        let mut slots = HashMap::new();
        for slot in slot_config::canonical_slots() {
            let slot_bookings: Vec<Booking> = bookings
                .iter()
                .filter(|b| b.slot == slot)
                .cloned()
                .collect();
            slots.insert(
                slot.to_string(),
                SlotStats {
                    count: slot_bookings.len(),
                    checked_in: slot_bookings
                        .iter()
                        .filter(|b| b.checkin_at.is_some())
                        .count(),
                    bookings: slot_bookings,
                },
            );
        }

        Ok(BookingStats {
            total,
            checked_in,
            pending: total - checked_in,
            slots,
        })
    }
}

/// True when the error is a Postgres unique-constraint violation (SQLSTATE
/// 23505), i.e. the insert lost a queue-number race.
fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(
        err.as_database_error().and_then(|db| db.code()),
        Some(code) if code == "23505"
    )
}
