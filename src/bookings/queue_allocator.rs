use chrono::NaiveDate;

use crate::bookings::booking_code::{self, MAX_QUEUE_NO};
use crate::bookings::error::BookingError;
use crate::bookings::models::Booking;
use crate::bookings::slot_config::SlotConfig;

/// Outcome of a successful queue allocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Allocation {
    pub queue_no: i32,
    pub booking_code: String,
}

/// Compute the next queue number for a slot on a given day.
///
/// `day_bookings` is every booking sharing the day's code prefix (coarser
/// than the slot); the exact slot filter happens here. Pure function over
/// that snapshot: a concurrent allocation racing on the same snapshot is
/// caught later by the store's uniqueness constraint, not here.
///
/// Queue numbers are assigned gap-filling: the scan starts at the slot's
/// configured start and reuses a freed low number before extending the
/// range, for capped and uncapped slots alike.
pub fn allocate(
    config: SlotConfig,
    date: NaiveDate,
    slot: &str,
    supplier_id: &str,
    truck_register: &str,
    day_bookings: &[Booking],
) -> Result<Allocation, BookingError> {
    let existing: Vec<&Booking> = day_bookings.iter().filter(|b| b.slot == slot).collect();

    if let Some(limit) = config.limit {
        if existing.len() as i32 >= limit {
            return Err(BookingError::SlotFull);
        }
    }

    // Unregistered trucks are never deduplicated.
    if !truck_register.is_empty() {
        let duplicate = existing
            .iter()
            .any(|b| b.supplier_id == supplier_id && b.truck_register == truck_register);
        if duplicate {
            return Err(BookingError::DuplicateTruck {
                truck_register: truck_register.to_string(),
            });
        }
    }

    let mut used: Vec<i32> = existing.iter().map(|b| b.queue_no).collect();
    used.sort_unstable();

    let mut queue_no = config.start;
    for num in used {
        if num == queue_no {
            queue_no += 1;
        } else if num > queue_no {
            break;
        }
        // Numbers below the configured start are skipped.
    }

    if queue_no > MAX_QUEUE_NO {
        return Err(BookingError::QueueExhausted);
    }

    Ok(Allocation {
        queue_no,
        booking_code: booking_code::generate(date, queue_no),
    })
}
