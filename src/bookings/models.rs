use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::collections::HashMap;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::validation::validate_wall_clock;

/// A truck gate booking. `booking_code` is the printed queue ticket key
/// (YYMMDD + queue number); `queue_no` is unique within one day and slot.
/// Supplier fields are copied at booking time, not re-joined later.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Booking {
    pub id: Uuid,
    #[schema(example = 1)]
    pub queue_no: i32,
    #[schema(example = "24060101")]
    pub booking_code: String,
    pub date: NaiveDate,
    #[schema(example = "08:00")]
    pub start_time: String,
    #[schema(example = "09:00")]
    pub end_time: String,
    #[schema(example = "08:00-09:00")]
    pub slot: String,
    pub supplier_id: String,
    pub supplier_code: String,
    pub supplier_name: String,
    #[schema(example = "10-wheel")]
    pub truck_type: String,
    /// Empty string when the truck has no registration plate on file.
    pub truck_register: String,
    #[schema(example = "USS")]
    pub rubber_type: String,
    pub recorder: String,
    /// Set by the gate check-in flow, not by this service.
    pub checkin_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Request body for creating a booking. The queue number and booking code
/// are never client-supplied; the allocator assigns them.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateBookingRequest {
    pub date: NaiveDate,
    #[validate(custom = "validate_wall_clock")]
    #[schema(example = "08:00")]
    pub start_time: String,
    #[validate(custom = "validate_wall_clock")]
    #[schema(example = "09:00")]
    pub end_time: String,
    #[validate(length(min = 1, message = "Supplier id is required"))]
    pub supplier_id: String,
    #[validate(length(min = 1, message = "Supplier code is required"))]
    pub supplier_code: String,
    #[validate(length(min = 1, message = "Supplier name is required"))]
    pub supplier_name: String,
    #[validate(length(min = 1, message = "Truck type is required"))]
    pub truck_type: String,
    /// Optional; bookings without a register are never deduplicated.
    #[serde(default)]
    pub truck_register: String,
    #[validate(length(min = 1, message = "Rubber type is required"))]
    pub rubber_type: String,
    #[validate(length(min = 1, message = "Recorder is required"))]
    pub recorder: String,
}

impl CreateBookingRequest {
    /// The "start-end" slot label derived from the request times.
    pub fn slot(&self) -> String {
        format!("{}-{}", self.start_time, self.end_time)
    }
}

/// Request body for correcting supplier/truck details on an existing
/// booking. Date, slot, queue number and booking code are immutable.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct UpdateBookingRequest {
    pub supplier_id: Option<String>,
    pub supplier_code: Option<String>,
    pub supplier_name: Option<String>,
    pub truck_type: Option<String>,
    pub truck_register: Option<String>,
    pub rubber_type: Option<String>,
    pub recorder: Option<String>,
}

/// Per-slot breakdown inside the daily stats response.
#[derive(Debug, Serialize, ToSchema)]
pub struct SlotStats {
    pub count: usize,
    pub checked_in: usize,
    pub bookings: Vec<Booking>,
}

/// Daily stats: totals plus a breakdown for each canonical slot.
#[derive(Debug, Serialize, ToSchema)]
pub struct BookingStats {
    pub total: usize,
    pub checked_in: usize,
    pub pending: usize,
    pub slots: HashMap<String, SlotStats>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_request_slot_label() {
        let json = r#"{
            "date": "2024-06-01",
            "start_time": "08:00",
            "end_time": "09:00",
            "supplier_id": "sup-1",
            "supplier_code": "S001",
            "supplier_name": "Southern Rubber",
            "truck_type": "10-wheel",
            "truck_register": "TK-1234",
            "rubber_type": "USS",
            "recorder": "staff-7"
        }"#;

        let request: CreateBookingRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.slot(), "08:00-09:00");
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_create_request_truck_register_defaults_empty() {
        let json = r#"{
            "date": "2024-06-01",
            "start_time": "08:00",
            "end_time": "09:00",
            "supplier_id": "sup-1",
            "supplier_code": "S001",
            "supplier_name": "Southern Rubber",
            "truck_type": "6-wheel",
            "rubber_type": "Cup lump",
            "recorder": "staff-7"
        }"#;

        let request: CreateBookingRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.truck_register, "");
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_create_request_rejects_bad_time() {
        let json = r#"{
            "date": "2024-06-01",
            "start_time": "8am",
            "end_time": "09:00",
            "supplier_id": "sup-1",
            "supplier_code": "S001",
            "supplier_name": "Southern Rubber",
            "truck_type": "6-wheel",
            "rubber_type": "USS",
            "recorder": "staff-7"
        }"#;

        let request: CreateBookingRequest = serde_json::from_str(json).unwrap();
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_update_request_supports_partial_fields() {
        let json = r#"{ "truck_register": "TK-9999" }"#;
        let request: UpdateBookingRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.truck_register, Some("TK-9999".to_string()));
        assert_eq!(request.supplier_name, None);
    }
}
