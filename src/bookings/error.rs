use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

/// Error types for booking operations
#[derive(Debug, thiserror::Error)]
pub enum BookingError {
    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Booking not found")]
    NotFound,

    /// The requested slot has reached its configured capacity. The caller
    /// must pick another slot; this is never retried automatically.
    #[error("This time slot is full")]
    SlotFull,

    /// Same supplier and truck register already hold a reservation in this
    /// slot today.
    #[error("Truck {truck_register} already has a booking in this slot")]
    DuplicateTruck { truck_register: String },

    /// The next queue number would not fit the 2-digit booking code. Hard
    /// rejection instead of a silently truncated ticket code.
    #[error("No queue numbers left for this day")]
    QueueExhausted,

    /// The insert failed at the store, typically a lost uniqueness race
    /// between two concurrent allocations. Retryable by the caller, which
    /// re-runs allocation against the now-current state.
    #[error("Failed to create booking, please try again")]
    CreateFailed,

    #[error("Validation error: {0}")]
    ValidationError(String),
}

impl From<sqlx::Error> for BookingError {
    fn from(err: sqlx::Error) -> Self {
        BookingError::DatabaseError(err.to_string())
    }
}

impl IntoResponse for BookingError {
    fn into_response(self) -> Response {
        let (status, error_message) = match &self {
            BookingError::DatabaseError(msg) => {
                tracing::error!("Booking database error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "A database error occurred".to_string(),
                )
            }
            BookingError::NotFound => (StatusCode::NOT_FOUND, self.to_string()),
            BookingError::SlotFull
            | BookingError::DuplicateTruck { .. }
            | BookingError::QueueExhausted
            | BookingError::CreateFailed => (StatusCode::CONFLICT, self.to_string()),
            BookingError::ValidationError(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}
