// HTTP handlers for booking endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::NaiveDate;
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use crate::bookings::{
    Booking, BookingError, BookingStats, CreateBookingRequest, UpdateBookingRequest,
};

/// Query parameters for listing bookings
#[derive(Debug, Deserialize)]
pub struct ListBookingsQuery {
    pub date: Option<NaiveDate>,
    pub slot: Option<String>,
}

/// Query parameters for the daily stats endpoint
#[derive(Debug, Deserialize)]
pub struct StatsQuery {
    pub date: NaiveDate,
}

/// Handler for POST /api/bookings
/// Allocates a queue number and creates the booking
#[utoipa::path(
    post,
    path = "/api/bookings",
    request_body = CreateBookingRequest,
    responses(
        (status = 201, description = "Booking created with allocated queue number", body = Booking),
        (status = 400, description = "Invalid input data"),
        (status = 409, description = "Slot full, duplicate truck, or lost allocation race")
    ),
    tag = "bookings"
)]
pub async fn create_booking(
    State(state): State<crate::AppState>,
    Json(request): Json<CreateBookingRequest>,
) -> Result<(StatusCode, Json<Booking>), BookingError> {
    request
        .validate()
        .map_err(|e| BookingError::ValidationError(e.to_string()))?;

    let booking = state.booking_service.create(request).await?;
    Ok((StatusCode::CREATED, Json(booking)))
}

/// Handler for GET /api/bookings
/// Lists bookings, optionally filtered by date and slot
#[utoipa::path(
    get,
    path = "/api/bookings",
    params(
        ("date" = Option<String>, Query, description = "Calendar date filter (YYYY-MM-DD)"),
        ("slot" = Option<String>, Query, description = "Slot label filter, e.g. 08:00-09:00")
    ),
    responses(
        (status = 200, description = "Bookings ordered by queue number", body = Vec<Booking>)
    ),
    tag = "bookings"
)]
pub async fn list_bookings(
    State(state): State<crate::AppState>,
    Query(query): Query<ListBookingsQuery>,
) -> Result<Json<Vec<Booking>>, BookingError> {
    let bookings = state
        .booking_service
        .find_all(query.date, query.slot.as_deref())
        .await?;
    Ok(Json(bookings))
}

/// Handler for GET /api/bookings/stats
/// Daily totals and per-slot breakdown
#[utoipa::path(
    get,
    path = "/api/bookings/stats",
    params(
        ("date" = String, Query, description = "Calendar date (YYYY-MM-DD)")
    ),
    responses(
        (status = 200, description = "Daily booking stats", body = BookingStats)
    ),
    tag = "bookings"
)]
pub async fn booking_stats(
    State(state): State<crate::AppState>,
    Query(query): Query<StatsQuery>,
) -> Result<Json<BookingStats>, BookingError> {
    let stats = state.booking_service.stats(query.date).await?;
    Ok(Json(stats))
}

/// Handler for GET /api/bookings/:id
#[utoipa::path(
    get,
    path = "/api/bookings/{id}",
    params(
        ("id" = Uuid, Path, description = "Booking id")
    ),
    responses(
        (status = 200, description = "Booking found", body = Booking),
        (status = 404, description = "Booking not found")
    ),
    tag = "bookings"
)]
pub async fn get_booking(
    State(state): State<crate::AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Booking>, BookingError> {
    let booking = state.booking_service.find_one(id).await?;
    Ok(Json(booking))
}

/// Handler for PUT /api/bookings/:id
/// Corrects supplier/truck details; queue number and code are immutable
#[utoipa::path(
    put,
    path = "/api/bookings/{id}",
    params(
        ("id" = Uuid, Path, description = "Booking id")
    ),
    request_body = UpdateBookingRequest,
    responses(
        (status = 200, description = "Booking updated", body = Booking),
        (status = 404, description = "Booking not found")
    ),
    tag = "bookings"
)]
pub async fn update_booking(
    State(state): State<crate::AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateBookingRequest>,
) -> Result<Json<Booking>, BookingError> {
    request
        .validate()
        .map_err(|e| BookingError::ValidationError(e.to_string()))?;

    let booking = state.booking_service.update(id, request).await?;
    Ok(Json(booking))
}

/// Handler for DELETE /api/bookings/:id
/// Cancels a booking (hard delete)
#[utoipa::path(
    delete,
    path = "/api/bookings/{id}",
    params(
        ("id" = Uuid, Path, description = "Booking id")
    ),
    responses(
        (status = 200, description = "Booking cancelled, removed row returned", body = Booking),
        (status = 404, description = "Booking not found")
    ),
    tag = "bookings"
)]
pub async fn delete_booking(
    State(state): State<crate::AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Booking>, BookingError> {
    let booking = state.booking_service.remove(id).await?;
    Ok(Json(booking))
}
