//! HTTP surface for booking operations. Handlers stay thin: extract,
//! delegate to the booking service, wrap in the response envelope.

use axum::extract::{Path, State};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::services::booking::{self, BookingFilter, MakeBookingRequest};
use crate::state::AppState;
use crate::utils::auth::CurrentUser;
use crate::utils::error::AppError;
use crate::utils::response::{empty_success, success};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct BookingCreated {
    booking_id: i64,
}

pub async fn make_booking(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(request): Json<MakeBookingRequest>,
) -> Result<Response, AppError> {
    let booking_id = booking::make_booking(&state.pool, request, &user).await?;
    Ok(success(BookingCreated { booking_id }, "Booking created").into_response())
}

pub async fn cancel_booking(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(booking_id): Path<i64>,
) -> Result<Response, AppError> {
    booking::cancel_booking(&state.pool, booking_id, &user, false).await?;
    Ok(empty_success("Booking cancelled").into_response())
}

pub async fn get_booking(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(booking_id): Path<i64>,
) -> Result<Response, AppError> {
    let view = booking::get_booking_details(&state.pool, booking_id, &user).await?;
    Ok(success(view, "Booking retrieved").into_response())
}

pub async fn get_my_bookings(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(filter): Json<BookingFilter>,
) -> Result<Response, AppError> {
    let bookings = booking::get_my_bookings(&state.pool, &user, filter).await?;
    Ok(success(bookings, "Bookings retrieved").into_response())
}

/// Availability for an event listing. Public; no identity required.
pub async fn get_pre_booking_info(
    State(state): State<AppState>,
    Path(event_id): Path<i64>,
) -> Result<Response, AppError> {
    let info = booking::get_pre_booking_info(&state.pool, event_id).await?;
    Ok(success(info, "Pre-booking info retrieved").into_response())
}
