use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::response::Response;
use axum::Json;
use serde::Deserialize;

use crate::services::{book_room, cancel_booking, listings, BookingRequest};
use crate::state::AppState;
use crate::utils::error::AppError;
use crate::utils::response::{created, empty_success, success};

#[derive(Debug, Deserialize)]
pub struct CancelBookingBody {
    pub requester_id: i64,
}

pub async fn create_booking(
    State(state): State<AppState>,
    payload: Result<Json<BookingRequest>, JsonRejection>,
) -> Result<Response, AppError> {
    let Json(request) = payload?;
    let receipt = book_room(&state.pool, &request).await?;
    Ok(created(receipt, "Booking and payment successful"))
}

pub async fn cancel(
    State(state): State<AppState>,
    Path(booking_id): Path<i64>,
    payload: Result<Json<CancelBookingBody>, JsonRejection>,
) -> Result<Response, AppError> {
    let Json(body) = payload?;
    cancel_booking(&state.pool, booking_id, body.requester_id).await?;
    Ok(empty_success("Booking has been successfully canceled"))
}

pub async fn list_for_user(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> Result<Response, AppError> {
    if listings::get_user(&state.pool, user_id).await?.is_none() {
        return Err(AppError::NotFound(format!("User {} not found", user_id)));
    }

    let bookings = listings::bookings_for_user(&state.pool, user_id).await?;
    Ok(success(bookings, "Bookings retrieved"))
}
