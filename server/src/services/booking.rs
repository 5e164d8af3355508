//! Booking and cancellation transactions.
//!
//! Both flows lock the room row before touching `bookings`, matching the lock
//! order used by the availability reconciler.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use thiserror::Error;
use tracing::{debug, info};

use crate::models::{Booking, BookingStatus, PaymentStatus, Room};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingRequest {
    pub room_id: i64,
    pub requester_id: i64,
    pub check_in_date: NaiveDate,
    pub check_out_date: NaiveDate,
    pub payment_method: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingReceipt {
    pub booking_id: i64,
    pub total_price: Decimal,
}

#[derive(Debug, Error)]
pub enum BookingError {
    #[error("Room {0} not found")]
    NotFound(i64),

    #[error("Room {0} is currently unavailable")]
    RoomUnavailable(i64),

    #[error("Check-out date {check_out} must be after check-in date {check_in}")]
    InvalidDateRange {
        check_in: NaiveDate,
        check_out: NaiveDate,
    },

    #[error("Payment method must not be empty")]
    MissingPaymentMethod,

    #[error("Booking transaction failed")]
    TransactionFailed(#[from] sqlx::Error),
}

#[derive(Debug, Error)]
pub enum CancellationError {
    #[error("Booking {0} not found")]
    NotFound(i64),

    #[error("Booking {0} has already completed")]
    AlreadyCompleted(i64),

    #[error("Cancellation transaction failed")]
    TransactionFailed(#[from] sqlx::Error),
}

/// Number of nights between check-in and check-out, rejecting empty or inverted stays.
pub fn nights_between(check_in: NaiveDate, check_out: NaiveDate) -> Result<i64, BookingError> {
    let nights = (check_out - check_in).num_days();
    if nights <= 0 {
        return Err(BookingError::InvalidDateRange {
            check_in,
            check_out,
        });
    }
    Ok(nights)
}

/// Payment method as stored, trimmed; blank methods are rejected.
pub fn payment_method(raw: &str) -> Result<&str, BookingError> {
    let method = raw.trim();
    if method.is_empty() {
        return Err(BookingError::MissingPaymentMethod);
    }
    Ok(method)
}

pub fn total_price(price_per_night: Decimal, nights: i64) -> Decimal {
    price_per_night * Decimal::from(nights)
}

/// Reserves a room: inserts the booking and its payment and marks the room
/// unavailable, all in one transaction.
///
/// The room row is held with `FOR UPDATE` for the whole transaction, so a
/// concurrent request for the same room blocks until this one finishes and
/// then observes `RoomUnavailable`. Returning early drops the transaction,
/// which rolls it back. A blank payment method is rejected before the
/// transaction starts.
pub async fn book_room(
    pool: &PgPool,
    request: &BookingRequest,
) -> Result<BookingReceipt, BookingError> {
    let payment_method = payment_method(&request.payment_method)?;

    let mut tx = pool.begin().await?;

    let room = sqlx::query_as::<_, Room>(
        r#"
        SELECT room_id, property_id, room_type, capacity, price_per_night, availability_status
        FROM rooms
        WHERE room_id = $1
        FOR UPDATE
        "#,
    )
    .bind(request.room_id)
    .fetch_optional(&mut *tx)
    .await?
    .ok_or(BookingError::NotFound(request.room_id))?;

    if !room.availability_status {
        return Err(BookingError::RoomUnavailable(room.room_id));
    }

    let nights = nights_between(request.check_in_date, request.check_out_date)?;
    let total_price = total_price(room.price_per_night, nights);

    let booking_id: i64 = sqlx::query_scalar(
        r#"
        INSERT INTO bookings (room_id, user_id, check_in_date, check_out_date, total_price, status)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING booking_id
        "#,
    )
    .bind(room.room_id)
    .bind(request.requester_id)
    .bind(request.check_in_date)
    .bind(request.check_out_date)
    .bind(total_price)
    .bind(BookingStatus::Confirmed)
    .fetch_one(&mut *tx)
    .await?;

    sqlx::query(
        r#"
        INSERT INTO payments (booking_id, payment_method, amount, payment_status)
        VALUES ($1, $2, $3, $4)
        "#,
    )
    .bind(booking_id)
    .bind(payment_method)
    .bind(total_price)
    .bind(PaymentStatus::Completed)
    .execute(&mut *tx)
    .await?;

    sqlx::query("UPDATE rooms SET availability_status = FALSE WHERE room_id = $1")
        .bind(room.room_id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;

    info!(
        booking_id,
        room_id = room.room_id,
        user_id = request.requester_id,
        nights,
        %total_price,
        "Booking confirmed"
    );

    Ok(BookingReceipt {
        booking_id,
        total_price,
    })
}

/// Cancels a confirmed booking owned by `requester_id`, deleting the booking
/// and its payment and releasing the room.
///
/// A booking owned by someone else is reported as `NotFound`.
pub async fn cancel_booking(
    pool: &PgPool,
    booking_id: i64,
    requester_id: i64,
) -> Result<(), CancellationError> {
    let mut tx = pool.begin().await?;

    let room_id: i64 =
        sqlx::query_scalar("SELECT room_id FROM bookings WHERE booking_id = $1 AND user_id = $2")
            .bind(booking_id)
            .bind(requester_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or(CancellationError::NotFound(booking_id))?;

    sqlx::query("SELECT room_id FROM rooms WHERE room_id = $1 FOR UPDATE")
        .bind(room_id)
        .execute(&mut *tx)
        .await?;

    // Re-read under the room lock; the reconciler may have completed it meanwhile.
    let booking = sqlx::query_as::<_, Booking>(
        r#"
        SELECT booking_id, room_id, user_id, check_in_date, check_out_date,
               total_price, status, created_at, updated_at
        FROM bookings
        WHERE booking_id = $1
        FOR UPDATE
        "#,
    )
    .bind(booking_id)
    .fetch_optional(&mut *tx)
    .await?
    .ok_or(CancellationError::NotFound(booking_id))?;

    if booking.status == BookingStatus::Completed {
        return Err(CancellationError::AlreadyCompleted(booking_id));
    }

    sqlx::query("DELETE FROM payments WHERE booking_id = $1")
        .bind(booking_id)
        .execute(&mut *tx)
        .await?;

    sqlx::query("DELETE FROM bookings WHERE booking_id = $1")
        .bind(booking_id)
        .execute(&mut *tx)
        .await?;

    sqlx::query("UPDATE rooms SET availability_status = TRUE WHERE room_id = $1")
        .bind(booking.room_id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;

    debug!(booking_id, room_id = booking.room_id, "Booking cancelled");

    Ok(())
}
