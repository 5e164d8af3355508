#![allow(dead_code)]

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::PgPool;

use staynngo_server::models::{BookingStatus, UserRole};
use staynngo_server::services::BookingRequest;

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub async fn create_user(pool: &PgPool, name: &str, role: UserRole) -> i64 {
    sqlx::query_scalar(
        r#"
        INSERT INTO users (name, email, password_hash, role, phone_number)
        VALUES ($1, $2, 'not-a-real-hash', $3, '555-0100')
        RETURNING user_id
        "#,
    )
    .bind(name)
    .bind(format!("{}@example.com", name.to_lowercase()))
    .bind(role)
    .fetch_one(pool)
    .await
    .unwrap()
}

pub async fn create_property(pool: &PgPool, owner_id: i64) -> i64 {
    sqlx::query_scalar(
        r#"
        INSERT INTO properties (owner_id, address, city, state, country, description)
        VALUES ($1, '12 Harbour Road', 'Kochi', 'Kerala', 'India', 'Sea-facing homestay')
        RETURNING property_id
        "#,
    )
    .bind(owner_id)
    .fetch_one(pool)
    .await
    .unwrap()
}

pub async fn create_room(pool: &PgPool, property_id: i64, price_per_night: Decimal) -> i64 {
    sqlx::query_scalar(
        r#"
        INSERT INTO rooms (property_id, room_type, capacity, price_per_night, availability_status)
        VALUES ($1, 'Deluxe', 2, $2, TRUE)
        RETURNING room_id
        "#,
    )
    .bind(property_id)
    .bind(price_per_night)
    .fetch_one(pool)
    .await
    .unwrap()
}

/// Owner, guest, property and one room at the given nightly rate.
pub struct Fixture {
    pub owner_id: i64,
    pub guest_id: i64,
    pub property_id: i64,
    pub room_id: i64,
}

pub async fn setup(pool: &PgPool, price_per_night: i64) -> Fixture {
    let owner_id = create_user(pool, "Owner", UserRole::Admin).await;
    let guest_id = create_user(pool, "Guest", UserRole::User).await;
    let property_id = create_property(pool, owner_id).await;
    let room_id = create_room(pool, property_id, Decimal::from(price_per_night)).await;
    Fixture {
        owner_id,
        guest_id,
        property_id,
        room_id,
    }
}

pub fn booking_request(
    room_id: i64,
    requester_id: i64,
    check_in: NaiveDate,
    check_out: NaiveDate,
) -> BookingRequest {
    BookingRequest {
        room_id,
        requester_id,
        check_in_date: check_in,
        check_out_date: check_out,
        payment_method: "card".to_string(),
    }
}

/// Inserts a confirmed booking directly, bypassing the availability check.
pub async fn insert_confirmed_booking(
    pool: &PgPool,
    room_id: i64,
    user_id: i64,
    check_in: NaiveDate,
    check_out: NaiveDate,
) -> i64 {
    sqlx::query_scalar(
        r#"
        INSERT INTO bookings (room_id, user_id, check_in_date, check_out_date, total_price, status)
        VALUES ($1, $2, $3, $4, 0, 'confirmed')
        RETURNING booking_id
        "#,
    )
    .bind(room_id)
    .bind(user_id)
    .bind(check_in)
    .bind(check_out)
    .fetch_one(pool)
    .await
    .unwrap()
}

pub async fn room_available(pool: &PgPool, room_id: i64) -> bool {
    sqlx::query_scalar("SELECT availability_status FROM rooms WHERE room_id = $1")
        .bind(room_id)
        .fetch_one(pool)
        .await
        .unwrap()
}

pub async fn booking_status(pool: &PgPool, booking_id: i64) -> Option<BookingStatus> {
    sqlx::query_scalar("SELECT status FROM bookings WHERE booking_id = $1")
        .bind(booking_id)
        .fetch_optional(pool)
        .await
        .unwrap()
}

pub async fn count_rows(pool: &PgPool, table: &str) -> i64 {
    sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {}", table))
        .fetch_one(pool)
        .await
        .unwrap()
}

/// Rooms marked unavailable that do not have exactly one confirmed booking.
pub async fn occupancy_violations(pool: &PgPool) -> i64 {
    sqlx::query_scalar(
        r#"
        SELECT COUNT(*)
        FROM rooms r
        WHERE r.availability_status = FALSE
          AND (SELECT COUNT(*) FROM bookings b
               WHERE b.room_id = r.room_id AND b.status = 'confirmed') <> 1
        "#,
    )
    .fetch_one(pool)
    .await
    .unwrap()
}
