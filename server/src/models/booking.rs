use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "booking_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Confirmed,
    Completed,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Booking {
    pub booking_id: i64,
    pub room_id: i64,
    pub user_id: i64,
    pub check_in_date: NaiveDate,
    pub check_out_date: NaiveDate,
    pub total_price: Decimal,
    pub status: BookingStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A booking as listed to its guest, with the room and property it refers to.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct BookingSummary {
    pub booking_id: i64,
    pub check_in_date: NaiveDate,
    pub check_out_date: NaiveDate,
    pub total_price: Decimal,
    pub status: BookingStatus,
    pub room_type: String,
    pub address: String,
}
