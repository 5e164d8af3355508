use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A bookable room. `availability_status` is false while a confirmed booking holds it.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Room {
    pub room_id: i64,
    pub property_id: i64,
    pub room_type: String,
    pub capacity: i32,
    pub price_per_night: Decimal,
    pub availability_status: bool,
}

/// Room joined with its current confirmed booking, if any.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct RoomOccupancy {
    pub room_id: i64,
    pub room_type: String,
    pub capacity: i32,
    pub price_per_night: Decimal,
    pub availability_status: bool,
    pub booking_id: Option<i64>,
    pub check_in_date: Option<NaiveDate>,
    pub check_out_date: Option<NaiveDate>,
    pub guest_name: Option<String>,
}
