use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Review {
    pub review_id: i64,
    pub room_id: i64,
    pub user_id: i64,
    pub rating: i16,
    pub comment: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Review as shown on a listing, carrying the reviewer's display name.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct RoomReview {
    pub review_id: i64,
    pub rating: i16,
    pub comment: String,
    pub user_name: String,
    pub created_at: DateTime<Utc>,
}
