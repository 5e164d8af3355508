use serde::Deserialize;
use sqlx::PgPool;
use thiserror::Error;

use crate::models::Review;

pub const MIN_RATING: i16 = 1;
pub const MAX_RATING: i16 = 5;

#[derive(Debug, Clone, Deserialize)]
pub struct NewReview {
    pub user_id: i64,
    pub rating: i16,
    pub comment: String,
}

#[derive(Debug, Error)]
pub enum ReviewError {
    #[error("Rating must be between 1 and 5, got {0}")]
    RatingOutOfRange(i16),

    #[error("Review comment must not be empty")]
    EmptyComment,

    #[error("Room {0} not found")]
    RoomNotFound(i64),

    #[error("User {0} not found")]
    UserNotFound(i64),

    #[error("Database error")]
    Database(#[from] sqlx::Error),
}

impl NewReview {
    pub fn validate(&self) -> Result<(), ReviewError> {
        if !(MIN_RATING..=MAX_RATING).contains(&self.rating) {
            return Err(ReviewError::RatingOutOfRange(self.rating));
        }
        if self.comment.trim().is_empty() {
            return Err(ReviewError::EmptyComment);
        }
        Ok(())
    }
}

pub async fn add_review(pool: &PgPool, room_id: i64, review: &NewReview) -> Result<Review, ReviewError> {
    review.validate()?;

    let room_exists: bool =
        sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM rooms WHERE room_id = $1)")
            .bind(room_id)
            .fetch_one(pool)
            .await?;
    if !room_exists {
        return Err(ReviewError::RoomNotFound(room_id));
    }

    let user_exists: bool =
        sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM users WHERE user_id = $1)")
            .bind(review.user_id)
            .fetch_one(pool)
            .await?;
    if !user_exists {
        return Err(ReviewError::UserNotFound(review.user_id));
    }

    let review = sqlx::query_as::<_, Review>(
        r#"
        INSERT INTO reviews (room_id, user_id, rating, comment)
        VALUES ($1, $2, $3, $4)
        RETURNING review_id, room_id, user_id, rating, comment, created_at, updated_at
        "#,
    )
    .bind(room_id)
    .bind(review.user_id)
    .bind(review.rating)
    .bind(review.comment.trim())
    .fetch_one(pool)
    .await?;

    Ok(review)
}
