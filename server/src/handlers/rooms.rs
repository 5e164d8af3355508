use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::response::Response;
use axum::Json;

use crate::services::{add_review, listings, NewReview};
use crate::state::AppState;
use crate::utils::error::AppError;
use crate::utils::response::{created, success};

pub async fn get(
    State(state): State<AppState>,
    Path(room_id): Path<i64>,
) -> Result<Response, AppError> {
    let room = listings::get_room(&state.pool, room_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Room {} not found", room_id)))?;
    Ok(success(room, "Room retrieved"))
}

pub async fn list_reviews(
    State(state): State<AppState>,
    Path(room_id): Path<i64>,
) -> Result<Response, AppError> {
    let reviews = listings::reviews_for_room(&state.pool, room_id).await?;
    Ok(success(reviews, "Reviews retrieved"))
}

pub async fn create_review(
    State(state): State<AppState>,
    Path(room_id): Path<i64>,
    payload: Result<Json<NewReview>, JsonRejection>,
) -> Result<Response, AppError> {
    let Json(review) = payload?;
    let review = add_review(&state.pool, room_id, &review).await?;
    Ok(created(review, "Your review has been added"))
}
