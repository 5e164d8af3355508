use axum::extract::{Path, State};
use axum::response::Response;

use crate::services::listings;
use crate::state::AppState;
use crate::utils::error::AppError;
use crate::utils::response::success;

pub async fn list(State(state): State<AppState>) -> Result<Response, AppError> {
    let properties = listings::list_properties(&state.pool).await?;
    Ok(success(properties, "Properties retrieved"))
}

pub async fn details(
    State(state): State<AppState>,
    Path(property_id): Path<i64>,
) -> Result<Response, AppError> {
    let details = listings::property_details(&state.pool, property_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Property {} not found", property_id)))?;
    Ok(success(details, "Property retrieved"))
}

pub async fn room_status(
    State(state): State<AppState>,
    Path(property_id): Path<i64>,
) -> Result<Response, AppError> {
    if listings::get_property(&state.pool, property_id).await?.is_none() {
        return Err(AppError::NotFound(format!(
            "Property {} not found",
            property_id
        )));
    }

    let rooms = listings::room_status(&state.pool, property_id).await?;
    Ok(success(rooms, "Room status retrieved"))
}
