use axum::extract::State;
use axum::response::Response;
use chrono::Utc;
use serde::Serialize;

use crate::services::release_expired_bookings;
use crate::state::AppState;
use crate::utils::error::AppError;
use crate::utils::response::success;

#[derive(Serialize)]
struct ReconcileOutcome {
    /// Bookings moved from confirmed to completed by this run.
    completed: u64,
}

/// Runs the availability reconciler immediately instead of waiting for the next tick.
pub async fn reconcile(State(state): State<AppState>) -> Result<Response, AppError> {
    let completed = release_expired_bookings(&state.pool, Utc::now()).await?;
    Ok(success(
        ReconcileOutcome { completed },
        "Room availability reconciled",
    ))
}
