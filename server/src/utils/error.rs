use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;
use tracing::{error, warn};

use crate::services::{BookingError, CancellationError, ReviewError};
use crate::utils::response::error as error_response;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Room unavailable: {0}")]
    RoomUnavailable(String),

    #[error("Invalid date range: {0}")]
    InvalidDateRange(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Transaction failed")]
    TransactionFailed(#[source] sqlx::Error),

    #[error("Database error")]
    DatabaseError(#[from] sqlx::Error),
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::ValidationError(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::RoomUnavailable(_) => StatusCode::CONFLICT,
            AppError::InvalidDateRange(_) => StatusCode::BAD_REQUEST,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::TransactionFailed(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::DatabaseError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            AppError::ValidationError(_) => "VALIDATION_ERROR",
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::RoomUnavailable(_) => "ROOM_UNAVAILABLE",
            AppError::InvalidDateRange(_) => "INVALID_DATE_RANGE",
            AppError::Conflict(_) => "CONFLICT",
            AppError::TransactionFailed(_) => "TRANSACTION_FAILED",
            AppError::DatabaseError(_) => "DATABASE_ERROR",
        }
    }

    fn log(&self) {
        match self {
            AppError::ValidationError(msg)
            | AppError::NotFound(msg)
            | AppError::RoomUnavailable(msg)
            | AppError::InvalidDateRange(msg)
            | AppError::Conflict(msg) => {
                warn!(code = self.code(), message = %msg, "Request rejected");
            }
            AppError::TransactionFailed(e) => {
                error!(error = ?e, "Transaction rolled back");
            }
            AppError::DatabaseError(e) => {
                error!(error = ?e, "Database error");
            }
        }
    }
}

impl From<BookingError> for AppError {
    fn from(err: BookingError) -> Self {
        match err {
            BookingError::NotFound(_) => AppError::NotFound(err.to_string()),
            BookingError::RoomUnavailable(_) => AppError::RoomUnavailable(err.to_string()),
            BookingError::InvalidDateRange { .. } => AppError::InvalidDateRange(err.to_string()),
            BookingError::MissingPaymentMethod => AppError::ValidationError(err.to_string()),
            BookingError::TransactionFailed(e) => AppError::TransactionFailed(e),
        }
    }
}

impl From<CancellationError> for AppError {
    fn from(err: CancellationError) -> Self {
        match err {
            CancellationError::NotFound(_) => AppError::NotFound(err.to_string()),
            CancellationError::AlreadyCompleted(_) => AppError::Conflict(err.to_string()),
            CancellationError::TransactionFailed(e) => AppError::TransactionFailed(e),
        }
    }
}

impl From<ReviewError> for AppError {
    fn from(err: ReviewError) -> Self {
        match err {
            ReviewError::RatingOutOfRange(_) | ReviewError::EmptyComment => {
                AppError::ValidationError(err.to_string())
            }
            ReviewError::RoomNotFound(_) | ReviewError::UserNotFound(_) => {
                AppError::NotFound(err.to_string())
            }
            ReviewError::Database(e) => AppError::DatabaseError(e),
        }
    }
}

/// Malformed or mistyped JSON bodies are client errors like any other validation failure.
impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::ValidationError(rejection.body_text())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let code = self.code();

        self.log();

        // Store errors are never echoed to the client
        let public_message = match &self {
            AppError::ValidationError(msg)
            | AppError::NotFound(msg)
            | AppError::RoomUnavailable(msg)
            | AppError::InvalidDateRange(msg)
            | AppError::Conflict(msg) => msg.clone(),
            AppError::TransactionFailed(_) => {
                "The operation could not be completed and was rolled back".to_string()
            }
            AppError::DatabaseError(_) => "A database error occurred".to_string(),
        };

        error_response(code, public_message, None, status)
    }
}
