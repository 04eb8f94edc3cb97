use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Application error type that can be returned from handlers
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    // Resource errors
    #[error("{0} not found")]
    NotFound(String),

    #[error("{0} already exists")]
    Conflict(String),

    // Validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    // Stored rows contradict each other (e.g. a parent id that does not exist)
    #[error("Data integrity error: {0}")]
    Integrity(String),

    // Database errors
    #[error("Database error: {0}")]
    Database(String),

    // Internal errors
    #[error("Internal server error")]
    Internal(String),
}

/// JSON error response body
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message, details) = match &self {
            // 404 Not Found
            AppError::NotFound(resource) => {
                (StatusCode::NOT_FOUND, "Not found", Some(resource.clone()))
            }

            // 409 Conflict
            AppError::Conflict(msg) => (StatusCode::CONFLICT, "Conflict", Some(msg.clone())),

            // 400 Bad Request
            AppError::Validation(msg) => (
                StatusCode::BAD_REQUEST,
                "Validation error",
                Some(msg.clone()),
            ),

            // 500 Internal Server Error
            AppError::Integrity(msg) => {
                tracing::error!("Data integrity error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Data integrity error",
                    None,
                )
            }
            AppError::Database(msg) => {
                tracing::error!("Database error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "Database error", None)
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error",
                    None,
                )
            }
        };

        let body = Json(ErrorResponse {
            error: error_message.to_string(),
            details,
        });

        (status, body).into_response()
    }
}

// Convenient conversions from common error types

impl From<sea_orm::DbErr> for AppError {
    fn from(err: sea_orm::DbErr) -> Self {
        if let Some(sea_orm::SqlErr::UniqueConstraintViolation(_)) = err.sql_err() {
            return AppError::Conflict("Record".to_string());
        }

        match err {
            sea_orm::DbErr::RecordNotFound(_) => AppError::NotFound("Resource".to_string()),
            sea_orm::DbErr::RecordNotInserted => {
                AppError::Conflict("Record".to_string())
            }
            sea_orm::DbErr::RecordNotUpdated => AppError::NotFound("Resource".to_string()),
            _ => AppError::Database(err.to_string()),
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Internal(format!("JSON serialization failed: {}", err))
    }
}

/// Result type alias for handlers
pub type AppResult<T> = Result<T, AppError>;
