use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use std::fmt;

use crate::services::item_service::ItemError;

/// An error on its way to the client: a status code plus the message
/// rendered in the JSON error envelope.
#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub message: String,
}

impl AppError {
    /// Create a new AppError with a specific status and message.
    pub fn new(status: StatusCode, msg: impl Into<String>) -> Self {
        Self {
            status,
            message: msg.into(),
        }
    }

    /// Shortcut for a 500 Internal Server Error
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, msg)
    }

    /// Shortcut for 404 Not Found
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, msg)
    }

    /// Shortcut for 401 Unauthorized
    pub fn unauthorized(msg: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, msg)
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for AppError {}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = Json(json!({
            "error": self.message,
            "status": self.status.as_u16()
        }));

        (self.status, body).into_response()
    }
}

impl From<ItemError> for AppError {
    fn from(err: ItemError) -> Self {
        match err {
            ItemError::MissingParameters => {
                AppError::new(StatusCode::BAD_REQUEST, "Missing parameters!")
            }
            ItemError::NotAcceptable(reason) => AppError::new(StatusCode::NOT_ACCEPTABLE, reason),
            ItemError::NotFound => AppError::not_found("Item not found!"),
            err @ ItemError::InvalidReference { .. } => {
                AppError::new(StatusCode::UNPROCESSABLE_ENTITY, err.to_string())
            }
            ItemError::Sqlx(err) => {
                tracing::error!(error = %err, "database operation failed");
                AppError::internal("Database operation failed")
            }
        }
    }
}
