use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use std::fmt;

use shelf_core::ShelfError;

pub type AppResult<T> = Result<T, AppError>;

/// Error response: `{"error": message}`, plus `"field"` for validation
/// failures.
#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub message: String,
    pub field: Option<&'static str>,
}

impl AppError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            field: None,
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    pub fn with_field(mut self, field: &'static str) -> Self {
        self.field = Some(field);
        self
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
        let body = match self.field {
            Some(field) => json!({ "error": self.message, "field": field }),
            None => json!({ "error": self.message }),
        };

        (self.status, Json(body)).into_response()
    }
}

impl From<ShelfError> for AppError {
    fn from(err: ShelfError) -> Self {
        match err {
            ShelfError::NotFound(kind) => Self::not_found(format!("{kind} not found")),
            ShelfError::Validation { field, reason } => {
                Self::bad_request(reason).with_field(field)
            }
            ShelfError::Conflict(kind) => Self::bad_request(kind.to_string()),
            ShelfError::Invariant(detail) => {
                tracing::error!(%detail, "copy accounting invariant violated");
                Self::internal(format!("Invariant violated: {detail}"))
            }
            ShelfError::Internal(detail) => {
                tracing::error!(%detail, "storage operation failed");
                Self::internal("Internal server error")
            }
        }
    }
}
