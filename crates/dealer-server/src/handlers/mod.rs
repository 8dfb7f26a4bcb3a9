//! HTTP handlers

pub mod dealers;
pub mod health;
pub mod reviews;

pub use health::{health, home};

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use dealer_core::StoreError;
use serde_json::json;

/// Error response with a message safe to show to clients
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    /// Log the store failure and answer with a generic 500.
    pub fn internal(message: &str, e: StoreError) -> Self {
        tracing::error!("{}: {}", message, e);
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: message.to_string(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "error": self.message }))).into_response()
    }
}
