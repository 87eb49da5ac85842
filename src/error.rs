//! Domain-specific error types for feedback-lens

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;

/// Main error type for the feedback-lens service
#[derive(Error, Debug)]
pub enum FeedbackLensError {
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Malformed or missing input. Reported as 400, never retried.
    #[error("Validation error: {message}")]
    Validation { message: String },

    /// A required capability never initialized. Reported as 503.
    #[error("Capability unavailable: {message}")]
    Unavailable { message: String },

    /// A capability initialized but failed during a call. Reported as 500
    /// with the underlying message.
    #[error("Processing error: {message}")]
    Processing { message: String },

    #[error("Serialization error: {message}")]
    Serialization { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl From<anyhow::Error> for FeedbackLensError {
    fn from(err: anyhow::Error) -> Self {
        FeedbackLensError::Internal {
            message: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for FeedbackLensError {
    fn from(err: serde_json::Error) -> Self {
        FeedbackLensError::Serialization {
            message: err.to_string(),
        }
    }
}

impl From<reqwest::Error> for FeedbackLensError {
    fn from(err: reqwest::Error) -> Self {
        FeedbackLensError::Processing {
            message: format!("Inference request failed: {}", err),
        }
    }
}

/// Convert FeedbackLensError to an HTTP response with a JSON error body
impl IntoResponse for FeedbackLensError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            FeedbackLensError::Validation { message } => (StatusCode::BAD_REQUEST, message),
            FeedbackLensError::Unavailable { message } => {
                (StatusCode::SERVICE_UNAVAILABLE, message)
            }
            FeedbackLensError::Processing { message } => {
                (StatusCode::INTERNAL_SERVER_ERROR, message)
            }
            FeedbackLensError::Config { message }
            | FeedbackLensError::Serialization { message }
            | FeedbackLensError::Internal { message } => {
                (StatusCode::INTERNAL_SERVER_ERROR, message)
            }
        };

        (status, axum::Json(json!({ "error": message }))).into_response()
    }
}

/// Result type alias for feedback-lens operations
pub type Result<T> = std::result::Result<T, FeedbackLensError>;
