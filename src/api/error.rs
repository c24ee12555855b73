//! Unified API error handling
//!
//! Only three endpoints can answer with a non-200 status: `/generate`
//! (model not ready or adapter failure) and correlate-evidence (missing
//! required fields). Everything else degrades to fallback payloads.

use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use serde::Serialize;
use uuid::Uuid;

/// Standard error response format
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    /// Error type/code
    pub error: String,
    /// Human-readable error message
    pub message: String,
    /// Unique request ID for tracing
    pub request_id: String,
}

/// Unified API error type
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum ApiError {
    /// Missing or invalid request fields (400)
    #[error("Invalid request: {0}")]
    BadRequest(String),

    /// Model adapter never became ready (503)
    #[error("Model not loaded: {0}")]
    ModelUnavailable(String),

    /// Generation failed mid-call (502)
    #[error("Generation failed: {0}")]
    Generation(String),
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::ModelUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Generation(_) => StatusCode::BAD_GATEWAY,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        let error_type = match self {
            ApiError::BadRequest(_) => "bad_request",
            ApiError::ModelUnavailable(_) => "model_unavailable",
            ApiError::Generation(_) => "generation_failed",
        };

        tracing::error!(
            error_type = error_type,
            status = status.as_u16(),
            message = %self,
            "API error"
        );

        HttpResponse::build(status).json(ErrorResponse {
            success: false,
            error: error_type.to_string(),
            message: self.to_string(),
            request_id: Uuid::new_v4().to_string(),
        })
    }
}

impl From<crate::service::GeneratorError> for ApiError {
    fn from(err: crate::service::GeneratorError) -> Self {
        match err {
            crate::service::GeneratorError::Unavailable(msg) => ApiError::ModelUnavailable(msg),
            other => ApiError::Generation(other.to_string()),
        }
    }
}
