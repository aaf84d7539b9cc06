//! API error types and responses.
//!
//! Callers only ever see two shapes: a 400 naming the validation problem, or
//! a generic 500. Provider details are logged here and never returned.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use stripe_backend_core::ValidationError;

use crate::workflow::WorkflowError;

/// Body for validation failures on missing fields.
pub const MISSING_FIELDS_MESSAGE: &str = "Missing required fields";

/// Body for validation failures on an unusable amount.
pub const INVALID_AMOUNT_MESSAGE: &str = "Invalid amount";

/// Body for every server-side failure.
pub const INTERNAL_ERROR_MESSAGE: &str = "Internal Server Error";

/// API error type.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Bad request - the body failed validation.
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    /// A payment workflow failed.
    #[error("workflow error: {0}")]
    Workflow(#[from] WorkflowError),
}

/// JSON error response body.
#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: &'static str,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            Self::Validation(ValidationError::MissingFields) => {
                (StatusCode::BAD_REQUEST, MISSING_FIELDS_MESSAGE)
            }
            Self::Validation(ValidationError::InvalidAmount(_)) => {
                (StatusCode::BAD_REQUEST, INVALID_AMOUNT_MESSAGE)
            }
            Self::Workflow(e) => {
                tracing::error!(operation = e.operation(), error = %e, "Payment workflow failed");
                (StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_ERROR_MESSAGE)
            }
        };

        (status, Json(ErrorResponse { error: message })).into_response()
    }
}
