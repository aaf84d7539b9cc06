//! Error types for request validation.

use crate::ids::IdError;

/// Result type for validation operations.
pub type Result<T> = std::result::Result<T, ValidationError>;

/// Errors raised while turning a request body into a workflow input.
///
/// Validation always runs before any provider call, so none of these ever
/// reach the payment provider.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// A required field is absent, `null`, empty or of the wrong type.
    #[error("Missing required fields")]
    MissingFields,

    /// The amount is present but cannot be charged.
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
}

impl From<IdError> for ValidationError {
    fn from(_: IdError) -> Self {
        Self::MissingFields
    }
}
