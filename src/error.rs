//! Error types for the filtimpay library

use thiserror::Error;

/// Result type alias for filtimpay operations
pub type Result<T> = std::result::Result<T, FiltimPayError>;

/// Main error type for filtimpay operations
#[derive(Error, Debug)]
pub enum FiltimPayError {
    /// Missing or malformed merchant configuration
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// A payment request field is missing or invalid
    #[error("Validation error: {field}: {message}")]
    Validation { field: String, message: String },

    /// Signature does not match the payload
    #[error("Invalid signature: {message}")]
    InvalidSignature { message: String },

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Base64 encoding/decoding error
    #[error("Base64 error: {0}")]
    Base64(#[from] base64::DecodeError),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl FiltimPayError {
    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create a validation error for a single request field
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create an invalid signature error
    pub fn invalid_signature(message: impl Into<String>) -> Self {
        Self::InvalidSignature {
            message: message.into(),
        }
    }

    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::Configuration { .. })
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation { .. })
    }
}
