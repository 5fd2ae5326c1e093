//! Error types for the form model

use std::time::Duration;
use thiserror::Error;

/// Failures while talking to the cross-validation endpoint
#[derive(Error, Debug)]
pub enum FormError {
    /// Endpoint URL could not be built
    #[error("invalid endpoint url: {0}")]
    InvalidEndpoint(String),

    /// Connection or protocol failure
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Endpoint answered with a non-success status
    #[error("endpoint returned status {0}")]
    Status(u16),

    /// No answer within the configured timeout
    #[error("validation timed out after {0:?}")]
    Timeout(Duration),
}

/// Result type for form operations
pub type Result<T> = std::result::Result<T, FormError>;
