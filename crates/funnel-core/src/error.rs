//! # Checkout Error Types
//!
//! Typed error handling for the checkout funnel.
//! All gateway and handler operations return `Result<T, CheckoutError>`.

use thiserror::Error;

/// Core error type for checkout creation
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// Missing or malformed request input
    #[error("Invalid request: {0}")]
    Validation(String),

    /// Missing deployment configuration (store domain, access token)
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Upstream answered but gave nothing usable.
    /// `body` keeps the raw response for diagnostics.
    #[error("Upstream error: {message}")]
    Upstream { message: String, body: String },

    /// User-facing validation message returned inside a successful mutation
    #[error("{0}")]
    UserError(String),

    /// Network/HTTP error talking to the commerce platform
    #[error("Transport error: {0}")]
    Transport(String),

    /// Response body could not be decoded
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl CheckoutError {
    /// Returns the HTTP status code appropriate for this error.
    /// The cart handler answers `Upstream` with 400 instead.
    pub fn status_code(&self) -> u16 {
        match self {
            CheckoutError::Validation(_) => 400,
            CheckoutError::Configuration(_) => 500,
            CheckoutError::Upstream { .. } => 500,
            CheckoutError::UserError(_) => 400,
            CheckoutError::Transport(_) => 500,
            CheckoutError::Serialization(_) => 500,
        }
    }

    /// True when the error was detected before any outbound call
    pub fn is_local(&self) -> bool {
        matches!(
            self,
            CheckoutError::Validation(_) | CheckoutError::Configuration(_)
        )
    }
}

impl From<serde_json::Error> for CheckoutError {
    fn from(err: serde_json::Error) -> Self {
        CheckoutError::Serialization(err.to_string())
    }
}

/// Result type alias for checkout operations
pub type CheckoutResult<T> = Result<T, CheckoutError>;
