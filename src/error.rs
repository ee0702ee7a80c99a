//! Error types for the FraudShield client library.

/// All errors that can occur when using the FraudShield client.
#[derive(Debug, thiserror::Error)]
pub enum FraudShieldError {
    /// HTTP transport failed.
    #[cfg(feature = "async")]
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The backend answered with a non-success status.
    #[error("API error (status {status}): {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Response body, or a placeholder if it could not be read.
        message: String,
    },

    /// JSON serialization or deserialization failed.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// User store backend failed.
    #[error("user store error: {0}")]
    Storage(Box<dyn core::error::Error + Send + Sync>),

    /// No user matches the given email and password.
    #[error("invalid email or password")]
    InvalidCredentials,

    /// Signup attempted with an email that already has an account.
    #[error("email already registered: {0}")]
    EmailTaken(String),

    /// Caller supplied a value outside the accepted range.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The view that issued the request was closed before it completed.
    #[error("request cancelled: the owning view was closed")]
    Cancelled,
}

/// Convenience alias used throughout the crate.
pub type Result<T> = core::result::Result<T, FraudShieldError>;
