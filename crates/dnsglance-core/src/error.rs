//! Error types for dnsglance
//!
//! This module defines all error types used throughout the crate.

use thiserror::Error;

/// Result type alias for dnsglance operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for dnsglance
#[derive(Error, Debug)]
pub enum Error {
    /// DNS resolver errors (the outer DoH fetch)
    #[error("Resolver error: {0}")]
    Resolver(String),

    /// Provider lookup errors (the per-address IP metadata fetch)
    #[error("Provider lookup error: {0}")]
    ProviderLookup(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Response body is not the JSON the backend expects
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// HTTP transport errors
    #[error("HTTP error: {0}")]
    Http(String),

    /// Requested data is not present in a response
    #[error("Not found: {0}")]
    NotFound(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Backend-specific error
    #[error("Backend error ({backend}): {message}")]
    Backend {
        /// Backend name
        backend: String,
        /// Error message
        message: String,
    },

    /// The activation was torn down before it settled
    #[error("Activation cancelled")]
    Cancelled,
}

impl Error {
    /// Create a resolver error
    pub fn resolver(msg: impl Into<String>) -> Self {
        Self::Resolver(msg.into())
    }

    /// Create a provider lookup error
    pub fn provider_lookup(msg: impl Into<String>) -> Self {
        Self::ProviderLookup(msg.into())
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create an HTTP error
    pub fn http(msg: impl Into<String>) -> Self {
        Self::Http(msg.into())
    }

    /// Create a "not found" error
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    /// Create an invalid input error
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Create a backend-specific error
    pub fn backend(backend: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Backend {
            backend: backend.into(),
            message: message.into(),
        }
    }

    /// Whether this error came from a teardown rather than a failure
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}
