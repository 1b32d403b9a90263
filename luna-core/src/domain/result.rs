//! Result and error types for the core library

use thiserror::Error;

/// Core library error type
///
/// Every variant resolves to a recoverable state in the client. Only
/// `Unauthenticated` has a side effect: it always routes through the
/// logout transition.
#[derive(Error, Debug)]
pub enum Error {
    /// Missing or rejected credential
    #[error("Not signed in: {0}")]
    Unauthenticated(String),

    /// Input rejected before anything was sent or stored
    #[error("{0}")]
    Validation(String),

    /// Network failure, timeout or server-side (5xx) error
    #[error("Backend unavailable: {0}")]
    Transient(String),

    /// Request understood but refused by the backend (non-auth 4xx)
    #[error("{0}")]
    Rejected(String),

    #[error("Not found: {0}")]
    NotFound(String),

    /// A newer load replaced this one before it settled
    #[error("Load superseded")]
    Cancelled,

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create an unauthenticated error
    pub fn unauthenticated(msg: impl Into<String>) -> Self {
        Self::Unauthenticated(msg.into())
    }

    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create a transient backend error
    pub fn transient(msg: impl Into<String>) -> Self {
        Self::Transient(msg.into())
    }

    /// Create a not found error
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    /// Create a storage error
    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage(msg.into())
    }

    /// True when the failure means the credential is no longer usable
    pub fn is_unauthenticated(&self) -> bool {
        matches!(self, Self::Unauthenticated(_))
    }

    /// True when retrying the same call may succeed
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Transient(_))
    }
}

/// Core library result type
pub type Result<T> = std::result::Result<T, Error>;
