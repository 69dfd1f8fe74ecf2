//! # Client Error Types
//!
//! Error handling for the roster-client library, split by concern: worker
//! lookups, document-store access, platform storage, and configuration.

use anyhow::Result;
use thiserror::Error;

/// Worker lookup result type
pub type LookupResult<T> = Result<T, LookupError>;

/// Document store result type
pub type StoreResult<T> = Result<T, StoreError>;

/// Platform storage result type
pub type PlatformResult<T> = Result<T, PlatformError>;

/// Configuration result type
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Failure kinds for worker directory lookups
#[derive(Debug, Error)]
pub enum LookupError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Search term is empty")]
    EmptySearchTerm,

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Directory endpoint returned status {status}")]
    UpstreamStatus { status: u16 },

    #[error("Malformed directory response: {reason}")]
    MalformedResponse { reason: String },

    #[error("No worker matched the search term")]
    NotFound,
}

impl LookupError {
    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    /// Create a malformed response error for protocol violations
    ///
    /// Use this when the directory response is not the expected array shape
    /// or a matched row is missing required fields. This indicates a broken
    /// upstream that should not be silently defaulted.
    pub fn malformed(reason: impl Into<String>) -> Self {
        Self::MalformedResponse {
            reason: reason.into(),
        }
    }

    /// Check if error is recoverable (worth retrying)
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        match self {
            LookupError::Http(e) => e.is_timeout() || e.is_connect(),
            LookupError::UpstreamStatus { status } => *status >= 500,
            // Protocol violations are not recoverable - the upstream is broken
            LookupError::MalformedResponse { .. } => false,
            _ => false,
        }
    }
}

/// Failure kinds surfaced by document-store operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("Failed precondition: {0}")]
    FailedPrecondition(String),

    #[error("Store unavailable: {0}")]
    Unavailable(String),

    #[error("Timeout waiting for operation: {operation}")]
    Timeout { operation: String },

    #[error("Internal store error: {0}")]
    Internal(String),
}

impl StoreError {
    /// Check if the error is transient (worth retrying with backoff)
    ///
    /// Permission and precondition failures are configuration problems that
    /// retrying cannot fix.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            StoreError::Unavailable(_) | StoreError::Timeout { .. }
        )
    }
}

/// Failures from the platform storage layer during recovery sweeps
#[derive(Debug, Error)]
pub enum PlatformError {
    #[error("Storage operation failed: {0}")]
    Storage(String),

    #[error("Reload request failed: {0}")]
    Reload(String),
}

/// Configuration loading and persistence errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration error: {0}")]
    Invalid(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
}
