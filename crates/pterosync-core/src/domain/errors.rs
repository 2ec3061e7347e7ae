//! Domain error types
//!
//! This module defines the validation errors raised when constructing domain
//! values, and the [`SyncError`] kinds surfaced by every engine operation.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur in domain operations
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Invalid remote path format or content
    #[error("Invalid remote path: {0}")]
    InvalidRemotePath(String),

    /// Generic validation failure
    #[error("Validation failed: {0}")]
    ValidationFailed(String),
}

/// Errors produced while scanning, materializing folders or uploading files
///
/// Network-level variants carry a rendered message rather than the transport
/// error itself so that the core stays independent of the HTTP client.
#[derive(Debug, Error)]
pub enum SyncError {
    /// A request did not complete within its deadline
    #[error("Request timed out: {0}")]
    NetworkTimeout(String),

    /// A connection-level failure (refused, reset, DNS, TLS)
    #[error("Network error: {0}")]
    NetworkError(String),

    /// The remote answered with a status the caller does not tolerate
    #[error("Unexpected status {status}: {body}")]
    UnexpectedStatus {
        /// HTTP status code
        status: u16,
        /// Response body, possibly truncated
        body: String,
    },

    /// The remote answered with a body that could not be decoded
    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    /// A local file or directory could not be read
    #[error("Local I/O error on {}: {source}", path.display())]
    LocalIo {
        /// Path that failed
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// The run was cancelled before the operation completed
    #[error("Operation cancelled")]
    Cancelled,

    /// A domain value failed validation
    #[error(transparent)]
    Domain(#[from] DomainError),
}

impl SyncError {
    /// Creates a [`SyncError::LocalIo`] for the given path
    pub fn local_io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::LocalIo {
            path: path.into(),
            source,
        }
    }

    /// Returns true for failures worth retrying (timeouts and connection errors)
    ///
    /// Status errors are never transient: the remote made a decision.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::NetworkTimeout(_) | Self::NetworkError(_))
    }

    /// Returns the HTTP status for [`SyncError::UnexpectedStatus`]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::UnexpectedStatus { status, .. } => Some(*status),
            _ => None,
        }
    }
}
