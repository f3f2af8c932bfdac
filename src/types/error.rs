//! Error types for the card vault
//!
//! This module defines the errors surfaced by the store, the orchestrator and
//! the charge service.
//!
//! # Error Categories
//!
//! - **Logic Errors**: updating a record that does not exist, inserting into a
//!   document with no root container
//! - **Charge Errors**: the charge exceeded its time limit or its task failed
//! - **I/O Errors**: a save failed for any reason other than a vanished
//!   target, or recovery itself failed
//!
//! A corrupt or missing backing file is not an error: the store recovers from it
//! locally. An invalid card is not an error either, it is a `false` from
//! [`crate::core::validator::is_valid`].

use std::path::Path;
use std::time::Duration;
use thiserror::Error;

/// Result type for card vault operations
pub type Result<T> = std::result::Result<T, CardError>;

/// Main error type for the card vault
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CardError {
    /// An update targeted a username with no entry in the document
    ///
    /// Callers must find a record before updating it, so this indicates a
    /// logic error or a concurrent writer removing the entry.
    #[error("No card on file for user '{username}'")]
    RecordNotFound {
        /// The username that was not found
        username: String,
    },

    /// The document has no root container to insert into
    ///
    /// `load` always returns a rooted document, so this is fatal.
    #[error("Card storage unavailable: {path} has no root container")]
    StorageUnavailable {
        /// Backing file of the document
        path: String,
    },

    /// The charge did not complete within the allotted time
    ///
    /// Retry policy is the caller's decision.
    #[error("Charge timed out after {}ms", .timeout.as_millis())]
    Timeout {
        /// The time limit that elapsed
        timeout: Duration,
    },

    /// The charge task ended without producing a result
    #[error("Charge failed: {message}")]
    ChargeFailed {
        /// Description of the failure
        message: String,
    },

    /// I/O error that recovery does not absorb
    ///
    /// A failed save leaves the backing file as it was.
    #[error("I/O error: {message}")]
    Io {
        /// Description of the I/O error
        message: String,
    },
}

impl From<std::io::Error> for CardError {
    fn from(error: std::io::Error) -> Self {
        CardError::Io {
            message: error.to_string(),
        }
    }
}

impl From<serde_json::Error> for CardError {
    fn from(error: serde_json::Error) -> Self {
        CardError::Io {
            message: format!("failed to serialize card document: {}", error),
        }
    }
}

// Helper functions for creating common errors

impl CardError {
    /// Create a RecordNotFound error
    pub fn record_not_found(username: &str) -> Self {
        CardError::RecordNotFound {
            username: username.to_string(),
        }
    }

    /// Create a StorageUnavailable error
    pub fn storage_unavailable(path: &Path) -> Self {
        CardError::StorageUnavailable {
            path: path.display().to_string(),
        }
    }

    /// Create a Timeout error
    pub fn timeout(timeout: Duration) -> Self {
        CardError::Timeout { timeout }
    }

    /// Create a ChargeFailed error
    pub fn charge_failed(message: impl Into<String>) -> Self {
        CardError::ChargeFailed {
            message: message.into(),
        }
    }

    /// Whether the failed operation may be retried by the caller
    pub fn is_retryable(&self) -> bool {
        matches!(self, CardError::Timeout { .. })
    }
}
