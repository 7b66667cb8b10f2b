//! # Sortwise Core Kernel Errors
//!
//! [`Error`] is the top-level error for the crate. Each subsystem defines its
//! own typed error enum; they all convert into this one with `?`.
use std::path::PathBuf;
use std::result::Result as StdResult;

use thiserror::Error as ThisError;

use crate::condition::error::ConditionError;
use crate::metadata::error::MetadataError;
use crate::sorting::error::SortError;
use crate::storage::error::StorageSystemError;

/// Error type for all sortwise operations
#[derive(Debug, ThisError)]
pub enum Error {
    /// Plugin metadata construction or resolution error
    #[error("Metadata error: {0}")]
    Metadata(#[from] MetadataError),

    /// A condition string could not be evaluated
    #[error("Condition error: {0}")]
    Condition(#[from] ConditionError),

    /// Sorting could not produce a valid order
    #[error("Sort error: {0}")]
    Sort(#[from] SortError),

    /// Reading metadata lists, scans or configuration failed
    #[error("Storage system error: {0}")]
    StorageSystem(#[from] StorageSystemError),

    /// A background task failed to complete
    #[error("Task failed during '{operation}': {message}")]
    Task { operation: String, message: String },

    /// Generic error with message
    #[error("Error: {0}")]
    Other(String),
}

/// Shorthand for Result with our Error type
pub type Result<T> = StdResult<T, Error>;

impl From<&str> for Error {
    fn from(msg: &str) -> Self {
        Error::Other(msg.to_string())
    }
}

impl From<String> for Error {
    fn from(msg: String) -> Self {
        Error::Other(msg)
    }
}

impl Error {
    /// Wrap an I/O error with the operation and path that produced it
    pub fn io(source: std::io::Error, operation: impl Into<String>, path: PathBuf) -> Self {
        Error::StorageSystem(StorageSystemError::io(source, operation, path))
    }

    /// True if this error means no valid load order exists
    pub fn is_cycle(&self) -> bool {
        matches!(self, Error::Sort(e) if e.is_cycle())
    }
}
