//! Retention error types
//!
//! Error codes:
//! - CONFHIST_OUT_OF_RANGE (user-correctable)
//! - CONFHIST_INVALID_LENGTH (user-correctable)
//! - CONFHIST_STORAGE_UNAVAILABLE (surfaced, caller may retry)
//! - CONFHIST_EVICTION_FAILURE (logged, never returned from a mutating call)

use std::fmt;

use thiserror::Error;

use super::length::HistoryLength;
use super::snapshot::SequenceNumber;
use crate::store::StoreError;

/// Result type for retention operations
pub type RetentionResult<T> = Result<T, RetentionError>;

/// Coarse classification of a [`RetentionError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// History length outside 1..=31
    OutOfRange,
    /// History length text is not an integer
    InvalidLength,
    /// The persistence collaborator rejected an operation
    StorageUnavailable,
    /// Deleting an evicted snapshot from the store failed
    EvictionFailure,
}

impl ErrorKind {
    /// Returns the stable error code string
    pub fn code(&self) -> &'static str {
        match self {
            ErrorKind::OutOfRange => "CONFHIST_OUT_OF_RANGE",
            ErrorKind::InvalidLength => "CONFHIST_INVALID_LENGTH",
            ErrorKind::StorageUnavailable => "CONFHIST_STORAGE_UNAVAILABLE",
            ErrorKind::EvictionFailure => "CONFHIST_EVICTION_FAILURE",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Errors raised by the history retention manager
#[derive(Debug, Error)]
pub enum RetentionError {
    /// Requested bound is outside the accepted range
    #[error("history length {value} is out of range (must be between 1 and 31)")]
    OutOfRange { value: i64 },

    /// Requested bound could not be parsed as an integer
    #[error("history length '{input}' is not an integer")]
    InvalidLength { input: String },

    /// Store rejected the write; in-memory state was rolled back
    #[error("history storage unavailable: {source}")]
    StorageUnavailable {
        #[source]
        source: StoreError,
    },

    /// An evicted snapshot could not be removed from the store
    #[error("failed to delete evicted snapshot {sequence}: {source}")]
    EvictionFailure {
        sequence: SequenceNumber,
        #[source]
        source: StoreError,
    },
}

impl RetentionError {
    /// Returns the error kind
    pub fn kind(&self) -> ErrorKind {
        match self {
            RetentionError::OutOfRange { .. } => ErrorKind::OutOfRange,
            RetentionError::InvalidLength { .. } => ErrorKind::InvalidLength,
            RetentionError::StorageUnavailable { .. } => ErrorKind::StorageUnavailable,
            RetentionError::EvictionFailure { .. } => ErrorKind::EvictionFailure,
        }
    }

    /// Returns the stable error code string
    pub fn code(&self) -> &'static str {
        self.kind().code()
    }

    /// Whether the user can fix this by submitting a different value
    pub fn is_user_correctable(&self) -> bool {
        matches!(
            self.kind(),
            ErrorKind::OutOfRange | ErrorKind::InvalidLength
        )
    }

    /// Message suitable for showing to the person who submitted the change.
    ///
    /// Validation failures name the accepted range; storage problems are
    /// reported as a generic retry-later failure without internal detail.
    pub fn user_message(&self) -> String {
        if self.is_user_correctable() {
            format!(
                "History length must be an integer between {} and {}",
                HistoryLength::MIN,
                HistoryLength::MAX
            )
        } else {
            "The configuration history could not be updated, please try again later".to_string()
        }
    }
}

impl From<StoreError> for RetentionError {
    fn from(source: StoreError) -> Self {
        RetentionError::StorageUnavailable { source }
    }
}
