//! History store error types
//!
//! Error codes:
//! - CONFHIST_STORE_IO
//! - CONFHIST_STORE_CORRUPT
//! - CONFHIST_STORE_MANIFEST
//! - CONFHIST_STORE_DUPLICATE
//! - CONFHIST_STORE_LOCKED

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::retention::SequenceNumber;

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors raised by a [`HistoryStore`](super::HistoryStore)
#[derive(Debug, Error)]
pub enum StoreError {
    /// Filesystem failure at a known path
    #[error("I/O error at {}: {}", .path.display(), .source)]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Persisted entry failed verification
    #[error("snapshot {sequence} is corrupt: {reason}")]
    Corrupt {
        sequence: SequenceNumber,
        reason: String,
    },

    /// Manifest could not be serialized or parsed
    #[error("manifest error: {0}")]
    Manifest(String),

    /// An entry with this sequence number already exists
    #[error("snapshot {0} already exists")]
    Duplicate(SequenceNumber),

    /// Another store holds the history directory lock
    #[error("history at {} is locked by another process", .path.display())]
    Locked { path: PathBuf },
}

impl StoreError {
    /// Wraps an I/O error with the path it happened at
    pub fn io_at_path(path: &Path, source: io::Error) -> Self {
        StoreError::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    pub fn corrupt(sequence: SequenceNumber, reason: impl Into<String>) -> Self {
        StoreError::Corrupt {
            sequence,
            reason: reason.into(),
        }
    }

    /// Returns the stable error code string
    pub fn code(&self) -> &'static str {
        match self {
            StoreError::Io { .. } => "CONFHIST_STORE_IO",
            StoreError::Corrupt { .. } => "CONFHIST_STORE_CORRUPT",
            StoreError::Manifest(_) => "CONFHIST_STORE_MANIFEST",
            StoreError::Duplicate(_) => "CONFHIST_STORE_DUPLICATE",
            StoreError::Locked { .. } => "CONFHIST_STORE_LOCKED",
        }
    }
}
