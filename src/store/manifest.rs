//! Per-entry manifest for the directory store
//!
//! Format:
//! ```json
//! {
//!   "sequence": 7,
//!   "created_at": "2026-10-15T09:30:00Z",
//!   "checksum": "crc32:deadbeef",
//!   "size": 5120,
//!   "format_version": 1
//! }
//! ```

use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::checksum::{compute_checksum, format_checksum, parse_checksum};
use super::errors::{StoreError, StoreResult};
use crate::retention::{SequenceNumber, Snapshot};

/// Current manifest format version
pub const FORMAT_VERSION: u8 = 1;

/// Authoritative descriptor of one persisted snapshot.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct EntryManifest {
    pub sequence: SequenceNumber,
    pub created_at: DateTime<Utc>,
    /// CRC32 of the blob (format: "crc32:XXXXXXXX")
    pub checksum: String,
    /// Blob length in bytes
    pub size: u64,
    pub format_version: u8,
}

impl EntryManifest {
    /// Describes `snapshot`, checksumming its blob.
    pub fn for_snapshot(snapshot: &Snapshot) -> Self {
        Self {
            sequence: snapshot.sequence(),
            created_at: snapshot.created_at(),
            checksum: format_checksum(compute_checksum(snapshot.blob())),
            size: snapshot.size() as u64,
            format_version: FORMAT_VERSION,
        }
    }

    pub fn to_json(&self) -> StoreResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| StoreError::Manifest(format!("Failed to serialize manifest: {}", e)))
    }

    pub fn from_json(json: &str) -> StoreResult<Self> {
        serde_json::from_str(json)
            .map_err(|e| StoreError::Manifest(format!("Failed to parse manifest: {}", e)))
    }

    /// Writes the manifest and fsyncs it.
    pub fn write_to_file(&self, path: &Path) -> StoreResult<()> {
        let json = self.to_json()?;

        let mut file = File::create(path).map_err(|e| StoreError::io_at_path(path, e))?;
        file.write_all(json.as_bytes())
            .map_err(|e| StoreError::io_at_path(path, e))?;
        file.sync_all().map_err(|e| StoreError::io_at_path(path, e))
    }

    pub fn read_from_file(path: &Path) -> StoreResult<Self> {
        let json = fs::read_to_string(path).map_err(|e| StoreError::io_at_path(path, e))?;
        Self::from_json(&json)
    }

    /// Checks `blob` against the recorded size and checksum.
    ///
    /// # Errors
    ///
    /// `Corrupt` on any mismatch or an unsupported format version.
    pub fn verify(&self, blob: &[u8]) -> StoreResult<()> {
        if self.format_version != FORMAT_VERSION {
            return Err(StoreError::corrupt(
                self.sequence,
                format!("unsupported format version {}", self.format_version),
            ));
        }

        if blob.len() as u64 != self.size {
            return Err(StoreError::corrupt(
                self.sequence,
                format!("size mismatch: expected {}, found {}", self.size, blob.len()),
            ));
        }

        let expected = parse_checksum(&self.checksum).ok_or_else(|| {
            StoreError::corrupt(
                self.sequence,
                format!("malformed checksum '{}'", self.checksum),
            )
        })?;
        let actual = compute_checksum(blob);
        if expected != actual {
            return Err(StoreError::corrupt(
                self.sequence,
                format!(
                    "checksum mismatch: expected {}, found {}",
                    self.checksum,
                    format_checksum(actual)
                ),
            ));
        }

        Ok(())
    }
}
