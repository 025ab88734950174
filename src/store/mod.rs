//! History persistence
//!
//! The retention manager treats persistence as a boundary: it hands each
//! accepted snapshot to a [`HistoryStore`], asks it to delete evicted ones,
//! and reads it back on open. Any failure surfaces as a [`StoreError`];
//! stores perform no retries.
//!
//! # Implementations
//!
//! - [`MemoryStore`]: process-local, nothing persisted
//! - [`DirStore`]: one checksummed directory per snapshot, atomic publish

mod checksum;
mod dir;
mod errors;
mod manifest;
mod memory;

pub use checksum::{compute_checksum, format_checksum, parse_checksum};
pub use dir::{history_dir, DirStore};
pub use errors::{StoreError, StoreResult};
pub use manifest::EntryManifest;
pub use memory::MemoryStore;

use crate::retention::{SequenceNumber, Snapshot};

/// Persistence collaborator for the history log.
///
/// The sequence number assigned by the manager is the entry id.
pub trait HistoryStore: Send + Sync {
    /// Persist one snapshot. Must be all-or-nothing: after an error the
    /// store holds no trace of `snapshot`.
    fn append(&mut self, snapshot: &Snapshot) -> StoreResult<()>;

    /// Remove the snapshot with this sequence number. Deleting an entry that
    /// does not exist succeeds.
    fn delete(&mut self, sequence: SequenceNumber) -> StoreResult<()>;

    /// All persisted snapshots, ordered by sequence number ascending.
    fn list(&self) -> StoreResult<Vec<Snapshot>>;
}

impl<S: HistoryStore + ?Sized> HistoryStore for Box<S> {
    fn append(&mut self, snapshot: &Snapshot) -> StoreResult<()> {
        (**self).append(snapshot)
    }

    fn delete(&mut self, sequence: SequenceNumber) -> StoreResult<()> {
        (**self).delete(sequence)
    }

    fn list(&self) -> StoreResult<Vec<Snapshot>> {
        (**self).list()
    }
}
