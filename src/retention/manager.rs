//! Bounded history log with FIFO eviction

use std::collections::VecDeque;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::Utc;
use tracing::{debug, info, warn};

use super::errors::{RetentionError, RetentionResult};
use super::length::HistoryLength;
use super::snapshot::{History, SequenceNumber, Snapshot};
use crate::store::HistoryStore;

struct Inner<S> {
    length: HistoryLength,
    log: VecDeque<Arc<Snapshot>>,
    next_sequence: SequenceNumber,
    /// Evicted snapshots whose store deletion failed. Kept in memory only: a
    /// restart before the retry reloads them from the store.
    pending_deletes: Vec<SequenceNumber>,
    store: S,
}

impl<S: HistoryStore> Inner<S> {
    /// Pops oldest entries until the bound holds and deletes them from the
    /// store. Returns how many entries left the log.
    fn evict_over_bound(&mut self) -> usize {
        let mut evicted = 0;
        while self.log.len() > self.length.as_usize() {
            let Some(oldest) = self.log.pop_front() else {
                break;
            };
            evicted += 1;
            self.delete_from_store(oldest.sequence());
        }
        evicted
    }

    fn delete_from_store(&mut self, sequence: SequenceNumber) {
        match self.store.delete(sequence) {
            Ok(()) => debug!(sequence, "evicted snapshot"),
            Err(source) => {
                let err = RetentionError::EvictionFailure { sequence, source };
                warn!(
                    code = err.code(),
                    error = %err,
                    "eviction delete failed, will retry on prune"
                );
                self.pending_deletes.push(sequence);
            }
        }
    }

    fn retry_pending_deletes(&mut self) {
        let pending = std::mem::take(&mut self.pending_deletes);
        for sequence in pending {
            self.delete_from_store(sequence);
        }
    }
}

/// Owns the bounded, ordered history of configuration snapshots.
///
/// All mutating operations (`set_history_length`, `record_snapshot`,
/// `prune`) are serialized by one exclusive lock held for the whole call,
/// store I/O included. `list_history` takes the shared lock just long enough
/// to copy the log.
///
/// # Usage
///
/// ```ignore
/// let manager = HistoryRetentionManager::open(MemoryStore::new(), HistoryLength::DEFAULT)?;
/// manager.set_history_length(3)?;
/// let sequence = manager.record_snapshot(config_bytes)?;
/// let evicted = manager.prune()?;
/// ```
pub struct HistoryRetentionManager<S> {
    inner: RwLock<Inner<S>>,
    evicted_on_open: usize,
}

impl<S: HistoryStore> HistoryRetentionManager<S> {
    /// Builds a manager over `store`, loading whatever it already holds.
    ///
    /// Loaded snapshots keep their sequence numbers and new ones continue
    /// after the newest. If the store holds more than `length` entries the
    /// oldest are evicted before returning.
    ///
    /// # Errors
    ///
    /// `StorageUnavailable` if the store cannot be listed.
    pub fn open(store: S, length: HistoryLength) -> RetentionResult<Self> {
        let mut loaded = store.list()?;
        loaded.sort_by_key(Snapshot::sequence);

        let next_sequence = loaded.last().map(|s| s.sequence() + 1).unwrap_or(1);
        let mut inner = Inner {
            length,
            log: loaded.into_iter().map(Arc::new).collect(),
            next_sequence,
            pending_deletes: Vec::new(),
            store,
        };

        let loaded_count = inner.log.len();
        let evicted = inner.evict_over_bound();
        info!(
            history_length = length.get(),
            loaded = loaded_count,
            evicted,
            "history opened"
        );

        Ok(Self {
            inner: RwLock::new(inner),
            evicted_on_open: evicted,
        })
    }

    // A panic can only happen before any field is touched (all fallible
    // steps precede mutation), so a poisoned guard still holds valid state.
    fn read(&self) -> RwLockReadGuard<'_, Inner<S>> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Inner<S>> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Changes the bound and evicts oldest entries down to it.
    ///
    /// # Errors
    ///
    /// `OutOfRange` when `n <= 0 || n >= 32`; bound and log are untouched.
    pub fn set_history_length(&self, n: i64) -> RetentionResult<()> {
        let length = HistoryLength::new(n)?;

        let mut inner = self.write();
        let previous = inner.length;
        inner.length = length;
        let evicted = inner.evict_over_bound();

        info!(
            from = previous.get(),
            to = length.get(),
            evicted,
            "history length changed"
        );
        Ok(())
    }

    /// Appends a snapshot of `blob` and enforces the bound.
    ///
    /// The snapshot is persisted before it enters the log. Eviction deletes
    /// that fail are logged and retried by [`prune`](Self::prune); they do
    /// not fail this call.
    ///
    /// # Errors
    ///
    /// `StorageUnavailable` if the store rejects the append. The log and the
    /// sequence counter are then exactly as before the call.
    pub fn record_snapshot(&self, blob: impl Into<Vec<u8>>) -> RetentionResult<SequenceNumber> {
        let mut inner = self.write();

        let sequence = inner.next_sequence;
        let snapshot = Snapshot::new(sequence, Utc::now(), blob.into());

        if let Err(source) = inner.store.append(&snapshot) {
            let err = RetentionError::StorageUnavailable { source };
            warn!(sequence, code = err.code(), error = %err, "snapshot not recorded");
            return Err(err);
        }

        let size = snapshot.size();
        inner.next_sequence = sequence + 1;
        inner.log.push_back(Arc::new(snapshot));
        let evicted = inner.evict_over_bound();

        info!(sequence, size, evicted, "snapshot recorded");
        Ok(sequence)
    }

    /// Current history, oldest first.
    pub fn list_history(&self) -> History {
        let inner = self.read();
        History::new(inner.log.iter().cloned().collect())
    }

    /// Re-enforces the bound on demand.
    ///
    /// Returns the number of snapshots evicted from the log; 0 when already
    /// within bound, so calling it repeatedly is harmless. Store deletions
    /// that failed earlier are retried.
    pub fn prune(&self) -> RetentionResult<usize> {
        let mut inner = self.write();

        let evicted = inner.evict_over_bound();
        if !inner.pending_deletes.is_empty() {
            inner.retry_pending_deletes();
        }

        info!(
            evicted,
            retained = inner.log.len(),
            pending_deletes = inner.pending_deletes.len(),
            "history pruned"
        );
        Ok(evicted)
    }

    /// The configured bound
    pub fn history_length(&self) -> HistoryLength {
        self.read().length
    }

    pub fn len(&self) -> usize {
        self.read().log.len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().log.is_empty()
    }

    /// Newest snapshot, if any
    pub fn latest(&self) -> Option<Arc<Snapshot>> {
        self.read().log.back().cloned()
    }

    /// Snapshot with the given sequence number, if still retained
    pub fn get(&self, sequence: SequenceNumber) -> Option<Arc<Snapshot>> {
        let inner = self.read();
        inner
            .log
            .binary_search_by_key(&sequence, |s| s.sequence())
            .ok()
            .and_then(|index| inner.log.get(index).cloned())
    }

    /// Snapshots evicted by [`open`](Self::open) because the store held more
    /// than the bound
    pub fn evicted_on_open(&self) -> usize {
        self.evicted_on_open
    }

    /// Sequence numbers evicted from the log but still awaiting deletion
    ///
    /// The list is not persisted. If the manager is dropped before
    /// [`prune`](Self::prune) retries them, the next [`open`](Self::open)
    /// loads these snapshots again; they are evicted again only when the
    /// bound it is opened with is exceeded.
    pub fn pending_deletes(&self) -> Vec<SequenceNumber> {
        self.read().pending_deletes.clone()
    }

    /// Consumes the manager, returning the store.
    pub fn into_store(self) -> S {
        self.inner
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner)
            .store
    }
}
