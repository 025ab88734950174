//! In-memory history store

use std::collections::BTreeMap;

use super::errors::{StoreError, StoreResult};
use super::HistoryStore;
use crate::retention::{SequenceNumber, Snapshot};

/// A [`HistoryStore`] that keeps snapshots in a `BTreeMap`.
///
/// Nothing survives the process. Useful for embedding the manager where
/// persistence is handled elsewhere, and in tests.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    entries: BTreeMap<SequenceNumber, Snapshot>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, sequence: SequenceNumber) -> bool {
        self.entries.contains_key(&sequence)
    }
}

impl HistoryStore for MemoryStore {
    fn append(&mut self, snapshot: &Snapshot) -> StoreResult<()> {
        if self.entries.contains_key(&snapshot.sequence()) {
            return Err(StoreError::Duplicate(snapshot.sequence()));
        }
        self.entries.insert(snapshot.sequence(), snapshot.clone());
        Ok(())
    }

    fn delete(&mut self, sequence: SequenceNumber) -> StoreResult<()> {
        self.entries.remove(&sequence);
        Ok(())
    }

    fn list(&self) -> StoreResult<Vec<Snapshot>> {
        Ok(self.entries.values().cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn snapshot(sequence: SequenceNumber) -> Snapshot {
        Snapshot::new(sequence, Utc::now(), vec![sequence as u8])
    }

    #[test]
    fn test_list_is_ordered_by_sequence() {
        let mut store = MemoryStore::new();
        store.append(&snapshot(3)).unwrap();
        store.append(&snapshot(1)).unwrap();
        store.append(&snapshot(2)).unwrap();

        let sequences: Vec<_> = store.list().unwrap().iter().map(|s| s.sequence()).collect();
        assert_eq!(sequences, vec![1, 2, 3]);
    }

    #[test]
    fn test_duplicate_rejected() {
        let mut store = MemoryStore::new();
        store.append(&snapshot(1)).unwrap();
        assert!(matches!(
            store.append(&snapshot(1)),
            Err(StoreError::Duplicate(1))
        ));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_delete_is_idempotent() {
        let mut store = MemoryStore::new();
        store.append(&snapshot(1)).unwrap();

        store.delete(1).unwrap();
        store.delete(1).unwrap();
        store.delete(42).unwrap();

        assert!(store.is_empty());
    }
}
