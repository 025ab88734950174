//! Snapshot records and the read-only history view

use std::slice;
use std::sync::Arc;

use chrono::{DateTime, Utc};

/// Monotonically increasing snapshot number, starting at 1
pub type SequenceNumber = u64;

/// One immutable historical record of configuration state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    sequence: SequenceNumber,
    created_at: DateTime<Utc>,
    blob: Vec<u8>,
}

impl Snapshot {
    /// Creates a snapshot record.
    pub fn new(sequence: SequenceNumber, created_at: DateTime<Utc>, blob: Vec<u8>) -> Self {
        Self {
            sequence,
            created_at,
            blob,
        }
    }

    pub fn sequence(&self) -> SequenceNumber {
        self.sequence
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// The opaque configuration blob
    pub fn blob(&self) -> &[u8] {
        &self.blob
    }

    pub fn size(&self) -> usize {
        self.blob.len()
    }
}

/// A point-in-time copy of the history, oldest snapshot first.
///
/// Taking a `History` never blocks later writers and later writes never
/// change it. It can be iterated any number of times.
#[derive(Debug, Clone, Default)]
pub struct History {
    entries: Vec<Arc<Snapshot>>,
}

impl History {
    pub(crate) fn new(entries: Vec<Arc<Snapshot>>) -> Self {
        Self { entries }
    }

    /// Iterates oldest first.
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            inner: self.entries.iter(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Newest snapshot, if any
    pub fn latest(&self) -> Option<&Snapshot> {
        self.entries.last().map(|s| s.as_ref())
    }

    /// Oldest snapshot, if any
    pub fn oldest(&self) -> Option<&Snapshot> {
        self.entries.first().map(|s| s.as_ref())
    }

    /// Sequence numbers, oldest first
    pub fn sequences(&self) -> Vec<SequenceNumber> {
        self.iter().map(Snapshot::sequence).collect()
    }
}

/// Iterator over a [`History`].
#[derive(Debug, Clone)]
pub struct Iter<'a> {
    inner: slice::Iter<'a, Arc<Snapshot>>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = &'a Snapshot;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|s| s.as_ref())
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl DoubleEndedIterator for Iter<'_> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back().map(|s| s.as_ref())
    }
}

impl ExactSizeIterator for Iter<'_> {}

impl<'a> IntoIterator for &'a History {
    type Item = &'a Snapshot;
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
