//! Configuration history retention
//!
//! Keeps a bounded, ordered log of configuration snapshots. The bound
//! (`HistoryLength`) is 1..=31. Each accepted configuration change appends
//! one snapshot; when the log exceeds the bound, the oldest snapshots are
//! evicted first (FIFO) until it holds again.
//!
//! # Guarantees
//!
//! - `len(history) <= history_length` after every operation
//! - Out-of-range bounds are rejected before any state changes
//! - A failed store append leaves the log exactly as it was
//! - A failed store delete during eviction is logged, never returned

mod errors;
mod length;
mod manager;
mod snapshot;

pub use errors::{ErrorKind, RetentionError, RetentionResult};
pub use length::HistoryLength;
pub use manager::HistoryRetentionManager;
pub use snapshot::{History, Iter, SequenceNumber, Snapshot};
