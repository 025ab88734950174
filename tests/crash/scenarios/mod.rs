//! Crash scenarios, grouped by the operation interrupted

mod evict;
mod push;
