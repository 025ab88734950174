//! confhist - bounded configuration history retention
//!
//! Keeps the last N (1..=31) snapshots of a configuration, evicting the
//! oldest first, with a crash-safe directory store and a small CLI.

pub mod cli;
pub mod config;
pub mod configure;
pub mod crash_point;
pub mod logging;
pub mod retention;
pub mod store;
