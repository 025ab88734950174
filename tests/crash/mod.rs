//! Crash testing framework for confhist
//!
//! - Crash injection at deterministic points
//! - Subprocess management
//! - Post-crash validation

pub mod harness;
pub mod scenarios;
pub mod utils;
