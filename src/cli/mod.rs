//! CLI module for confhist
//!
//! Provides command-line interface for:
//! - init: write the configuration file, create the history directory
//! - configure: save a new history length (the form save action)
//! - push: record a snapshot
//! - list / show: inspect the history
//! - prune (alias drop): enforce the history length

mod args;
mod commands;
mod errors;
mod io;

pub use args::{Cli, Command};
pub use commands::{configure, init, list, prune, push, run, run_command, show};
pub use errors::{CliError, CliErrorCode, CliResult};
pub use io::{read_blob, write_blob, write_response};
