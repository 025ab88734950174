//! CLI argument definitions using clap
//!
//! Commands:
//! - confhist init --data-dir <dir>
//! - confhist configure --history-length <n>
//! - confhist push
//! - confhist list
//! - confhist show <sequence>
//! - confhist prune

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// confhist - bounded configuration history retention
#[derive(Parser, Debug)]
#[command(name = "confhist")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Write a configuration file and create the history directory
    Init {
        /// Path to configuration file
        #[arg(long, default_value = "./confhist.json")]
        config: PathBuf,

        /// Directory holding the history
        #[arg(long)]
        data_dir: PathBuf,

        /// Maximum number of retained snapshots (1-31)
        #[arg(long)]
        history_length: Option<String>,
    },

    /// Change the history length, optionally recording a snapshot, then prune
    Configure {
        /// Path to configuration file
        #[arg(long, default_value = "./confhist.json")]
        config: PathBuf,

        /// Maximum number of retained snapshots (1-31)
        #[arg(long)]
        history_length: String,

        /// Configuration blob to record after saving
        #[arg(long)]
        snapshot: Option<PathBuf>,
    },

    /// Record a snapshot and enforce the history length
    Push {
        /// Path to configuration file
        #[arg(long, default_value = "./confhist.json")]
        config: PathBuf,

        /// File to record; reads stdin when omitted
        #[arg(long)]
        file: Option<PathBuf>,
    },

    /// List retained snapshots, oldest first
    List {
        /// Path to configuration file
        #[arg(long, default_value = "./confhist.json")]
        config: PathBuf,
    },

    /// Write one snapshot's contents
    Show {
        /// Path to configuration file
        #[arg(long, default_value = "./confhist.json")]
        config: PathBuf,

        /// Sequence number of the snapshot
        sequence: u64,

        /// Destination file; raw bytes go to stdout when omitted
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Drop snapshots beyond the history length
    #[command(alias = "drop")]
    Prune {
        /// Path to configuration file
        #[arg(long, default_value = "./confhist.json")]
        config: PathBuf,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
