//! Configuration file
//!
//! A single JSON object:
//!
//! ```json
//! {
//!   "data_dir": "/var/lib/confhist",
//!   "history_length": 10,
//!   "log_format": "text"
//! }
//! ```
//!
//! Only `data_dir` is required. `history_length` must lie in 1..=31; a file
//! holding anything else fails to load.

use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::retention::HistoryLength;

/// Result type for configuration operations
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Configuration loading and saving errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {}: {}", .path.display(), .source)]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to write config {}: {}", .path.display(), .source)]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid config JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Log output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Configuration file structure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Data directory (required); history lives in `<data_dir>/history`
    pub data_dir: PathBuf,

    /// Maximum number of retained snapshots (optional, default 10)
    #[serde(default)]
    pub history_length: HistoryLength,

    /// Log output format (optional, default "text")
    #[serde(default)]
    pub log_format: LogFormat,
}

impl Config {
    /// Configuration with defaults for everything but the data directory
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            history_length: HistoryLength::default(),
            log_format: LogFormat::default(),
        }
    }

    /// Load and validate configuration from file
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let config: Config = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> ConfigResult<()> {
        if self.data_dir.as_os_str().is_empty() {
            return Err(ConfigError::Invalid("data_dir must not be empty".into()));
        }
        Ok(())
    }

    /// Write the configuration atomically.
    ///
    /// The new content goes to `<path>.tmp`, is fsynced, then renamed over
    /// `path`, and the parent directory is fsynced so the rename survives
    /// power loss. Readers see either the old file or the new one.
    pub fn save(&self, path: &Path) -> ConfigResult<()> {
        self.validate()?;
        let json = serde_json::to_string_pretty(self)?;

        let tmp_path = tmp_path_for(path);
        if let Err(source) = write_and_rename(&tmp_path, path, json.as_bytes()) {
            let _ = fs::remove_file(&tmp_path);
            return Err(ConfigError::Write {
                path: path.to_path_buf(),
                source,
            });
        }
        Ok(())
    }

    /// Data directory as Path
    pub fn data_path(&self) -> &Path {
        &self.data_dir
    }
}

fn write_and_rename(tmp_path: &Path, path: &Path, contents: &[u8]) -> io::Result<()> {
    let mut file = File::create(tmp_path)?;
    file.write_all(contents)?;
    file.write_all(b"\n")?;
    file.sync_all()?;
    fs::rename(tmp_path, path)?;
    File::open(parent_dir(path))?.sync_all()
}

fn parent_dir(path: &Path) -> &Path {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    }
}

fn tmp_path_for(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}
