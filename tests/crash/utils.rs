//! Crash testing utilities
//!
//! - Creating initialized temp environments
//! - Validating post-crash on-disk state

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

use super::harness::execute_ok;

/// An initialized confhist environment in a temp directory
pub struct CrashEnv {
    _temp_dir: TempDir,
    pub config: PathBuf,
    pub data_dir: PathBuf,
}

impl CrashEnv {
    /// Runs `confhist init` with the given history length
    pub fn init(history_length: u8) -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let config = temp_dir.path().join("confhist.json");
        let data_dir = temp_dir.path().join("data");

        let length = history_length.to_string();
        execute_ok(
            &[
                "init",
                "--data-dir",
                data_dir.to_str().unwrap(),
                "--history-length",
                &length,
            ],
            &config,
        );

        Self {
            _temp_dir: temp_dir,
            config,
            data_dir,
        }
    }

    /// Writes `contents` to a scratch file and returns its path
    pub fn input_file(&self, name: &str, contents: &[u8]) -> PathBuf {
        let path = self.data_dir.with_file_name(name);
        fs::write(&path, contents).expect("Failed to write input file");
        path
    }

    pub fn history_dir(&self) -> PathBuf {
        self.data_dir.join("history")
    }
}

/// Names in the history directory that are not published entries
pub fn partial_entries(history_dir: &Path) -> Vec<String> {
    fs::read_dir(history_dir)
        .expect("history dir readable")
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .filter(|name| name.starts_with('.'))
        .collect()
}

/// Validate that no partial entries remain
pub fn validate_no_partial_entries(history_dir: &Path) -> Result<(), String> {
    let partial = partial_entries(history_dir);
    if partial.is_empty() {
        Ok(())
    } else {
        Err(format!("partial entries left behind: {:?}", partial))
    }
}
