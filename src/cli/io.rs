//! Command input and output
//!
//! - Input blobs come from a file or raw stdin
//! - Output: single JSON object per command on stdout

use std::fs;
use std::io::{self, Read, Write};
use std::path::Path;

use serde_json::Value;

use super::errors::{CliError, CliResult};

/// Read a blob from `path`, or all of stdin when `None`
pub fn read_blob(path: Option<&Path>) -> CliResult<Vec<u8>> {
    match path {
        Some(path) => fs::read(path)
            .map_err(|e| CliError::io_error(format!("Failed to read {}: {}", path.display(), e))),
        None => {
            let mut blob = Vec::new();
            io::stdin().lock().read_to_end(&mut blob)?;
            Ok(blob)
        }
    }
}

/// Write a blob to `path`, or raw to stdout when `None`
pub fn write_blob(path: Option<&Path>, blob: &[u8]) -> CliResult<()> {
    match path {
        Some(path) => fs::write(path, blob)
            .map_err(|e| CliError::io_error(format!("Failed to write {}: {}", path.display(), e))),
        None => {
            let mut stdout = io::stdout();
            stdout.write_all(blob)?;
            stdout.flush()?;
            Ok(())
        }
    }
}

/// Write a success response to stdout
pub fn write_response(data: Value) -> CliResult<()> {
    let response = serde_json::json!({
        "status": "ok",
        "data": data
    });

    let mut stdout = io::stdout();
    serde_json::to_writer(&mut stdout, &response)?;
    writeln!(stdout)?;
    stdout.flush()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_blob_file_roundtrip() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("blob.bin");

        write_blob(Some(&path), &[0, 1, 2, 255]).unwrap();
        assert_eq!(read_blob(Some(&path)).unwrap(), vec![0, 1, 2, 255]);
    }

    #[test]
    fn test_missing_input_names_path() {
        let temp_dir = TempDir::new().unwrap();
        let err = read_blob(Some(&temp_dir.path().join("nope.bin"))).unwrap_err();
        assert!(err.message().contains("nope.bin"));
    }
}
