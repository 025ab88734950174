//! Crash test harness for subprocess management
//!
//! - Runs the confhist binary with a crash point injected via env var
//! - Runs it again normally to observe post-crash state

use std::path::Path;
use std::process::{Command, ExitStatus};

use serde_json::Value;

/// Environment variable read by `confhist::crash_point`
pub const CRASH_POINT_ENV: &str = "CONFHIST_CRASH_POINT";

/// Result of a crash test execution
#[derive(Debug)]
pub struct CrashTestResult {
    /// Whether the process ended unsuccessfully
    pub crashed: bool,
    /// Exit status if available
    pub exit_status: Option<ExitStatus>,
    /// stdout output
    pub stdout: String,
    /// stderr output
    pub stderr: String,
}

fn execute(args: &[&str], config: &Path, crash_point: Option<&str>) -> CrashTestResult {
    let (subcommand, rest) = args.split_first().expect("subcommand required");

    let mut command = Command::new(env!("CARGO_BIN_EXE_confhist"));
    command
        .arg(subcommand)
        .arg("--config")
        .arg(config)
        .args(rest)
        .env_remove(CRASH_POINT_ENV);
    if let Some(point) = crash_point {
        command.env(CRASH_POINT_ENV, point);
    }

    match command.output() {
        Ok(output) => CrashTestResult {
            crashed: !output.status.success(),
            exit_status: Some(output.status),
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        },
        Err(e) => CrashTestResult {
            crashed: true,
            exit_status: None,
            stdout: String::new(),
            stderr: format!("Failed to execute: {}", e),
        },
    }
}

/// Execute a confhist command with a crash point enabled
pub fn execute_with_crash_point(
    crash_point: &str,
    args: &[&str],
    config: &Path,
) -> CrashTestResult {
    execute(args, config, Some(crash_point))
}

/// Execute a confhist command normally, panicking on failure
pub fn execute_ok(args: &[&str], config: &Path) -> Value {
    let result = execute(args, config, None);
    if result.crashed {
        panic!(
            "confhist {:?} failed ({:?}): {}",
            args, result.exit_status, result.stderr
        );
    }
    let response: Value =
        serde_json::from_str(result.stdout.trim()).expect("stdout must be a JSON response");
    response["data"].clone()
}

/// Sequence numbers reported by `confhist list`
pub fn listed_sequences(config: &Path) -> Vec<u64> {
    execute_ok(&["list"], config)["snapshots"]
        .as_array()
        .expect("snapshots array")
        .iter()
        .map(|s| s["sequence"].as_u64().expect("sequence number"))
        .collect()
}

/// Report crash test failure
pub fn report_failure(
    crash_point: &str,
    operation: &str,
    expected: &str,
    actual: &str,
    logs: &str,
) {
    eprintln!("=== CRASH TEST FAILURE ===");
    eprintln!("Crash point: {}", crash_point);
    eprintln!("Operation: {}", operation);
    eprintln!("Expected: {}", expected);
    eprintln!("Actual: {}", actual);
    eprintln!("Logs:\n{}", logs);
    eprintln!("==========================");
}
