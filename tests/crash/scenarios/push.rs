//! Push crash test scenarios
//!
//! - Crash before publish → the new snapshot never appears
//! - Crash after publish → the new snapshot is retained, bound still holds

use crate::crash::harness::{execute_ok, execute_with_crash_point, listed_sequences, report_failure};
use crate::crash::utils::{validate_no_partial_entries, CrashEnv};
use confhist::crash_point::points;

fn push_with_crash(env: &CrashEnv, point: &str) -> String {
    let input = env.input_file("new.cfg", b"HistoryLength=7");
    let args = ["push", "--file", input.to_str().unwrap()];
    let result = execute_with_crash_point(point, &args, &env.config);
    assert!(result.crashed, "push should have crashed at {}", point);
    assert!(result.stderr.contains(point), "stderr: {}", result.stderr);
    result.stderr
}

fn env_with_two_snapshots() -> CrashEnv {
    let env = CrashEnv::init(2);
    for name in ["a.cfg", "b.cfg"] {
        let input = env.input_file(name, name.as_bytes());
        execute_ok(&["push", "--file", input.to_str().unwrap()], &env.config);
    }
    env
}

fn check_after_crash(env: &CrashEnv, point: &str, expected: &[u64], logs: &str) {
    let actual = listed_sequences(&env.config);
    if actual != expected {
        report_failure(
            point,
            "push",
            &format!("{:?}", expected),
            &format!("{:?}", actual),
            logs,
        );
        panic!("unexpected history after crash at {}", point);
    }
    validate_no_partial_entries(&env.history_dir()).unwrap();
}

/// Test: crash after the blob is written but before the manifest exists
#[test]
fn test_crash_after_blob_write_discards_entry() {
    let env = env_with_two_snapshots();
    let logs = push_with_crash(&env, points::STORE_AFTER_BLOB_WRITE);
    check_after_crash(&env, points::STORE_AFTER_BLOB_WRITE, &[1, 2], &logs);
}

/// Test: crash with a complete staging directory that was never renamed
#[test]
fn test_crash_before_publish_discards_entry() {
    let env = env_with_two_snapshots();
    let logs = push_with_crash(&env, points::STORE_BEFORE_PUBLISH);
    check_after_crash(&env, points::STORE_BEFORE_PUBLISH, &[1, 2], &logs);
}

/// Test: crash right after publish; eviction never ran, so reopening must
/// restore the bound
#[test]
fn test_crash_after_publish_keeps_entry_and_bound() {
    let env = env_with_two_snapshots();
    let logs = push_with_crash(&env, points::STORE_AFTER_PUBLISH);
    check_after_crash(&env, points::STORE_AFTER_PUBLISH, &[2, 3], &logs);
}

/// Test: after a discarded push, the next push reuses the sequence number
#[test]
fn test_push_after_crash_continues() {
    let env = env_with_two_snapshots();
    push_with_crash(&env, points::STORE_BEFORE_PUBLISH);

    let input = env.input_file("retry.cfg", b"retry");
    let response = execute_ok(&["push", "--file", input.to_str().unwrap()], &env.config);
    assert_eq!(response["sequence"], 3);
    assert_eq!(listed_sequences(&env.config), vec![2, 3]);
}
