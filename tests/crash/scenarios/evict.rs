//! Eviction crash test scenarios
//!
//! - Crash before or during an eviction delete → the evicted entry is either
//!   still on disk (and evicted again on open) or gone, never half-present

use crate::crash::harness::{execute_ok, execute_with_crash_point, listed_sequences};
use crate::crash::utils::{partial_entries, validate_no_partial_entries, CrashEnv};
use confhist::crash_point::points;

fn env_at_bound() -> CrashEnv {
    let env = CrashEnv::init(2);
    for name in ["a.cfg", "b.cfg"] {
        let input = env.input_file(name, name.as_bytes());
        execute_ok(&["push", "--file", input.to_str().unwrap()], &env.config);
    }
    env
}

/// Test: crash before the oldest entry is moved to trash
#[test]
fn test_crash_before_delete() {
    let env = env_at_bound();
    let input = env.input_file("c.cfg", b"c");

    let result = execute_with_crash_point(
        points::STORE_BEFORE_DELETE,
        &["push", "--file", input.to_str().unwrap()],
        &env.config,
    );
    assert!(result.crashed);

    // Entry 1 is still published until the next open evicts it
    assert!(env.history_dir().join("00000000000000000001").exists());

    assert_eq!(listed_sequences(&env.config), vec![2, 3]);
    assert!(!env.history_dir().join("00000000000000000001").exists());
    validate_no_partial_entries(&env.history_dir()).unwrap();
}

/// Test: crash with the evicted entry in trash
#[test]
fn test_crash_after_trash() {
    let env = env_at_bound();
    let input = env.input_file("c.cfg", b"c");

    let result = execute_with_crash_point(
        points::STORE_AFTER_TRASH,
        &["push", "--file", input.to_str().unwrap()],
        &env.config,
    );
    assert!(result.crashed);
    assert_eq!(
        partial_entries(&env.history_dir()),
        vec![".trash-00000000000000000001".to_string()]
    );

    assert_eq!(listed_sequences(&env.config), vec![2, 3]);
    validate_no_partial_entries(&env.history_dir()).unwrap();
}

/// Test: crash while shrinking the bound through configure
#[test]
fn test_crash_during_configure_shrink() {
    let env = env_at_bound();

    let result = execute_with_crash_point(
        points::STORE_AFTER_TRASH,
        &["configure", "--history-length", "1"],
        &env.config,
    );
    assert!(result.crashed);

    // The length was saved before eviction started
    assert_eq!(listed_sequences(&env.config), vec![2]);
    validate_no_partial_entries(&env.history_dir()).unwrap();
}
