//! Crash point injection for durability testing
//!
//! When `CONFHIST_CRASH_POINT` names a point reached by the running process,
//! the process terminates immediately via `std::process::abort()`: no
//! cleanup, no unwinding.
//!
//! ```bash
//! CONFHIST_CRASH_POINT=store_before_publish confhist push --file cfg.tar
//! ```

use std::sync::OnceLock;

/// Environment variable selecting the crash point
pub const CRASH_POINT_ENV: &str = "CONFHIST_CRASH_POINT";

static CRASH_POINT: OnceLock<Option<String>> = OnceLock::new();

#[inline]
fn get_crash_point() -> Option<&'static str> {
    CRASH_POINT
        .get_or_init(|| std::env::var(CRASH_POINT_ENV).ok())
        .as_deref()
}

/// Returns true if `CONFHIST_CRASH_POINT` equals `name`.
#[inline]
pub fn crash_point_enabled(name: &str) -> bool {
    get_crash_point().map(|p| p == name).unwrap_or(false)
}

/// Aborts the process if the named crash point is enabled.
#[inline]
pub fn maybe_crash(name: &str) {
    if crash_point_enabled(name) {
        eprintln!("[CRASH] Triggering crash at point: {}", name);
        std::process::abort();
    }
}

/// All defined crash point names
pub mod points {
    /// Blob written into the staging directory, no manifest yet
    pub const STORE_AFTER_BLOB_WRITE: &str = "store_after_blob_write";
    /// Staging directory complete, not yet renamed into place
    pub const STORE_BEFORE_PUBLISH: &str = "store_before_publish";
    /// Entry renamed into place, before the parent directory fsync
    pub const STORE_AFTER_PUBLISH: &str = "store_after_publish";
    pub const STORE_BEFORE_DELETE: &str = "store_before_delete";
    /// Entry renamed to trash, not yet removed
    pub const STORE_AFTER_TRASH: &str = "store_after_trash";

    /// Every point, in the order a push followed by an eviction reaches them
    pub fn all() -> &'static [&'static str] {
        &[
            STORE_AFTER_BLOB_WRITE,
            STORE_BEFORE_PUBLISH,
            STORE_AFTER_PUBLISH,
            STORE_BEFORE_DELETE,
            STORE_AFTER_TRASH,
        ]
    }
}
