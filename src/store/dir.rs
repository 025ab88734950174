//! Directory-backed history store
//!
//! Layout under `<data_dir>/history/`:
//!
//! ```text
//! history/
//! ├── 00000000000000000007/
//! │   ├── config.dat       (blob, byte-for-byte)
//! │   └── manifest.json    (sequence, created_at, checksum, size)
//! ├── .staging-00000000000000000008/   (append in progress)
//! └── .trash-00000000000000000006/     (delete in progress)
//! ```
//!
//! An entry becomes visible only through the rename of a complete staging
//! directory, so a reader never observes a half-written entry. Deletion
//! renames the entry out of the visible namespace before removing it.
//! Staging and trash directories left behind by a crash are removed on open.
//!
//! A store holds an exclusive lock on `history/LOCK` for its whole lifetime,
//! so at most one store (in any process) mutates a history directory at a
//! time.

use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use fs2::FileExt;
use tracing::{debug, info, warn};

use super::errors::{StoreError, StoreResult};
use super::manifest::EntryManifest;
use super::HistoryStore;
use crate::crash_point::{maybe_crash, points};
use crate::retention::{SequenceNumber, Snapshot};

const HISTORY_DIR: &str = "history";
const BLOB_FILE: &str = "config.dat";
const MANIFEST_FILE: &str = "manifest.json";
const STAGING_PREFIX: &str = ".staging-";
const TRASH_PREFIX: &str = ".trash-";
const LOCK_FILE: &str = "LOCK";

/// Returns the history directory for a data directory.
pub fn history_dir(data_dir: &Path) -> PathBuf {
    data_dir.join(HISTORY_DIR)
}

fn entry_name(sequence: SequenceNumber) -> String {
    format!("{:020}", sequence)
}

fn parse_entry_name(name: &str) -> Option<SequenceNumber> {
    if name.len() != 20 || !name.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    name.parse().ok()
}

/// fsync a directory so renames and removals inside it are durable.
fn fsync_dir(path: &Path) -> StoreResult<()> {
    let dir = OpenOptions::new()
        .read(true)
        .open(path)
        .map_err(|e| StoreError::io_at_path(path, e))?;
    dir.sync_all().map_err(|e| StoreError::io_at_path(path, e))
}

fn write_file_with_fsync(path: &Path, data: &[u8]) -> StoreResult<()> {
    let mut file = File::create(path).map_err(|e| StoreError::io_at_path(path, e))?;
    file.write_all(data)
        .map_err(|e| StoreError::io_at_path(path, e))?;
    file.sync_all().map_err(|e| StoreError::io_at_path(path, e))
}

fn remove_dir_if_exists(path: &Path) -> StoreResult<()> {
    match fs::remove_dir_all(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(StoreError::io_at_path(path, e)),
    }
}

/// Moves a complete staging directory into place.
///
/// The entry is published once the rename succeeds. A directory sync failure
/// after that point is logged, not returned.
fn publish(
    root: &Path,
    staging: &Path,
    target: &Path,
    sync_dir: impl FnOnce(&Path) -> StoreResult<()>,
) -> StoreResult<()> {
    if let Err(e) = fs::rename(staging, target) {
        let _ = fs::remove_dir_all(staging);
        return Err(StoreError::io_at_path(target, e));
    }
    maybe_crash(points::STORE_AFTER_PUBLISH);

    if let Err(e) = sync_dir(root) {
        warn!(
            path = %target.display(),
            error = %e,
            "history entry published but directory sync failed"
        );
    }
    Ok(())
}

fn acquire_lock(root: &Path, wait: bool) -> StoreResult<File> {
    let lock_path = root.join(LOCK_FILE);
    let lock_file = OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(false)
        .open(&lock_path)
        .map_err(|e| StoreError::io_at_path(&lock_path, e))?;

    if wait {
        lock_file
            .lock_exclusive()
            .map_err(|e| StoreError::io_at_path(&lock_path, e))?;
    } else {
        lock_file.try_lock_exclusive().map_err(|_| StoreError::Locked {
            path: root.to_path_buf(),
        })?;
    }
    Ok(lock_file)
}

/// A [`HistoryStore`] keeping one directory per snapshot.
#[derive(Debug)]
pub struct DirStore {
    root: PathBuf,
    // Released when the store is dropped
    _lock_file: File,
}

impl DirStore {
    /// Opens (creating if needed) the history directory under `data_dir`.
    ///
    /// Blocks until no other store holds the directory lock. Leftover
    /// staging and trash directories are removed once the lock is held.
    pub fn open(data_dir: &Path) -> StoreResult<Self> {
        Self::open_locked(data_dir, true)
    }

    /// Like [`DirStore::open`], but fails with [`StoreError::Locked`]
    /// instead of waiting when the directory is in use.
    pub fn try_open(data_dir: &Path) -> StoreResult<Self> {
        Self::open_locked(data_dir, false)
    }

    fn open_locked(data_dir: &Path, wait: bool) -> StoreResult<Self> {
        let root = history_dir(data_dir);
        fs::create_dir_all(&root).map_err(|e| StoreError::io_at_path(&root, e))?;

        let lock_file = acquire_lock(&root, wait)?;
        let store = Self {
            root,
            _lock_file: lock_file,
        };
        store.remove_crash_remnants()?;
        Ok(store)
    }

    /// The history directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory holding the entry for `sequence`
    pub fn entry_path(&self, sequence: SequenceNumber) -> PathBuf {
        self.root.join(entry_name(sequence))
    }

    fn staging_path(&self, sequence: SequenceNumber) -> PathBuf {
        self.root
            .join(format!("{}{}", STAGING_PREFIX, entry_name(sequence)))
    }

    fn trash_path(&self, sequence: SequenceNumber) -> PathBuf {
        self.root
            .join(format!("{}{}", TRASH_PREFIX, entry_name(sequence)))
    }

    fn remove_crash_remnants(&self) -> StoreResult<()> {
        let entries =
            fs::read_dir(&self.root).map_err(|e| StoreError::io_at_path(&self.root, e))?;

        let mut removed = 0usize;
        for entry in entries {
            let entry = entry.map_err(|e| StoreError::io_at_path(&self.root, e))?;
            let name = entry.file_name();
            let name = name.to_string_lossy();
            if name.starts_with(STAGING_PREFIX) || name.starts_with(TRASH_PREFIX) {
                let path = entry.path();
                info!(path = %path.display(), "removing incomplete history entry");
                remove_dir_if_exists(&path)?;
                removed += 1;
            }
        }

        if removed > 0 {
            fsync_dir(&self.root)?;
        }
        Ok(())
    }

    fn write_staging(&self, staging: &Path, snapshot: &Snapshot) -> StoreResult<()> {
        fs::create_dir(staging).map_err(|e| StoreError::io_at_path(staging, e))?;

        write_file_with_fsync(&staging.join(BLOB_FILE), snapshot.blob())?;
        maybe_crash(points::STORE_AFTER_BLOB_WRITE);

        EntryManifest::for_snapshot(snapshot).write_to_file(&staging.join(MANIFEST_FILE))?;
        fsync_dir(staging)
    }

    fn read_entry(&self, sequence: SequenceNumber, path: &Path) -> StoreResult<Snapshot> {
        let manifest_path = path.join(MANIFEST_FILE);
        if !manifest_path.exists() {
            return Err(StoreError::corrupt(sequence, "manifest missing"));
        }
        let manifest = EntryManifest::read_from_file(&manifest_path)?;
        if manifest.sequence != sequence {
            return Err(StoreError::corrupt(
                sequence,
                format!("manifest names sequence {}", manifest.sequence),
            ));
        }

        let blob_path = path.join(BLOB_FILE);
        let blob = fs::read(&blob_path).map_err(|e| StoreError::io_at_path(&blob_path, e))?;
        manifest.verify(&blob)?;

        Ok(Snapshot::new(sequence, manifest.created_at, blob))
    }
}

impl HistoryStore for DirStore {
    fn append(&mut self, snapshot: &Snapshot) -> StoreResult<()> {
        let sequence = snapshot.sequence();
        let target = self.entry_path(sequence);
        if target.exists() {
            return Err(StoreError::Duplicate(sequence));
        }

        let staging = self.staging_path(sequence);
        remove_dir_if_exists(&staging)?;

        if let Err(e) = self.write_staging(&staging, snapshot) {
            // Best effort, we are already failing
            let _ = fs::remove_dir_all(&staging);
            return Err(e);
        }

        maybe_crash(points::STORE_BEFORE_PUBLISH);
        publish(&self.root, &staging, &target, fsync_dir)?;
        debug!(sequence, size = snapshot.size(), "history entry written");
        Ok(())
    }

    fn delete(&mut self, sequence: SequenceNumber) -> StoreResult<()> {
        let target = self.entry_path(sequence);
        if !target.exists() {
            return Ok(());
        }

        maybe_crash(points::STORE_BEFORE_DELETE);
        let trash = self.trash_path(sequence);
        remove_dir_if_exists(&trash)?;
        match fs::rename(&target, &trash) {
            Ok(()) => {}
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(()),
            Err(e) => return Err(StoreError::io_at_path(&target, e)),
        }
        fsync_dir(&self.root)?;
        maybe_crash(points::STORE_AFTER_TRASH);

        remove_dir_if_exists(&trash)?;
        debug!(sequence, "history entry deleted");
        Ok(())
    }

    fn list(&self) -> StoreResult<Vec<Snapshot>> {
        let entries =
            fs::read_dir(&self.root).map_err(|e| StoreError::io_at_path(&self.root, e))?;

        let mut found = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| StoreError::io_at_path(&self.root, e))?;
            let name = entry.file_name();
            match parse_entry_name(&name.to_string_lossy()) {
                Some(sequence) => found.push((sequence, entry.path())),
                None => debug!(
                    name = %name.to_string_lossy(),
                    "skipping non-entry in history directory"
                ),
            }
        }
        found.sort_by_key(|(sequence, _)| *sequence);

        found
            .iter()
            .map(|(sequence, path)| self.read_entry(*sequence, path))
            .collect()
    }
}
