//! In-memory segment file store for testing.

use crate::error::{StorageError, StorageResult};
use crate::store::SegmentFileStore;
use parking_lot::RwLock;
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

/// An in-memory segment file store.
///
/// Files are kept in a sorted map of path to contents. Paths can be marked
/// locked to simulate a recording held open by another program: renames,
/// removals and copies touching a locked path fail with
/// [`StorageError::Locked`].
///
/// # Thread Safety
///
/// This store is thread-safe and can be shared across threads.
///
/// # Example
///
/// ```rust
/// use saymore_storage::{InMemoryFileStore, SegmentFileStore, StorageError};
/// use std::path::Path;
///
/// let store = InMemoryFileStore::new();
/// let path = Path::new("x_Annotations/0_to_1_Careful.wav");
/// store.insert(path, Vec::new());
/// store.lock(path);
/// assert!(matches!(store.remove(path), Err(StorageError::Locked { .. })));
/// ```
#[derive(Debug, Default)]
pub struct InMemoryFileStore {
    files: RwLock<BTreeMap<PathBuf, Vec<u8>>>,
    locked: RwLock<BTreeSet<PathBuf>>,
}

impl InMemoryFileStore {
    /// Creates a new empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds (or replaces) a file.
    pub fn insert(&self, path: &Path, contents: Vec<u8>) {
        self.files.write().insert(path.to_path_buf(), contents);
    }

    /// Returns a copy of a file's contents.
    #[must_use]
    pub fn contents(&self, path: &Path) -> Option<Vec<u8>> {
        self.files.read().get(path).cloned()
    }

    /// Returns every stored path, sorted.
    #[must_use]
    pub fn paths(&self) -> Vec<PathBuf> {
        self.files.read().keys().cloned().collect()
    }

    /// Marks a path as locked.
    pub fn lock(&self, path: &Path) {
        self.locked.write().insert(path.to_path_buf());
    }

    /// Clears the lock on a path.
    pub fn unlock(&self, path: &Path) {
        self.locked.write().remove(path);
    }

    fn check_unlocked(&self, path: &Path) -> StorageResult<()> {
        if self.locked.read().contains(path) {
            return Err(StorageError::locked(path));
        }
        Ok(())
    }
}

impl SegmentFileStore for InMemoryFileStore {
    fn exists(&self, path: &Path) -> bool {
        self.files.read().contains_key(path)
    }

    fn rename(&self, from: &Path, to: &Path) -> StorageResult<()> {
        self.check_unlocked(from)?;
        self.check_unlocked(to)?;

        let mut files = self.files.write();
        if files.contains_key(to) {
            return Err(StorageError::already_exists(to));
        }
        let contents = files
            .remove(from)
            .ok_or_else(|| StorageError::not_found(from))?;
        files.insert(to.to_path_buf(), contents);
        Ok(())
    }

    fn copy(&self, from: &Path, to: &Path) -> StorageResult<()> {
        self.check_unlocked(to)?;

        let mut files = self.files.write();
        if files.contains_key(to) {
            return Err(StorageError::already_exists(to));
        }
        let contents = files
            .get(from)
            .cloned()
            .ok_or_else(|| StorageError::not_found(from))?;
        files.insert(to.to_path_buf(), contents);
        Ok(())
    }

    fn remove(&self, path: &Path) -> StorageResult<()> {
        self.check_unlocked(path)?;

        self.files
            .write()
            .remove(path)
            .map(|_| ())
            .ok_or_else(|| StorageError::not_found(path))
    }

    fn list(&self, dir: &Path) -> StorageResult<Vec<PathBuf>> {
        Ok(self
            .files
            .read()
            .keys()
            .filter(|p| p.parent() == Some(dir))
            .cloned()
            .collect())
    }
}
