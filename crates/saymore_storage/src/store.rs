//! Segment file store trait definition.

use crate::error::StorageResult;
use std::path::{Path, PathBuf};

/// A store for oral annotation segment files.
///
/// Stores are **path-level** file managers. They do not know how segment
/// file names are computed; the transcription core owns that.
///
/// # Invariants
///
/// - `rename` never overwrites: it fails with `AlreadyExists` if `to` exists
/// - `copy` never overwrites either
/// - `remove` of a missing file fails with `NotFound`
/// - Stores must be `Send + Sync`
///
/// # Implementors
///
/// - [`super::FsFileStore`] - For real session folders
/// - [`super::InMemoryFileStore`] - For testing
pub trait SegmentFileStore: Send + Sync {
    /// Returns true if a file exists at `path`.
    fn exists(&self, path: &Path) -> bool;

    /// Moves the file at `from` to `to`.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `from` does not exist
    /// - `to` already exists
    /// - The file is locked or an I/O error occurs
    fn rename(&self, from: &Path, to: &Path) -> StorageResult<()>;

    /// Copies the file at `from` to `to`, creating `to`'s parent folder.
    ///
    /// # Errors
    ///
    /// Returns an error if `from` is missing, `to` exists, or I/O fails.
    fn copy(&self, from: &Path, to: &Path) -> StorageResult<()>;

    /// Deletes the file at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file is missing, locked, or I/O fails.
    fn remove(&self, path: &Path) -> StorageResult<()>;

    /// Lists the files directly inside `dir`, sorted by path.
    ///
    /// A missing folder is treated as empty.
    ///
    /// # Errors
    ///
    /// Returns an error if the folder exists but cannot be read.
    fn list(&self, dir: &Path) -> StorageResult<Vec<PathBuf>>;
}
