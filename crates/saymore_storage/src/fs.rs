//! File system store for real session folders.

use crate::error::{StorageError, StorageResult};
use crate::store::SegmentFileStore;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// A store backed by the operating system file system.
///
/// Renames use `std::fs::rename`, which is atomic within one volume.
/// Segment folders always sit next to their media file, so renames never
/// cross volumes.
///
/// # Example
///
/// ```no_run
/// use saymore_storage::{FsFileStore, SegmentFileStore};
/// use std::path::Path;
///
/// let store = FsFileStore::new();
/// let folder = Path::new("Session1/Recording.wav_Annotations");
/// for file in store.list(folder).unwrap() {
///     println!("{}", file.display());
/// }
/// ```
#[derive(Debug, Default, Clone, Copy)]
pub struct FsFileStore;

impl FsFileStore {
    /// Creates a file system store.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

fn map_io(err: std::io::Error, path: &Path) -> StorageError {
    match err.kind() {
        ErrorKind::NotFound => StorageError::not_found(path),
        ErrorKind::AlreadyExists => StorageError::already_exists(path),
        ErrorKind::PermissionDenied => StorageError::locked(path),
        _ => StorageError::Io(err),
    }
}

impl SegmentFileStore for FsFileStore {
    fn exists(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn rename(&self, from: &Path, to: &Path) -> StorageResult<()> {
        if !from.is_file() {
            return Err(StorageError::not_found(from));
        }
        // std::fs::rename silently replaces on Unix; segment files never overwrite.
        if to.exists() {
            return Err(StorageError::already_exists(to));
        }
        fs::rename(from, to).map_err(|e| map_io(e, from))
    }

    fn copy(&self, from: &Path, to: &Path) -> StorageResult<()> {
        if !from.is_file() {
            return Err(StorageError::not_found(from));
        }
        if to.exists() {
            return Err(StorageError::already_exists(to));
        }
        if let Some(parent) = to.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::copy(from, to).map_err(|e| map_io(e, from))?;
        Ok(())
    }

    fn remove(&self, path: &Path) -> StorageResult<()> {
        fs::remove_file(path).map_err(|e| map_io(e, path))
    }

    fn list(&self, dir: &Path) -> StorageResult<Vec<PathBuf>> {
        if !dir.is_dir() {
            return Ok(Vec::new());
        }

        let mut files = Vec::new();
        for entry in fs::read_dir(dir)? {
            let path = entry?.path();
            if path.is_file() {
                files.push(path);
            }
        }
        files.sort();
        Ok(files)
    }
}
