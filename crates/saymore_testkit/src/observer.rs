//! A segment file observer that records what it is told.

use parking_lot::Mutex;
use saymore_core::{DeleteObsoleteFiles, ObsoleteReason, SegmentFileObserver};
use saymore_storage::{SegmentFileStore, StorageResult};
use std::path::{Path, PathBuf};

/// One notification received by a [`RecordingObserver`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObservedFile {
    /// The file's path at notification time.
    pub path: PathBuf,
    /// Why it became obsolete.
    pub reason: ObsoleteReason,
}

/// Records every notification in order, then hands it to another policy.
pub struct RecordingObserver {
    events: Mutex<Vec<ObservedFile>>,
    inner: Box<dyn SegmentFileObserver>,
}

impl RecordingObserver {
    /// Records and then deletes removed segments' files.
    pub fn new() -> Self {
        Self::wrapping(DeleteObsoleteFiles)
    }

    /// Records and then delegates to `inner`.
    pub fn wrapping(inner: impl SegmentFileObserver + 'static) -> Self {
        Self {
            events: Mutex::new(Vec::new()),
            inner: Box::new(inner),
        }
    }

    /// Notifications so far, oldest first.
    pub fn events(&self) -> Vec<ObservedFile> {
        self.events.lock().clone()
    }

    /// File names and reasons so far, oldest first.
    pub fn file_names(&self) -> Vec<(String, ObsoleteReason)> {
        self.events
            .lock()
            .iter()
            .map(|e| {
                let name = e
                    .path
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_default();
                (name, e.reason)
            })
            .collect()
    }

    /// Forgets recorded notifications.
    pub fn clear(&self) {
        self.events.lock().clear();
    }
}

impl Default for RecordingObserver {
    fn default() -> Self {
        Self::new()
    }
}

impl SegmentFileObserver for RecordingObserver {
    fn segment_file_obsoleted(
        &self,
        store: &dyn SegmentFileStore,
        path: &Path,
        reason: ObsoleteReason,
    ) -> StorageResult<()> {
        self.events.lock().push(ObservedFile {
            path: path.to_path_buf(),
            reason,
        });
        self.inner.segment_file_obsoleted(store, path, reason)
    }
}
