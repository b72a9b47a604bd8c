//! Oral annotation segment files: naming, backup policies and the
//! best-effort rename and delete operations.
//!
//! Each segment can have one careful speech file and one oral translation
//! file in the tier's segment folder, named `{start}_to_{end}{suffix}`.
//! Boundaries are written with Rust's shortest round-trip `f32`
//! formatting, so a name is a pure function of the boundary values and
//! parses back to the identical values.
//!
//! Older SayMore releases wrote boundaries with seven significant digits.
//! For values that are not exactly representable at that precision (a
//! dragged boundary such as `2.1000001`) the two formats differ, so
//! segment folders written by those releases do not always resolve to
//! the names computed here.
//!
//! File operations never fail a boundary edit. Each kind of file is
//! handled on its own and its result is returned as a
//! [`SegmentFileOutcome`]; failures are also logged.

use crate::config::TierConfig;
use crate::types::{ObsoleteReason, OralAnnotationType, TimeRange};
use saymore_storage::{SegmentFileStore, StorageResult};
use std::path::{Path, PathBuf};

/// Computes the careful speech file name for a segment.
///
/// ```
/// use saymore_core::{careful_speech_file_name, TierConfig};
///
/// let config = TierConfig::default();
/// assert_eq!(careful_speech_file_name(2.5, 4.0, &config), "2.5_to_4_Careful.wav");
/// ```
#[must_use]
pub fn careful_speech_file_name(start: f32, end: f32, config: &TierConfig) -> String {
    segment_file_name(OralAnnotationType::CarefulSpeech, start, end, config)
}

/// Computes the oral translation file name for a segment.
#[must_use]
pub fn oral_translation_file_name(start: f32, end: f32, config: &TierConfig) -> String {
    segment_file_name(OralAnnotationType::Translation, start, end, config)
}

/// Computes the file name of a segment annotation of `kind`.
#[must_use]
pub fn segment_file_name(
    kind: OralAnnotationType,
    start: f32,
    end: f32,
    config: &TierConfig,
) -> String {
    format!("{start}_to_{end}{}", suffix_for(kind, config))
}

/// Parses a segment file name back into its kind and range.
///
/// Returns `None` for names that were not produced by
/// [`segment_file_name`] with this configuration.
#[must_use]
pub fn parse_segment_file_name(
    name: &str,
    config: &TierConfig,
) -> Option<(OralAnnotationType, TimeRange)> {
    OralAnnotationType::ALL.into_iter().find_map(|kind| {
        let stem = name.strip_suffix(suffix_for(kind, config))?;
        let (start, end) = stem.split_once("_to_")?;
        let range = TimeRange::new(start.parse().ok()?, end.parse().ok()?);
        Some((kind, range))
    })
}

fn suffix_for(kind: OralAnnotationType, config: &TierConfig) -> &str {
    match kind {
        OralAnnotationType::CarefulSpeech => &config.careful_speech_suffix,
        OralAnnotationType::Translation => &config.oral_translation_suffix,
    }
}

/// A policy notified before a segment file is renamed or deleted.
///
/// On [`ObsoleteReason::Renamed`] the observer may preserve the file; the
/// tier moves it afterwards. On [`ObsoleteReason::Deleted`] the observer
/// takes over the deletion entirely: the tier does not remove the file
/// itself when an observer is registered.
pub trait SegmentFileObserver: Send + Sync {
    /// Called with the file's current path before it becomes obsolete.
    ///
    /// # Errors
    ///
    /// An error is reported in the operation's [`SegmentFileOutcome`]. A
    /// failed notification before a rename skips that rename.
    fn segment_file_obsoleted(
        &self,
        store: &dyn SegmentFileStore,
        path: &Path,
        reason: ObsoleteReason,
    ) -> StorageResult<()>;
}

/// Deletes removed segments' files and keeps nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct DeleteObsoleteFiles;

impl SegmentFileObserver for DeleteObsoleteFiles {
    fn segment_file_obsoleted(
        &self,
        store: &dyn SegmentFileStore,
        path: &Path,
        reason: ObsoleteReason,
    ) -> StorageResult<()> {
        match reason {
            ObsoleteReason::Renamed => Ok(()),
            ObsoleteReason::Deleted => store.remove(path),
        }
    }
}

/// Copies every obsoleted file into a backup folder before it changes.
///
/// Only the first version of a file is kept: if the backup folder already
/// has a file of the same name it is left alone. Deleted files are removed
/// from the segment folder after the copy.
#[derive(Debug, Clone)]
pub struct BackupToFolder {
    folder: PathBuf,
}

impl BackupToFolder {
    /// Creates a policy backing up into `folder`.
    pub fn new(folder: impl Into<PathBuf>) -> Self {
        Self {
            folder: folder.into(),
        }
    }

    /// The backup folder.
    #[must_use]
    pub fn folder(&self) -> &Path {
        &self.folder
    }
}

impl SegmentFileObserver for BackupToFolder {
    fn segment_file_obsoleted(
        &self,
        store: &dyn SegmentFileStore,
        path: &Path,
        reason: ObsoleteReason,
    ) -> StorageResult<()> {
        if let Some(name) = path.file_name() {
            let backup = self.folder.join(name);
            if !store.exists(&backup) {
                store.copy(path, &backup)?;
            }
        }

        match reason {
            ObsoleteReason::Renamed => Ok(()),
            ObsoleteReason::Deleted => store.remove(path),
        }
    }
}

/// A file operation performed on behalf of a boundary edit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileOperation {
    /// A segment file was moved to the name for new boundaries.
    Rename {
        /// Old path.
        from: PathBuf,
        /// New path.
        to: PathBuf,
    },
    /// A removed segment's file was deleted or handed to the observer.
    Delete {
        /// The file's path.
        path: PathBuf,
    },
}

/// Result of one per-kind segment file operation.
#[derive(Debug)]
pub struct SegmentFileOutcome {
    /// Which annotation file.
    pub kind: OralAnnotationType,
    /// What was attempted.
    pub operation: FileOperation,
    /// Whether it worked.
    pub result: StorageResult<()>,
}

impl SegmentFileOutcome {
    /// Returns true if the operation succeeded.
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

/// Everything needed to rename or delete the files of one tier.
pub(crate) struct SegmentFiles<'a> {
    pub(crate) store: &'a dyn SegmentFileStore,
    pub(crate) observer: Option<&'a dyn SegmentFileObserver>,
    pub(crate) folder: &'a Path,
    pub(crate) config: &'a TierConfig,
}

impl SegmentFiles<'_> {
    pub(crate) fn path(&self, kind: OralAnnotationType, range: TimeRange) -> PathBuf {
        self.folder
            .join(segment_file_name(kind, range.start, range.end, self.config))
    }

    /// Moves the files of the segment at `old` to the names for `new`.
    pub(crate) fn rename(&self, old: TimeRange, new: TimeRange) -> Vec<SegmentFileOutcome> {
        let mut outcomes = Vec::new();

        for kind in OralAnnotationType::ALL {
            let from = self.path(kind, old);
            let to = self.path(kind, new);
            if from == to || !self.store.exists(&from) {
                continue;
            }

            let result = self
                .notify(&from, ObsoleteReason::Renamed)
                .and_then(|()| self.store.rename(&from, &to));

            match &result {
                Ok(()) => tracing::debug!(
                    %kind,
                    from = %from.display(),
                    to = %to.display(),
                    "renamed segment file"
                ),
                Err(err) => tracing::warn!(
                    %kind,
                    from = %from.display(),
                    to = %to.display(),
                    error = %err,
                    "failed to rename segment file"
                ),
            }

            outcomes.push(SegmentFileOutcome {
                kind,
                operation: FileOperation::Rename { from, to },
                result,
            });
        }

        outcomes
    }

    /// Deletes the files of the segment at `range`, through the observer
    /// when one is registered.
    pub(crate) fn delete(&self, range: TimeRange) -> Vec<SegmentFileOutcome> {
        let mut outcomes = Vec::new();

        for kind in OralAnnotationType::ALL {
            let path = self.path(kind, range);
            if !self.store.exists(&path) {
                continue;
            }

            let result = match self.observer {
                Some(observer) => {
                    observer.segment_file_obsoleted(self.store, &path, ObsoleteReason::Deleted)
                }
                None => self.store.remove(&path),
            };

            match &result {
                Ok(()) => tracing::debug!(%kind, path = %path.display(), "deleted segment file"),
                Err(err) => tracing::warn!(
                    %kind,
                    path = %path.display(),
                    error = %err,
                    "failed to delete segment file"
                ),
            }

            outcomes.push(SegmentFileOutcome {
                kind,
                operation: FileOperation::Delete { path },
                result,
            });
        }

        outcomes
    }

    fn notify(&self, path: &Path, reason: ObsoleteReason) -> StorageResult<()> {
        match self.observer {
            Some(observer) => observer.segment_file_obsoleted(self.store, path, reason),
            None => Ok(()),
        }
    }
}
