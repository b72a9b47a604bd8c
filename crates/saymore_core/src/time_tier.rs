//! The time tier: ordered, contiguous segments over one media file.
//!
//! All boundary edits follow the same discipline:
//!
//! 1. validate every resulting segment length;
//! 2. rename the affected segment files on disk;
//! 3. delete files of removed segments;
//! 4. commit the new ranges in memory.
//!
//! A rejected edit returns before step 2 and leaves both the tier and the
//! segment folder untouched.

use crate::config::TierConfig;
use crate::error::{CoreError, CoreResult};
use crate::media::MediaProbe;
use crate::segment::{Segment, SegmentRef};
use crate::segment_files::{segment_file_name, SegmentFileObserver, SegmentFileOutcome, SegmentFiles};
use crate::stats::{TierStats, TierViolation};
use crate::types::{BoundaryModificationResult, OralAnnotationType, TimeRange};
use saymore_storage::SegmentFileStore;
use std::collections::HashSet;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

/// Default id of a time tier.
pub const DEFAULT_TIME_TIER_ID: &str = "Source";

/// An ordered sequence of non-overlapping segments over one media file.
pub struct TimeTier {
    id: String,
    media_file: PathBuf,
    total_time: f32,
    segments: Vec<Segment>,
    read_only_time_ranges: bool,
    config: TierConfig,
    segment_file_folder: PathBuf,
    store: Arc<dyn SegmentFileStore>,
    observer: Option<Arc<dyn SegmentFileObserver>>,
}

impl fmt::Debug for TimeTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TimeTier")
            .field("id", &self.id)
            .field("media_file", &self.media_file)
            .field("total_time", &self.total_time)
            .field("segments", &self.segments)
            .field("read_only_time_ranges", &self.read_only_time_ranges)
            .field("config", &self.config)
            .field("has_observer", &self.observer.is_some())
            .finish_non_exhaustive()
    }
}

impl TimeTier {
    /// Creates an empty tier over `media_file`, whose duration is
    /// `total_time` seconds.
    pub fn new(
        media_file: impl Into<PathBuf>,
        total_time: f32,
        store: Arc<dyn SegmentFileStore>,
    ) -> Self {
        let media_file = media_file.into();
        let config = TierConfig::default();
        Self {
            id: DEFAULT_TIME_TIER_ID.to_string(),
            segment_file_folder: folder_for(&media_file, &config),
            media_file,
            total_time,
            segments: Vec::new(),
            read_only_time_ranges: false,
            config,
            store,
            observer: None,
        }
    }

    /// Creates an empty tier, asking `probe` for the media duration.
    ///
    /// # Errors
    ///
    /// Returns an error if the probe cannot read the media file.
    pub fn probe(
        media_file: impl Into<PathBuf>,
        probe: &dyn MediaProbe,
        store: Arc<dyn SegmentFileStore>,
    ) -> CoreResult<Self> {
        let media_file = media_file.into();
        let total_time = probe.duration_seconds(&media_file)?;
        Ok(Self::new(media_file, total_time, store))
    }

    /// Sets the tier id.
    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    /// Sets the configuration.
    #[must_use]
    pub fn with_config(mut self, config: TierConfig) -> Self {
        self.segment_file_folder = folder_for(&self.media_file, &config);
        self.config = config;
        self
    }

    /// Registers the backup policy for obsoleted segment files.
    #[must_use]
    pub fn with_observer(mut self, observer: Arc<dyn SegmentFileObserver>) -> Self {
        self.observer = Some(observer);
        self
    }

    /// Sets whether boundaries may be moved.
    #[must_use]
    pub fn with_read_only_time_ranges(mut self, read_only: bool) -> Self {
        self.read_only_time_ranges = read_only;
        self
    }

    /// Appends segments without validation.
    ///
    /// This is the bulk construction path for segments read from a
    /// document, which may not satisfy the tier's invariants; use
    /// [`TimeTier::verify_invariants`] to check them.
    #[must_use]
    pub fn with_segments(mut self, ranges: impl IntoIterator<Item = TimeRange>) -> Self {
        for range in ranges {
            self.add_segment(range.start, range.end);
        }
        self
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    /// Tier id.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// The media file the tier segments.
    #[must_use]
    pub fn media_file(&self) -> &Path {
        &self.media_file
    }

    /// Media duration in seconds.
    #[must_use]
    pub fn total_time(&self) -> f32 {
        self.total_time
    }

    /// The configuration.
    #[must_use]
    pub fn config(&self) -> &TierConfig {
        &self.config
    }

    /// The segment file store.
    #[must_use]
    pub fn store(&self) -> &Arc<dyn SegmentFileStore> {
        &self.store
    }

    /// Whether boundary moves are disabled.
    #[must_use]
    pub fn read_only_time_ranges(&self) -> bool {
        self.read_only_time_ranges
    }

    /// Enables or disables boundary moves.
    pub fn set_read_only_time_ranges(&mut self, read_only: bool) {
        self.read_only_time_ranges = read_only;
    }

    /// Replaces (or clears) the backup policy.
    pub fn set_observer(&mut self, observer: Option<Arc<dyn SegmentFileObserver>>) {
        self.observer = observer;
    }

    /// The segments, in time order.
    #[must_use]
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Ranges of all segments, in time order.
    #[must_use]
    pub fn ranges(&self) -> Vec<TimeRange> {
        self.segments.iter().map(Segment::range).collect()
    }

    /// Number of segments.
    #[must_use]
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Returns true if the tier has no segments.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// A view of the segment at `index`.
    #[must_use]
    pub fn segment(&self, index: usize) -> Option<SegmentRef<'_>> {
        (index < self.segments.len()).then(|| SegmentRef::new(self, index))
    }

    /// Mutable access to a segment's text and annotation flags.
    pub fn segment_mut(&mut self, index: usize) -> Option<&mut Segment> {
        self.segments.get_mut(index)
    }

    /// Views of all segments, in time order.
    pub fn iter(&self) -> impl Iterator<Item = SegmentRef<'_>> + '_ {
        (0..self.segments.len()).map(move |i| SegmentRef::new(self, i))
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    /// Position of the segment whose range equals `range`.
    #[must_use]
    pub fn index_of_segment(&self, range: TimeRange) -> Option<usize> {
        self.segments.iter().position(|s| s.range() == range)
    }

    /// First segment ending exactly at `boundary`.
    #[must_use]
    pub fn segment_having_end_boundary(&self, boundary: f32) -> Option<SegmentRef<'_>> {
        self.segments
            .iter()
            .position(|s| s.ends_at(boundary))
            .map(|i| SegmentRef::new(self, i))
    }

    /// First segment starting exactly at `boundary`.
    #[must_use]
    pub fn segment_having_start_boundary(&self, boundary: f32) -> Option<SegmentRef<'_>> {
        self.segments
            .iter()
            .position(|s| s.starts_at(boundary))
            .map(|i| SegmentRef::new(self, i))
    }

    /// First segment with `start <= time < end`.
    ///
    /// A time on a shared boundary belongs to the later segment.
    #[must_use]
    pub fn segment_enclosing_time(&self, time: f32) -> Option<SegmentRef<'_>> {
        self.segments
            .iter()
            .position(|s| s.range().is_time_in_range(time, true, false))
            .map(|i| SegmentRef::new(self, i))
    }

    /// Position of the segment that `boundary` would split, if any.
    #[must_use]
    pub fn index_of_segment_strictly_containing(&self, boundary: f32) -> Option<usize> {
        self.segments
            .iter()
            .position(|s| s.range().contains(boundary, true))
    }

    /// Total length of the segments that have an annotation of `kind`.
    #[must_use]
    pub fn total_annotated_time(&self, kind: OralAnnotationType) -> Duration {
        let seconds: f32 = self
            .segments
            .iter()
            .filter(|s| s.has_oral_annotation(kind))
            .map(Segment::length)
            .sum();
        Duration::try_from_secs_f32(seconds).unwrap_or(Duration::ZERO)
    }

    /// End of the last segment, or 0 for an empty tier.
    #[must_use]
    pub fn end_of_last_segment(&self) -> f32 {
        self.segments.last().map_or(0.0, Segment::end)
    }

    /// Returns true once the segments reach the end of the media.
    #[must_use]
    pub fn is_fully_segmented(&self) -> bool {
        self.end_of_last_segment() >= self.total_time
    }

    /// Folder holding the oral annotation segment files.
    #[must_use]
    pub fn segment_file_folder(&self) -> &Path {
        &self.segment_file_folder
    }

    /// Path of the annotation file of `kind` for a segment at `range`.
    #[must_use]
    pub fn segment_file_path(&self, kind: OralAnnotationType, range: TimeRange) -> PathBuf {
        self.segment_file_folder
            .join(segment_file_name(kind, range.start, range.end, &self.config))
    }

    /// Path of the careful speech file of the segment at `index`.
    #[must_use]
    pub fn careful_speech_path(&self, index: usize) -> Option<PathBuf> {
        self.segments
            .get(index)
            .map(|s| self.segment_file_path(OralAnnotationType::CarefulSpeech, s.range()))
    }

    /// Path of the oral translation file of the segment at `index`.
    #[must_use]
    pub fn oral_translation_path(&self, index: usize) -> Option<PathBuf> {
        self.segments
            .get(index)
            .map(|s| self.segment_file_path(OralAnnotationType::Translation, s.range()))
    }

    /// Returns true if `[start, end)` meets the minimum segment length.
    #[must_use]
    pub fn is_acceptable_segment_length(&self, start: f32, end: f32) -> bool {
        self.config.is_acceptable_length(start, end)
    }

    // ------------------------------------------------------------------
    // Adding and removing segments
    // ------------------------------------------------------------------

    /// Appends a segment from the end of the last segment (or 0) to `end`.
    ///
    /// The minimum length is not enforced here; interactive edits go
    /// through [`TimeTier::insert_segment_boundary`].
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` if `end` is not after the end of the last
    /// segment. That is a caller bug, not a user edit to decline.
    pub fn append_segment(&mut self, end: f32) -> CoreResult<TimeRange> {
        let start = self.end_of_last_segment();
        if end <= start {
            return Err(CoreError::invalid_argument(format!(
                "cannot append a segment ending at {end}: the last segment ends at {start}"
            )));
        }
        Ok(self.add_segment(start, end))
    }

    /// Unchecked append for bulk construction.
    pub(crate) fn add_segment(&mut self, start: f32, end: f32) -> TimeRange {
        let segment = Segment::new(start, end);
        let range = segment.range();
        self.segments.push(segment);
        range
    }

    /// Removes the first segment ending at `boundary`.
    pub fn remove_segment_having_end_boundary(&mut self, boundary: f32) -> bool {
        match self.segment_having_end_boundary(boundary).map(|s| s.index()) {
            Some(index) => self.remove_segment_at(index),
            None => false,
        }
    }

    /// Removes the segment whose range equals `range`.
    pub fn remove_segment(&mut self, range: TimeRange) -> bool {
        match self.index_of_segment(range) {
            Some(index) => self.remove_segment_at(index),
            None => false,
        }
    }

    /// Removes the segment at `index`.
    ///
    /// If it is not the last segment, the next segment's start moves back
    /// to absorb the removed span, and its files are renamed to match
    /// before the removed segment's files are deleted.
    pub fn remove_segment_at(&mut self, index: usize) -> bool {
        let Some(removed) = self.segments.get(index).map(Segment::range) else {
            return false;
        };

        if let Some(next) = self.segments.get(index + 1).map(Segment::range) {
            self.files()
                .rename(next, TimeRange::new(removed.start, next.end));
            self.segments[index + 1].set_start(removed.start);
        }

        self.files().delete(removed);
        self.segments.remove(index);

        tracing::debug!(tier = %self.id, %removed, remaining = self.segments.len(), "removed segment");
        true
    }

    // ------------------------------------------------------------------
    // Moving and inserting boundaries
    // ------------------------------------------------------------------

    /// Moves the end boundary of the segment ending at `old_end`.
    pub fn change_end_boundary_at(
        &mut self,
        old_end: f32,
        new_end: f32,
    ) -> BoundaryModificationResult {
        match self.segment_having_end_boundary(old_end).map(|s| s.range()) {
            Some(range) => self.change_segments_end_boundary(range, new_end),
            None => BoundaryModificationResult::SegmentNotFound,
        }
    }

    /// Moves the end boundary of the segment at `range` to `new_end`,
    /// moving the next segment's start with it.
    pub fn change_segments_end_boundary(
        &mut self,
        range: TimeRange,
        new_end: f32,
    ) -> BoundaryModificationResult {
        if !self.is_acceptable_segment_length(range.start, new_end) {
            return BoundaryModificationResult::SegmentWillBeTooShort;
        }

        let Some(index) = self.index_of_segment(range) else {
            return BoundaryModificationResult::SegmentNotFound;
        };

        let next = self.segments.get(index + 1).map(Segment::range);
        if let Some(next) = next {
            if !self.is_acceptable_segment_length(new_end, next.end) {
                return BoundaryModificationResult::NextSegmentWillBeTooShort;
            }
        }

        let files = self.files();
        files.rename(range, TimeRange::new(range.start, new_end));
        if let Some(next) = next {
            files.rename(next, TimeRange::new(new_end, next.end));
        }

        self.segments[index].set_end(new_end);
        if next.is_some() {
            self.segments[index + 1].set_start(new_end);
        }

        tracing::debug!(tier = %self.id, %range, new_end, "moved segment end boundary");
        BoundaryModificationResult::Success
    }

    /// Adds a boundary at `boundary`.
    ///
    /// A boundary strictly inside a segment splits it; the first half keeps
    /// the segment's files, renamed for its new end. Any other boundary
    /// appends a segment from the end of the last segment. Both halves of a
    /// split are checked before anything changes.
    pub fn insert_segment_boundary(&mut self, boundary: f32) -> BoundaryModificationResult {
        let Some(index) = self.index_of_segment_strictly_containing(boundary) else {
            let start = self.end_of_last_segment();
            if !self.is_acceptable_segment_length(start, boundary) {
                return BoundaryModificationResult::SegmentWillBeTooShort;
            }
            self.add_segment(start, boundary);
            tracing::debug!(tier = %self.id, start, end = boundary, "appended segment");
            return BoundaryModificationResult::Success;
        };

        let range = self.segments[index].range();
        if !self.is_acceptable_segment_length(range.start, boundary) {
            return BoundaryModificationResult::SegmentWillBeTooShort;
        }
        if !self.is_acceptable_segment_length(boundary, range.end) {
            return BoundaryModificationResult::NextSegmentWillBeTooShort;
        }

        self.files()
            .rename(range, TimeRange::new(range.start, boundary));
        self.segments[index].set_end(boundary);
        self.segments
            .insert(index + 1, Segment::new(boundary, range.end));

        tracing::debug!(tier = %self.id, %range, boundary, "split segment");
        BoundaryModificationResult::Success
    }

    /// Returns true if the boundary at `boundary` may move `delta` seconds
    /// to the left.
    ///
    /// Cheap enough to call on every drag event.
    #[must_use]
    pub fn can_boundary_move_left(&self, boundary: f32, delta: f32) -> bool {
        if self.read_only_time_ranges {
            return false;
        }

        let new_boundary = boundary - delta;
        if new_boundary <= 0.0 {
            return false;
        }

        self.segment_having_end_boundary(boundary)
            .or_else(|| self.segment_enclosing_time(boundary))
            .map_or(true, |s| {
                self.is_acceptable_segment_length(s.range().start, new_boundary)
            })
    }

    /// Returns true if the boundary at `boundary` may move `delta` seconds
    /// to the right without passing `limit`.
    #[must_use]
    pub fn can_boundary_move_right(&self, boundary: f32, delta: f32, limit: f32) -> bool {
        if self.read_only_time_ranges {
            return false;
        }

        let new_boundary = boundary + delta;
        if new_boundary <= 0.0 || new_boundary > limit {
            return false;
        }

        if let Some(segment) = self.segment_having_end_boundary(boundary) {
            return segment.next().map_or(true, |next| {
                self.is_acceptable_segment_length(new_boundary, next.range().end)
            });
        }

        self.segment_enclosing_time(boundary).map_or(true, |s| {
            self.is_acceptable_segment_length(new_boundary, s.range().end)
        })
    }

    // ------------------------------------------------------------------
    // Segment files
    // ------------------------------------------------------------------

    fn files(&self) -> SegmentFiles<'_> {
        SegmentFiles {
            store: self.store.as_ref(),
            observer: self.observer.as_deref(),
            folder: &self.segment_file_folder,
            config: &self.config,
        }
    }

    /// Renames the annotation files of the segment at `index` to the names
    /// for `[new_start, new_end)`.
    ///
    /// Each kind is attempted independently; failures are logged and
    /// returned, never propagated.
    pub fn rename_annotation_segment_files(
        &self,
        index: usize,
        new_start: f32,
        new_end: f32,
    ) -> Vec<SegmentFileOutcome> {
        match self.segments.get(index) {
            Some(segment) => self
                .files()
                .rename(segment.range(), TimeRange::new(new_start, new_end)),
            None => Vec::new(),
        }
    }

    /// Deletes the annotation files of the segment at `index`, through the
    /// backup policy when one is registered.
    pub fn delete_annotation_segment_files(&self, index: usize) -> Vec<SegmentFileOutcome> {
        match self.segments.get(index) {
            Some(segment) => self.files().delete(segment.range()),
            None => Vec::new(),
        }
    }

    /// Sets every segment's annotation flags from the files on disk.
    pub fn refresh_oral_annotation_flags(&mut self) {
        let flags: Vec<[bool; 2]> = self
            .segments
            .iter()
            .map(|s| {
                OralAnnotationType::ALL
                    .map(|kind| self.store.exists(&self.segment_file_path(kind, s.range())))
            })
            .collect();

        for (segment, present) in self.segments.iter_mut().zip(flags) {
            for (kind, present) in OralAnnotationType::ALL.into_iter().zip(present) {
                segment.set_has_oral_annotation(kind, present);
            }
        }
    }

    /// Files in the segment folder that belong to no current segment.
    ///
    /// # Errors
    ///
    /// Returns an error if the folder exists but cannot be listed.
    pub fn find_orphaned_segment_files(&self) -> CoreResult<Vec<PathBuf>> {
        let expected: HashSet<PathBuf> = self
            .segments
            .iter()
            .flat_map(|s| {
                OralAnnotationType::ALL.map(|kind| self.segment_file_path(kind, s.range()))
            })
            .collect();

        Ok(self
            .store
            .list(&self.segment_file_folder)?
            .into_iter()
            .filter(|path| !expected.contains(path))
            .collect())
    }

    // ------------------------------------------------------------------
    // Diagnostics
    // ------------------------------------------------------------------

    /// Summary figures for the tier.
    #[must_use]
    pub fn stats(&self) -> TierStats {
        TierStats::for_tier(self)
    }

    /// Checks ordering, contiguity and minimum length.
    ///
    /// Tiers edited only through this type never have violations;
    /// documents edited elsewhere may.
    #[must_use]
    pub fn verify_invariants(&self) -> Vec<TierViolation> {
        TierViolation::find(self)
    }
}

fn folder_for(media_file: &Path, config: &TierConfig) -> PathBuf {
    let mut folder = media_file.as_os_str().to_os_string();
    folder.push(&config.annotations_folder_suffix);
    PathBuf::from(folder)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::segment_files::BackupToFolder;
    use saymore_storage::InMemoryFileStore;

    const FOLDER: &str = "/s/a.wav_Annotations";

    fn store() -> Arc<InMemoryFileStore> {
        Arc::new(InMemoryFileStore::new())
    }

    fn tier(store: &Arc<InMemoryFileStore>, min_ms: u32, ranges: &[(f32, f32)]) -> TimeTier {
        TimeTier::new("/s/a.wav", 10.0, store.clone())
            .with_config(TierConfig::new().minimum_segment_length_ms(min_ms))
            .with_segments(ranges.iter().map(|&(s, e)| TimeRange::new(s, e)))
    }

    fn ranges(tier: &TimeTier) -> Vec<(f32, f32)> {
        tier.segments().iter().map(|s| (s.start(), s.end())).collect()
    }

    fn file(name: &str) -> PathBuf {
        Path::new(FOLDER).join(name)
    }

    #[test]
    fn defaults() {
        let tier = TimeTier::new("/s/a.wav", 10.0, store());
        assert_eq!(tier.id(), "Source");
        assert!(tier.is_empty());
        assert_eq!(tier.end_of_last_segment(), 0.0);
        assert!(!tier.is_fully_segmented());
        assert_eq!(tier.segment_file_folder(), Path::new(FOLDER));
    }

    #[test]
    fn segment_folder_follows_config() {
        let tier = TimeTier::new("/s/a.wav", 10.0, store())
            .with_config(TierConfig::new().annotations_folder_suffix("_Oral"));
        assert_eq!(tier.segment_file_folder(), Path::new("/s/a.wav_Oral"));
    }

    #[test]
    fn append_segment() {
        let mut tier = tier(&store(), 100, &[]);
        assert_eq!(tier.append_segment(3.0).unwrap(), TimeRange::new(0.0, 3.0));
        assert_eq!(tier.append_segment(5.9).unwrap(), TimeRange::new(3.0, 5.9));
        assert!(matches!(
            tier.append_segment(5.9),
            Err(CoreError::InvalidArgument { .. })
        ));
        assert_eq!(ranges(&tier), vec![(0.0, 3.0), (3.0, 5.9)]);
    }

    #[test]
    fn fully_segmented_when_reaching_total_time() {
        let mut tier = tier(&store(), 500, &[(0.0, 4.0)]);
        assert!(!tier.is_fully_segmented());
        tier.append_segment(10.0).unwrap();
        assert!(tier.is_fully_segmented());
    }

    #[test]
    fn lookups() {
        let tier = tier(&store(), 500, &[(0.0, 1.0), (1.0, 2.0)]);
        assert_eq!(tier.index_of_segment(TimeRange::new(1.0, 2.0)), Some(1));
        assert_eq!(tier.index_of_segment(TimeRange::new(1.0, 2.5)), None);
        assert_eq!(tier.segment_having_end_boundary(1.0).unwrap().index(), 0);
        assert_eq!(tier.segment_having_start_boundary(1.0).unwrap().index(), 1);
        assert!(tier.segment_having_end_boundary(1.5).is_none());
    }

    #[test]
    fn enclosing_time_prefers_later_segment_on_shared_boundary() {
        let tier = tier(&store(), 500, &[(0.0, 1.0), (1.0, 2.0)]);
        assert_eq!(tier.segment_enclosing_time(0.0).unwrap().index(), 0);
        assert_eq!(tier.segment_enclosing_time(0.5).unwrap().index(), 0);
        assert_eq!(tier.segment_enclosing_time(1.0).unwrap().index(), 1);
        assert!(tier.segment_enclosing_time(2.0).is_none());
    }

    #[test]
    fn total_annotated_time() {
        let mut tier = tier(&store(), 500, &[(0.0, 1.5), (1.5, 4.0), (4.0, 5.0)]);
        tier.segment_mut(0)
            .unwrap()
            .set_has_oral_annotation(OralAnnotationType::CarefulSpeech, true);
        tier.segment_mut(2)
            .unwrap()
            .set_has_oral_annotation(OralAnnotationType::CarefulSpeech, true);

        assert_eq!(
            tier.total_annotated_time(OralAnnotationType::CarefulSpeech),
            Duration::from_millis(2500)
        );
        assert_eq!(
            tier.total_annotated_time(OralAnnotationType::Translation),
            Duration::ZERO
        );
    }

    #[test]
    fn change_end_boundary_moves_next_start() {
        let store = store();
        store.insert(&file("0_to_2_Careful.wav"), vec![1]);
        store.insert(&file("2_to_5_Translation.wav"), vec![2]);
        let mut tier = tier(&store, 1000, &[(0.0, 2.0), (2.0, 5.0)]);

        assert_eq!(
            tier.change_end_boundary_at(2.0, 3.0),
            BoundaryModificationResult::Success
        );
        assert_eq!(ranges(&tier), vec![(0.0, 3.0), (3.0, 5.0)]);
        assert_eq!(
            store.paths(),
            vec![file("0_to_3_Careful.wav"), file("3_to_5_Translation.wav")]
        );
    }

    #[test]
    fn change_end_boundary_rejections() {
        let store = store();
        store.insert(&file("0_to_2_Careful.wav"), vec![1]);
        let mut tier = tier(&store, 1000, &[(0.0, 2.0), (2.0, 5.0)]);

        assert_eq!(
            tier.change_end_boundary_at(2.0, 0.5),
            BoundaryModificationResult::SegmentWillBeTooShort
        );
        assert_eq!(
            tier.change_end_boundary_at(2.0, 4.5),
            BoundaryModificationResult::NextSegmentWillBeTooShort
        );
        assert_eq!(
            tier.change_end_boundary_at(2.5, 3.0),
            BoundaryModificationResult::SegmentNotFound
        );
        assert_eq!(ranges(&tier), vec![(0.0, 2.0), (2.0, 5.0)]);
        assert_eq!(store.paths(), vec![file("0_to_2_Careful.wav")]);
    }

    #[test]
    fn last_segment_end_can_move_freely() {
        let mut tier = tier(&store(), 1000, &[(0.0, 2.0), (2.0, 5.0)]);
        assert_eq!(
            tier.change_segments_end_boundary(TimeRange::new(2.0, 5.0), 9.0),
            BoundaryModificationResult::Success
        );
        assert_eq!(ranges(&tier), vec![(0.0, 2.0), (2.0, 9.0)]);
    }

    #[test]
    fn split_renames_first_half_only() {
        let store = store();
        store.insert(&file("2_to_5_Careful.wav"), vec![1]);
        let mut tier = tier(&store, 1000, &[(0.0, 2.0), (2.0, 5.0)]);

        assert_eq!(
            tier.insert_segment_boundary(3.5),
            BoundaryModificationResult::Success
        );
        assert_eq!(ranges(&tier), vec![(0.0, 2.0), (2.0, 3.5), (3.5, 5.0)]);
        assert_eq!(store.paths(), vec![file("2_to_3.5_Careful.wav")]);
    }

    #[test]
    fn split_rejections_leave_tier_unchanged() {
        let mut tier = tier(&store(), 1000, &[(0.0, 2.0), (2.0, 5.0)]);
        assert_eq!(
            tier.insert_segment_boundary(2.5),
            BoundaryModificationResult::SegmentWillBeTooShort
        );
        assert_eq!(
            tier.insert_segment_boundary(4.5),
            BoundaryModificationResult::NextSegmentWillBeTooShort
        );
        assert_eq!(ranges(&tier), vec![(0.0, 2.0), (2.0, 5.0)]);
    }

    #[test]
    fn insert_past_end_appends() {
        let mut tier = tier(&store(), 1000, &[(0.0, 2.0)]);
        assert_eq!(
            tier.insert_segment_boundary(2.5),
            BoundaryModificationResult::SegmentWillBeTooShort
        );
        assert_eq!(
            tier.insert_segment_boundary(4.0),
            BoundaryModificationResult::Success
        );
        assert_eq!(ranges(&tier), vec![(0.0, 2.0), (2.0, 4.0)]);
    }

    #[test]
    fn insert_on_existing_boundary_is_rejected() {
        let mut tier = tier(&store(), 500, &[(0.0, 2.0), (2.0, 5.0)]);
        assert_eq!(
            tier.insert_segment_boundary(2.0),
            BoundaryModificationResult::SegmentWillBeTooShort
        );
        assert_eq!(tier.len(), 2);
    }

    #[test]
    fn remove_middle_segment_absorbs_gap() {
        let store = store();
        store.insert(&file("2_to_5_Careful.wav"), vec![1]);
        store.insert(&file("5_to_8_Careful.wav"), vec![2]);
        let mut tier = tier(&store, 500, &[(0.0, 2.0), (2.0, 5.0), (5.0, 8.0)]);

        assert!(tier.remove_segment(TimeRange::new(2.0, 5.0)));
        assert_eq!(ranges(&tier), vec![(0.0, 2.0), (2.0, 8.0)]);
        assert_eq!(store.paths(), vec![file("2_to_8_Careful.wav")]);
        assert_eq!(store.contents(&file("2_to_8_Careful.wav")), Some(vec![2]));
    }

    #[test]
    fn remove_last_and_missing_segments() {
        let mut tier = tier(&store(), 500, &[(0.0, 2.0), (2.0, 5.0)]);
        assert!(tier.remove_segment_having_end_boundary(5.0));
        assert_eq!(ranges(&tier), vec![(0.0, 2.0)]);
        assert!(!tier.remove_segment_having_end_boundary(5.0));
        assert!(!tier.remove_segment_at(3));
        assert!(!tier.remove_segment(TimeRange::new(0.0, 1.0)));
    }

    #[test]
    fn removal_with_backup_policy_keeps_copies() {
        let store = store();
        store.insert(&file("0_to_2_Careful.wav"), vec![1]);
        let mut tier = tier(&store, 500, &[(0.0, 2.0), (2.0, 5.0)])
            .with_observer(Arc::new(BackupToFolder::new("/backup")));

        assert!(tier.remove_segment_at(0));
        assert_eq!(store.paths(), vec![PathBuf::from("/backup/0_to_2_Careful.wav")]);
    }

    #[test]
    fn can_boundary_move_left() {
        let mut tier = tier(&store(), 1000, &[(0.0, 2.0), (2.0, 5.0)]);
        assert!(tier.can_boundary_move_left(2.0, 0.5));
        assert!(tier.can_boundary_move_left(2.0, 1.0));
        assert!(!tier.can_boundary_move_left(2.0, 1.5));
        assert!(!tier.can_boundary_move_left(2.0, 2.0));
        assert!(tier.can_boundary_move_left(5.0, 2.0));
        assert!(!tier.can_boundary_move_left(5.0, 2.5));

        tier.set_read_only_time_ranges(true);
        assert!(!tier.can_boundary_move_left(2.0, 0.5));
    }

    #[test]
    fn can_boundary_move_right() {
        let tier = tier(&store(), 1000, &[(0.0, 2.0), (2.0, 5.0)]);
        assert!(tier.can_boundary_move_right(2.0, 2.0, 10.0));
        assert!(!tier.can_boundary_move_right(2.0, 2.5, 10.0));
        assert!(tier.can_boundary_move_right(5.0, 5.0, 10.0));
        assert!(!tier.can_boundary_move_right(5.0, 5.5, 10.0));
        assert!(!tier.can_boundary_move_right(2.0, -2.0, 10.0));
    }

    #[test]
    fn can_boundary_move_when_empty() {
        let tier = tier(&store(), 1000, &[]);
        assert!(tier.can_boundary_move_left(3.0, 1.0));
        assert!(!tier.can_boundary_move_left(3.0, 3.0));
        assert!(tier.can_boundary_move_right(3.0, 1.0, 10.0));
    }

    #[test]
    fn refresh_flags_and_find_orphans() {
        let store = store();
        store.insert(&file("0_to_2_Careful.wav"), vec![1]);
        store.insert(&file("2_to_5_Translation.wav"), vec![2]);
        store.insert(&file("7_to_9_Careful.wav"), vec![3]);
        let mut tier = tier(&store, 500, &[(0.0, 2.0), (2.0, 5.0)]);

        tier.refresh_oral_annotation_flags();
        let first = &tier.segments()[0];
        assert!(first.has_oral_annotation(OralAnnotationType::CarefulSpeech));
        assert!(!first.has_oral_annotation(OralAnnotationType::Translation));
        assert!(tier.segments()[1].has_oral_annotation(OralAnnotationType::Translation));

        assert_eq!(
            tier.find_orphaned_segment_files().unwrap(),
            vec![file("7_to_9_Careful.wav")]
        );
    }

    #[test]
    fn segment_paths() {
        let tier = tier(&store(), 500, &[(0.0, 2.5)]);
        assert_eq!(tier.careful_speech_path(0), Some(file("0_to_2.5_Careful.wav")));
        assert_eq!(
            tier.oral_translation_path(0),
            Some(file("0_to_2.5_Translation.wav"))
        );
        assert_eq!(tier.careful_speech_path(1), None);
        assert_eq!(
            tier.segment(0).unwrap().careful_speech_path(),
            file("0_to_2.5_Careful.wav")
        );
    }
}
