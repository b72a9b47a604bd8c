//! Segments and borrowed segment views.

use crate::time_tier::TimeTier;
use crate::types::{OralAnnotationType, TimeRange};
use std::path::PathBuf;

/// One time-bounded span of a [`TimeTier`].
///
/// The range can only be changed by the owning tier's boundary
/// operations, which keep the tier ordered and rename the segment's
/// files on disk first.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Segment {
    range: TimeRange,
    text: Option<String>,
    has_careful_speech: bool,
    has_oral_translation: bool,
}

impl Segment {
    pub(crate) fn new(start: f32, end: f32) -> Self {
        Self {
            range: TimeRange::new(start, end),
            ..Self::default()
        }
    }

    /// The segment's time range.
    #[must_use]
    pub fn range(&self) -> TimeRange {
        self.range
    }

    /// Start in seconds.
    #[must_use]
    pub fn start(&self) -> f32 {
        self.range.start
    }

    /// End in seconds.
    #[must_use]
    pub fn end(&self) -> f32 {
        self.range.end
    }

    /// Length in seconds.
    #[must_use]
    pub fn length(&self) -> f32 {
        self.range.length()
    }

    /// Exact comparison of the start boundary.
    #[must_use]
    pub fn starts_at(&self, time: f32) -> bool {
        self.range.start == time
    }

    /// Exact comparison of the end boundary.
    #[must_use]
    pub fn ends_at(&self, time: f32) -> bool {
        self.range.end == time
    }

    /// Optional text attached to the segment.
    #[must_use]
    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    /// Sets the segment text.
    pub fn set_text(&mut self, text: Option<String>) {
        self.text = text;
    }

    /// Returns true if a recorded annotation of `kind` exists for this segment.
    #[must_use]
    pub fn has_oral_annotation(&self, kind: OralAnnotationType) -> bool {
        match kind {
            OralAnnotationType::CarefulSpeech => self.has_careful_speech,
            OralAnnotationType::Translation => self.has_oral_translation,
        }
    }

    /// Records whether an annotation of `kind` exists.
    pub fn set_has_oral_annotation(&mut self, kind: OralAnnotationType, present: bool) {
        match kind {
            OralAnnotationType::CarefulSpeech => self.has_careful_speech = present,
            OralAnnotationType::Translation => self.has_oral_translation = present,
        }
    }

    pub(crate) fn set_start(&mut self, start: f32) {
        self.range.start = start;
    }

    pub(crate) fn set_end(&mut self, end: f32) {
        self.range.end = end;
    }
}

/// A segment seen through its tier.
///
/// This is how a segment reaches tier-level settings such as its file
/// folder or the minimum length. It borrows the tier, so it cannot
/// outlive an edit.
#[derive(Debug, Clone, Copy)]
pub struct SegmentRef<'a> {
    tier: &'a TimeTier,
    index: usize,
}

impl<'a> SegmentRef<'a> {
    pub(crate) fn new(tier: &'a TimeTier, index: usize) -> Self {
        Self { tier, index }
    }

    /// The owning tier.
    #[must_use]
    pub fn tier(&self) -> &'a TimeTier {
        self.tier
    }

    /// Position of the segment in its tier.
    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }

    /// The segment itself.
    #[must_use]
    pub fn segment(&self) -> &'a Segment {
        &self.tier.segments()[self.index]
    }

    /// The segment's range.
    #[must_use]
    pub fn range(&self) -> TimeRange {
        self.segment().range()
    }

    /// The segment that follows this one, if any.
    #[must_use]
    pub fn next(&self) -> Option<SegmentRef<'a>> {
        self.tier.segment(self.index + 1)
    }

    /// Full path of this segment's careful speech file.
    #[must_use]
    pub fn careful_speech_path(&self) -> PathBuf {
        self.tier
            .segment_file_path(OralAnnotationType::CarefulSpeech, self.range())
    }

    /// Full path of this segment's oral translation file.
    #[must_use]
    pub fn oral_translation_path(&self) -> PathBuf {
        self.tier
            .segment_file_path(OralAnnotationType::Translation, self.range())
    }

    /// Returns true if the segment meets the tier's minimum length.
    #[must_use]
    pub fn is_acceptable_length(&self) -> bool {
        let range = self.range();
        self.tier.config().is_acceptable_length(range.start, range.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn boundaries_compare_exactly() {
        let segment = Segment::new(2.5, 4.0);
        assert!(segment.starts_at(2.5));
        assert!(segment.ends_at(4.0));
        assert!(!segment.ends_at(4.000_001));
        assert_eq!(segment.length(), 1.5);
    }

    #[test]
    fn oral_annotation_flags() {
        let mut segment = Segment::new(0.0, 1.0);
        assert!(!segment.has_oral_annotation(OralAnnotationType::CarefulSpeech));

        segment.set_has_oral_annotation(OralAnnotationType::Translation, true);
        assert!(segment.has_oral_annotation(OralAnnotationType::Translation));
        assert!(!segment.has_oral_annotation(OralAnnotationType::CarefulSpeech));
    }

    #[test]
    fn text() {
        let mut segment = Segment::new(0.0, 1.0);
        assert_eq!(segment.text(), None);
        segment.set_text(Some("hello".to_string()));
        assert_eq!(segment.text(), Some("hello"));
    }
}
