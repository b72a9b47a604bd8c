//! Value types shared across the crate.

use std::fmt;

/// A span of media time in seconds, `[start, end)`.
///
/// Ranges compare by value with exact floating point equality. Segment
/// file names are computed from these values, so a range must survive
/// any round trip bit for bit.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TimeRange {
    /// Start time in seconds.
    pub start: f32,
    /// End time in seconds.
    pub end: f32,
}

impl TimeRange {
    /// Creates a range.
    #[must_use]
    pub const fn new(start: f32, end: f32) -> Self {
        Self { start, end }
    }

    /// Length in seconds.
    #[must_use]
    pub fn length(&self) -> f32 {
        self.end - self.start
    }

    /// Returns true if `time` lies in the range.
    ///
    /// With `exclusive` set, both ends are excluded (`start < time < end`);
    /// otherwise both are included.
    #[must_use]
    pub fn contains(&self, time: f32, exclusive: bool) -> bool {
        if exclusive {
            time > self.start && time < self.end
        } else {
            time >= self.start && time <= self.end
        }
    }

    /// Returns true if `time` lies in the range, choosing per end whether it
    /// is included.
    #[must_use]
    pub fn is_time_in_range(&self, time: f32, include_start: bool, include_end: bool) -> bool {
        let after_start = if include_start {
            time >= self.start
        } else {
            time > self.start
        };
        let before_end = if include_end {
            time <= self.end
        } else {
            time < self.end
        };
        after_start && before_end
    }
}

impl fmt::Display for TimeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {})", self.start, self.end)
    }
}

/// The two kinds of recorded oral annotation a segment can have.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OralAnnotationType {
    /// A slow, clear re-recording of the segment.
    CarefulSpeech,
    /// A spoken translation of the segment.
    Translation,
}

impl OralAnnotationType {
    /// Both kinds, in the order their files are processed.
    pub const ALL: [Self; 2] = [Self::CarefulSpeech, Self::Translation];
}

impl fmt::Display for OralAnnotationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CarefulSpeech => write!(f, "careful speech"),
            Self::Translation => write!(f, "oral translation"),
        }
    }
}

/// Outcome of a boundary edit.
///
/// Every variant other than `Success` means the tier was left unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use]
pub enum BoundaryModificationResult {
    /// The edit was applied.
    Success,
    /// No segment matched the given boundary or range.
    SegmentNotFound,
    /// The edited segment would be shorter than the minimum length.
    SegmentWillBeTooShort,
    /// The following segment would be shorter than the minimum length.
    NextSegmentWillBeTooShort,
}

impl BoundaryModificationResult {
    /// Returns true for `Success`.
    #[must_use]
    pub fn is_success(self) -> bool {
        self == Self::Success
    }
}

/// Why a segment file is about to become obsolete.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObsoleteReason {
    /// The file is about to be moved to a name for new boundaries.
    Renamed,
    /// The file's segment was removed.
    Deleted,
}
