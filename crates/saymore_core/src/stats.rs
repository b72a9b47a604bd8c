//! Tier statistics and invariant verification.

use crate::time_tier::TimeTier;
use crate::types::{OralAnnotationType, TimeRange};
use std::fmt;
use std::time::Duration;

/// Summary figures for a time tier.
#[derive(Debug, Clone, PartialEq)]
pub struct TierStats {
    /// Number of segments.
    pub segment_count: usize,
    /// Sum of segment lengths, in seconds.
    pub segmented_time: f32,
    /// Media duration, in seconds.
    pub total_time: f32,
    /// Time covered by segments with careful speech recordings.
    pub careful_speech_time: Duration,
    /// Time covered by segments with oral translation recordings.
    pub oral_translation_time: Duration,
    /// Whether the segments reach the end of the media.
    pub fully_segmented: bool,
}

impl TierStats {
    /// Computes the figures for `tier`.
    #[must_use]
    pub fn for_tier(tier: &TimeTier) -> Self {
        Self {
            segment_count: tier.len(),
            segmented_time: tier.segments().iter().map(|s| s.length()).sum(),
            total_time: tier.total_time(),
            careful_speech_time: tier.total_annotated_time(OralAnnotationType::CarefulSpeech),
            oral_translation_time: tier.total_annotated_time(OralAnnotationType::Translation),
            fully_segmented: tier.is_fully_segmented(),
        }
    }

    /// Segmented share of the media, from 0 to 1.
    #[must_use]
    pub fn coverage(&self) -> f32 {
        if self.total_time <= 0.0 {
            return 0.0;
        }
        (self.segmented_time / self.total_time).clamp(0.0, 1.0)
    }
}

/// A broken tier invariant, found by [`TimeTier::verify_invariants`].
#[derive(Debug, Clone, PartialEq)]
pub enum TierViolation {
    /// A segment does not end after it starts.
    EmptySegment {
        /// Segment position.
        index: usize,
        /// Its range.
        range: TimeRange,
    },
    /// A segment is shorter than the minimum length.
    TooShort {
        /// Segment position.
        index: usize,
        /// Its range.
        range: TimeRange,
        /// The configured minimum, in seconds.
        minimum: f32,
    },
    /// A segment starts after the previous one ends.
    Gap {
        /// Position of the later segment.
        index: usize,
        /// End of the previous segment.
        previous_end: f32,
        /// Start of this segment.
        start: f32,
    },
    /// A segment starts before the previous one ends.
    Overlap {
        /// Position of the later segment.
        index: usize,
        /// End of the previous segment.
        previous_end: f32,
        /// Start of this segment.
        start: f32,
    },
}

impl TierViolation {
    pub(crate) fn find(tier: &TimeTier) -> Vec<Self> {
        let config = tier.config();
        let mut violations = Vec::new();
        let mut previous_end: Option<f32> = None;

        for (index, segment) in tier.segments().iter().enumerate() {
            let range = segment.range();

            if range.end <= range.start {
                violations.push(Self::EmptySegment { index, range });
            } else if !config.is_acceptable_length(range.start, range.end) {
                violations.push(Self::TooShort {
                    index,
                    range,
                    minimum: config.minimum_segment_length(),
                });
            }

            if let Some(previous_end) = previous_end {
                if range.start > previous_end {
                    violations.push(Self::Gap {
                        index,
                        previous_end,
                        start: range.start,
                    });
                } else if range.start < previous_end {
                    violations.push(Self::Overlap {
                        index,
                        previous_end,
                        start: range.start,
                    });
                }
            }
            previous_end = Some(range.end);
        }

        violations
    }
}

impl fmt::Display for TierViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptySegment { index, range } => {
                write!(f, "segment {index} {range} does not end after it starts")
            }
            Self::TooShort {
                index,
                range,
                minimum,
            } => write!(
                f,
                "segment {index} {range} is shorter than the minimum of {minimum}s"
            ),
            Self::Gap {
                index,
                previous_end,
                start,
            } => write!(
                f,
                "gap before segment {index}: previous segment ends at {previous_end}, this one starts at {start}"
            ),
            Self::Overlap {
                index,
                previous_end,
                start,
            } => write!(
                f,
                "segment {index} starts at {start}, before the previous segment ends at {previous_end}"
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TierConfig;
    use saymore_storage::InMemoryFileStore;
    use std::sync::Arc;

    fn tier(ranges: &[(f32, f32)]) -> TimeTier {
        TimeTier::new("a.wav", 10.0, Arc::new(InMemoryFileStore::new()))
            .with_config(TierConfig::new().minimum_segment_length_ms(500))
            .with_segments(ranges.iter().map(|&(s, e)| TimeRange::new(s, e)))
    }

    #[test]
    fn stats() {
        let stats = tier(&[(0.0, 2.0), (2.0, 5.0)]).stats();
        assert_eq!(stats.segment_count, 2);
        assert_eq!(stats.segmented_time, 5.0);
        assert!(!stats.fully_segmented);
        assert_eq!(stats.coverage(), 0.5);
        assert_eq!(stats.careful_speech_time, Duration::ZERO);
    }

    #[test]
    fn valid_tier_has_no_violations() {
        assert!(tier(&[(0.0, 2.0), (2.0, 5.0)]).verify_invariants().is_empty());
        assert!(tier(&[]).verify_invariants().is_empty());
    }

    #[test]
    fn leading_gap_is_allowed() {
        assert!(tier(&[(1.0, 2.0), (2.0, 5.0)]).verify_invariants().is_empty());
    }

    #[test]
    fn finds_each_kind_of_violation() {
        let violations = tier(&[(0.0, 2.0), (3.0, 3.2), (3.1, 5.0), (6.0, 6.0)]).verify_invariants();
        assert_eq!(
            violations,
            vec![
                TierViolation::TooShort {
                    index: 1,
                    range: TimeRange::new(3.0, 3.2),
                    minimum: 0.5
                },
                TierViolation::Gap {
                    index: 1,
                    previous_end: 2.0,
                    start: 3.0
                },
                TierViolation::Overlap {
                    index: 2,
                    previous_end: 3.2,
                    start: 3.1
                },
                TierViolation::EmptySegment {
                    index: 3,
                    range: TimeRange::new(6.0, 6.0)
                },
                TierViolation::Gap {
                    index: 3,
                    previous_end: 5.0,
                    start: 6.0
                },
            ]
        );
        assert!(violations[2].to_string().contains("before the previous segment"));
    }
}
