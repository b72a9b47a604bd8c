//! Property-based test generators using proptest.
//!
//! Times are generated as whole milliseconds, the precision annotation
//! files store, so generated boundaries survive a save and reload.

use proptest::prelude::*;
use saymore_core::{TimeRange, TimeTier};
use saymore_eaf::ms_to_seconds;

/// Strategy for times between 1ms and `max_ms`, in seconds.
pub fn seconds_strategy(max_ms: u32) -> impl Strategy<Value = f32> {
    (1..=max_ms).prop_map(|ms| ms_to_seconds(u64::from(ms)))
}

/// Strategy for strictly increasing end boundaries below `max_ms`.
pub fn boundaries_strategy(max_ms: u32, max_count: usize) -> impl Strategy<Value = Vec<f32>> {
    prop::collection::btree_set(1..=max_ms, 0..max_count).prop_map(|set| {
        set.into_iter()
            .map(|ms| ms_to_seconds(u64::from(ms)))
            .collect()
    })
}

/// Strategy for contiguous segments starting at 0.
pub fn contiguous_ranges_strategy(
    max_ms: u32,
    max_count: usize,
) -> impl Strategy<Value = Vec<TimeRange>> {
    boundaries_strategy(max_ms, max_count).prop_map(|ends| {
        let mut start = 0.0;
        ends.into_iter()
            .map(|end| {
                let range = TimeRange::new(start, end);
                start = end;
                range
            })
            .collect()
    })
}

/// One edit a user (or a document import) can make to a tier.
#[derive(Debug, Clone)]
pub enum TierOperation {
    /// Append a segment of `length` seconds after the last one
    Append {
        /// Segment length
        length: f32,
    },
    /// Insert a boundary, splitting or appending
    InsertBoundary {
        /// Boundary time
        at: f32,
    },
    /// Move the end boundary of a segment
    ChangeEndBoundary {
        /// Segment position, taken modulo the segment count
        index: usize,
        /// New end time
        new_end: f32,
    },
    /// Remove a segment
    Remove {
        /// Segment position, taken modulo the segment count
        index: usize,
    },
}

/// Strategy for any tier operation with times up to `max_ms`.
pub fn tier_operation_strategy(max_ms: u32) -> impl Strategy<Value = TierOperation> {
    prop_oneof![
        2 => seconds_strategy(max_ms / 4).prop_map(|length| TierOperation::Append { length }),
        3 => seconds_strategy(max_ms).prop_map(|at| TierOperation::InsertBoundary { at }),
        2 => (any::<usize>(), seconds_strategy(max_ms))
            .prop_map(|(index, new_end)| TierOperation::ChangeEndBoundary { index, new_end }),
        1 => any::<usize>().prop_map(|index| TierOperation::Remove { index }),
    ]
}

/// Strategy for the length-checked boundary edits only.
pub fn boundary_edit_strategy(max_ms: u32) -> impl Strategy<Value = TierOperation> {
    prop_oneof![
        3 => seconds_strategy(max_ms).prop_map(|at| TierOperation::InsertBoundary { at }),
        2 => (any::<usize>(), seconds_strategy(max_ms))
            .prop_map(|(index, new_end)| TierOperation::ChangeEndBoundary { index, new_end }),
    ]
}

/// Strategy for a sequence of operations.
pub fn operation_sequence_strategy(
    min_ops: usize,
    max_ops: usize,
    max_ms: u32,
) -> impl Strategy<Value = Vec<TierOperation>> {
    prop::collection::vec(tier_operation_strategy(max_ms), min_ops..max_ops)
}

/// Strategy for a sequence of length-checked boundary edits.
pub fn boundary_edit_sequence_strategy(
    min_ops: usize,
    max_ops: usize,
    max_ms: u32,
) -> impl Strategy<Value = Vec<TierOperation>> {
    prop::collection::vec(boundary_edit_strategy(max_ms), min_ops..max_ops)
}

/// Applies `op` to `tier`. Returns true if the tier changed.
///
/// Index-based operations on an empty tier do nothing.
pub fn apply_operation(tier: &mut TimeTier, op: &TierOperation) -> bool {
    match *op {
        TierOperation::Append { length } => {
            let end = tier.end_of_last_segment() + length;
            tier.append_segment(end).is_ok()
        }
        TierOperation::InsertBoundary { at } => tier.insert_segment_boundary(at).is_success(),
        TierOperation::ChangeEndBoundary { index, new_end } => {
            if tier.is_empty() {
                return false;
            }
            let range = tier.segments()[index % tier.len()].range();
            tier.change_segments_end_boundary(range, new_end)
                .is_success()
        }
        TierOperation::Remove { index } => {
            if tier.is_empty() {
                return false;
            }
            tier.remove_segment_at(index % tier.len())
        }
    }
}

/// Configuration for property tests.
#[derive(Debug, Clone)]
pub struct PropTestConfig {
    /// Number of test cases to run.
    pub cases: u32,
    /// Maximum shrink iterations.
    pub max_shrink_iters: u32,
}

impl Default for PropTestConfig {
    fn default() -> Self {
        Self {
            cases: 256,
            max_shrink_iters: 1000,
        }
    }
}

impl PropTestConfig {
    /// Creates a configuration for quick tests.
    #[must_use]
    pub fn quick() -> Self {
        Self {
            cases: 32,
            max_shrink_iters: 100,
        }
    }

    /// Creates a configuration for thorough tests.
    #[must_use]
    pub fn thorough() -> Self {
        Self {
            cases: 1024,
            max_shrink_iters: 10000,
        }
    }

    /// Converts to proptest config.
    #[must_use]
    pub fn to_proptest_config(&self) -> ProptestConfig {
        ProptestConfig {
            cases: self.cases,
            max_shrink_iters: self.max_shrink_iters,
            ..ProptestConfig::default()
        }
    }
}
