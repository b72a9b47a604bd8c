//! Benchmark utilities.

#![warn(missing_docs)]

use saymore_core::{TierConfig, TimeRange, TimeTier};
use saymore_eaf::{ms_to_seconds, AnnotationDocument};
use saymore_storage::InMemoryFileStore;
use std::sync::Arc;

/// Contiguous segments of `length_ms` each, starting at 0.
pub fn uniform_ranges(count: usize, length_ms: u64) -> Vec<TimeRange> {
    (0..count as u64)
        .map(|i| TimeRange::new(ms_to_seconds(i * length_ms), ms_to_seconds((i + 1) * length_ms)))
        .collect()
}

/// A fully segmented tier of `count` segments over an in-memory store.
pub fn uniform_tier(count: usize, length_ms: u64) -> TimeTier {
    let ranges = uniform_ranges(count, length_ms);
    let total = ranges.last().map_or(0.0, |r| r.end);
    TimeTier::new("bench/Recording.wav", total, Arc::new(InMemoryFileStore::new()))
        .with_config(TierConfig::new().minimum_segment_length_ms(500))
        .with_segments(ranges)
}

/// An annotation document with `count` transcribed segments.
pub fn document_with_segments(count: usize, length_ms: u64) -> AnnotationDocument {
    let mut doc = AnnotationDocument::new_for_media("Recording.wav");
    for (i, range) in uniform_ranges(count, length_ms).into_iter().enumerate() {
        let id = doc
            .add_transcription_annotation(range.start, range.end, Some(&format!("segment {i}")))
            .unwrap();
        doc.set_dependent_annotation_value(
            saymore_eaf::FREE_TRANSLATION_TIER_ID,
            &id,
            Some("translation"),
        )
        .unwrap();
    }
    doc
}
