//! # SayMore Core
//!
//! Time-tier segmentation for SayMore transcription sessions.
//!
//! This crate provides:
//! - [`TimeTier`], the ordered contiguous segments over one recording
//! - Boundary editing with minimum-length checks and segment file renaming
//! - [`TierCollection`], keeping text tiers aligned with the segments
//! - [`AnnotationFile`], loading and saving tiers as ELAN documents
//! - Import from boundary lists and Audacity label files
//!
//! ## Segment Files
//!
//! Careful speech and oral translation recordings of a segment live in
//! `<media>_Annotations/<start>_to_<end><suffix>`. Their names follow the
//! segment boundaries, so every boundary edit renames them before the new
//! ranges are committed.
//!
//! ## Example
//!
//! ```rust
//! use saymore_core::{TierConfig, TimeRange, TimeTier};
//! use saymore_storage::InMemoryFileStore;
//! use std::sync::Arc;
//!
//! let mut tier = TimeTier::new("Recording.wav", 10.0, Arc::new(InMemoryFileStore::new()))
//!     .with_config(TierConfig::new().minimum_segment_length_ms(500));
//!
//! tier.append_segment(4.0).unwrap();
//! assert!(tier.insert_segment_boundary(7.0).is_success());
//! assert!(tier.insert_segment_boundary(2.0).is_success());
//!
//! // Would leave a 0.2s segment behind.
//! assert!(!tier.change_end_boundary_at(2.0, 3.8).is_success());
//!
//! assert_eq!(
//!     tier.ranges(),
//!     vec![
//!         TimeRange::new(0.0, 2.0),
//!         TimeRange::new(2.0, 4.0),
//!         TimeRange::new(4.0, 7.0)
//!     ]
//! );
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod annotation_file;
mod config;
mod error;
mod import;
mod media;
mod segment;
mod segment_files;
mod stats;
mod text_tier;
mod tier_collection;
mod time_tier;
mod types;

pub use annotation_file::{annotation_file_path_for, AnnotationFile};
pub use config::TierConfig;
pub use error::{CoreError, CoreResult};
pub use import::{
    parse_audacity_labels, read_audacity_labels, segments_from_time_strings, AudacityLabel,
};
pub use media::{FixedDuration, MediaProbe, WavProbe};
pub use segment::{Segment, SegmentRef};
pub use segment_files::{
    careful_speech_file_name, oral_translation_file_name, parse_segment_file_name,
    segment_file_name, BackupToFolder, DeleteObsoleteFiles, FileOperation, SegmentFileObserver,
    SegmentFileOutcome,
};
pub use stats::{TierStats, TierViolation};
pub use text_tier::{TextTier, TextTierType};
pub use tier_collection::TierCollection;
pub use time_tier::{TimeTier, DEFAULT_TIME_TIER_ID};
pub use types::{BoundaryModificationResult, ObsoleteReason, OralAnnotationType, TimeRange};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
