//! Inspect command implementation.

use super::load_session;
use saymore_core::{OralAnnotationType, TextTierType, TierCollection, TierConfig};
use serde::Serialize;
use std::path::Path;

/// Annotation file inspection result.
#[derive(Debug, Serialize)]
pub struct InspectResult {
    /// Annotation file path.
    pub path: String,
    /// Media file the annotations refer to.
    pub media_file: String,
    /// Media duration in seconds.
    pub total_time: f32,
    /// Number of segments.
    pub segment_count: usize,
    /// Sum of segment lengths in seconds.
    pub segmented_time: f32,
    /// Segmented share of the media, from 0 to 1.
    pub coverage: f32,
    /// Seconds covered by careful speech recordings.
    pub careful_speech_time: f32,
    /// Seconds covered by oral translation recordings.
    pub oral_translation_time: f32,
    /// Whether the segments reach the end of the media.
    pub fully_segmented: bool,
    /// Text tier summaries.
    pub text_tiers: Vec<TextTierSummary>,
    /// Segment details (if requested).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub segments: Option<Vec<SegmentInfo>>,
}

/// Summary of one text tier.
#[derive(Debug, Serialize)]
pub struct TextTierSummary {
    /// Tier id.
    pub id: String,
    /// Tier kind.
    pub kind: &'static str,
    /// Number of segments with non-empty text.
    pub filled: usize,
}

/// One segment.
#[derive(Debug, Serialize)]
pub struct SegmentInfo {
    /// Segment position.
    pub index: usize,
    /// Start in seconds.
    pub start: f32,
    /// End in seconds.
    pub end: f32,
    /// Transcription text.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// Whether a careful speech recording exists.
    pub careful_speech: bool,
    /// Whether an oral translation recording exists.
    pub oral_translation: bool,
}

impl InspectResult {
    /// Summarizes a loaded annotation file.
    pub fn new(path: &Path, collection: &TierCollection, show_segments: bool) -> Self {
        let tier = collection.time_tier();
        let stats = tier.stats();

        let text_tiers = collection
            .text_tiers()
            .iter()
            .map(|t| TextTierSummary {
                id: t.id().to_string(),
                kind: match t.tier_type() {
                    TextTierType::Transcription => "transcription",
                    TextTierType::FreeTranslation => "free translation",
                    TextTierType::Other => "other",
                },
                filled: t.texts().iter().filter(|text| !text.is_empty()).count(),
            })
            .collect();

        let segments = show_segments.then(|| {
            tier.segments()
                .iter()
                .enumerate()
                .map(|(index, s)| SegmentInfo {
                    index,
                    start: s.start(),
                    end: s.end(),
                    text: s.text().map(str::to_string),
                    careful_speech: s.has_oral_annotation(OralAnnotationType::CarefulSpeech),
                    oral_translation: s.has_oral_annotation(OralAnnotationType::Translation),
                })
                .collect()
        });

        Self {
            path: path.display().to_string(),
            media_file: tier.media_file().display().to_string(),
            total_time: stats.total_time,
            segment_count: stats.segment_count,
            segmented_time: stats.segmented_time,
            coverage: stats.coverage(),
            careful_speech_time: stats.careful_speech_time.as_secs_f32(),
            oral_translation_time: stats.oral_translation_time.as_secs_f32(),
            fully_segmented: stats.fully_segmented,
            text_tiers,
            segments,
        }
    }
}

/// Runs the inspect command.
pub fn run(
    path: &Path,
    config: TierConfig,
    show_segments: bool,
    format: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let (_, collection) = load_session(path, config)?;
    let result = InspectResult::new(path, &collection, show_segments);

    // Output
    match format {
        "json" => {
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
        _ => {
            print_text_output(&result);
        }
    }

    Ok(())
}

fn print_text_output(result: &InspectResult) {
    println!("Annotation file: {}", result.path);
    println!("Media file: {}", result.media_file);
    println!();
    println!("Segments: {}", result.segment_count);
    println!(
        "Segmented: {:.3}s of {:.3}s ({:.1}%)",
        result.segmented_time,
        result.total_time,
        result.coverage * 100.0
    );
    println!("Fully segmented: {}", result.fully_segmented);
    println!("Careful speech: {:.3}s", result.careful_speech_time);
    println!("Oral translation: {:.3}s", result.oral_translation_time);

    println!();
    println!("Text tiers:");
    for tier in &result.text_tiers {
        println!(
            "  {} ({}): {}/{} filled",
            tier.id, tier.kind, tier.filled, result.segment_count
        );
    }

    if let Some(segments) = &result.segments {
        println!();
        println!("{:>5}  {:>10}  {:>10}  CS  OT  Text", "#", "Start", "End");
        for s in segments {
            println!(
                "{:>5}  {:>10.3}  {:>10.3}  {}  {}  {}",
                s.index,
                s.start,
                s.end,
                if s.careful_speech { "x " } else { "- " },
                if s.oral_translation { "x " } else { "- " },
                s.text.as_deref().unwrap_or("")
            );
        }
    }
}
