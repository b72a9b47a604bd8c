//! CLI command implementations.

pub mod import_labels;
pub mod inspect;
pub mod verify;

use saymore_core::{AnnotationFile, CoreResult, MediaProbe, TierCollection, TierConfig, WavProbe};
use saymore_storage::FsFileStore;
use std::path::Path;
use std::sync::Arc;

/// Reads WAV durations, falling back to a known duration for media it
/// cannot read (missing files, compressed formats).
struct WavOrFallback {
    fallback: f32,
}

impl MediaProbe for WavOrFallback {
    fn duration_seconds(&self, path: &Path) -> CoreResult<f32> {
        match WavProbe.duration_seconds(path) {
            Ok(duration) => Ok(duration),
            Err(err) => {
                tracing::warn!(
                    media = %path.display(),
                    error = %err,
                    fallback = self.fallback,
                    "using the last time slot as media duration"
                );
                Ok(self.fallback)
            }
        }
    }
}

/// Opens an annotation file and builds its tiers over the file system.
pub fn load_session(
    path: &Path,
    config: TierConfig,
) -> Result<(AnnotationFile, TierCollection), Box<dyn std::error::Error>> {
    let file = AnnotationFile::open(path)?;
    let fallback = file
        .document()
        .time_slot_values()
        .into_iter()
        .map(|(_, seconds)| seconds)
        .fold(0.0_f32, f32::max);

    let probe = WavOrFallback { fallback };
    let collection = file.tier_collection(&probe, config, Arc::new(FsFileStore::new()))?;
    Ok((file, collection))
}
