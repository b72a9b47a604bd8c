//! Import-labels command implementation.

use saymore_core::{read_audacity_labels, AnnotationFile, CoreError, TierConfig, WavProbe};
use std::path::Path;

/// Runs the import-labels command.
pub fn run(
    labels: &Path,
    media: &Path,
    output: Option<&Path>,
    config: &TierConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    let parsed = match read_audacity_labels(labels, Some(media), &WavProbe) {
        Ok(parsed) => parsed,
        // Without a duration a trailing point label stays empty and is skipped.
        Err(CoreError::MediaProbe { message, .. }) => {
            tracing::warn!(media = %media.display(), error = %message, "media duration unknown");
            read_audacity_labels(labels, None, &WavProbe)?
        }
        Err(err) => return Err(err.into()),
    };

    let file = match output {
        Some(path) => AnnotationFile::create_from_labels_at(path, media, &parsed)?,
        None => AnnotationFile::create_from_labels(media, &parsed, config)?,
    };

    println!(
        "Wrote {} segments to {}",
        file.document().transcription_annotation_ids().len(),
        file.path().display()
    );
    Ok(())
}
