//! Building segments from boundary lists and Audacity label files.

use crate::error::{CoreError, CoreResult};
use crate::media::MediaProbe;
use crate::types::TimeRange;
use std::fs;
use std::path::Path;

/// Turns successive end boundaries into contiguous ranges starting at 0.
///
/// ```
/// use saymore_core::{segments_from_time_strings, TimeRange};
///
/// let ranges = segments_from_time_strings(&["1.5", "3"]).unwrap();
/// assert_eq!(ranges, vec![TimeRange::new(0.0, 1.5), TimeRange::new(1.5, 3.0)]);
/// ```
///
/// # Errors
///
/// Returns `InvalidBoundaries` if a value does not parse or does not
/// increase.
pub fn segments_from_time_strings(boundaries: &[&str]) -> CoreResult<Vec<TimeRange>> {
    let mut start = 0.0_f32;
    let mut ranges = Vec::with_capacity(boundaries.len());

    for raw in boundaries {
        let end: f32 = raw.trim().parse().map_err(|_| {
            CoreError::invalid_boundaries(format!("{raw:?} is not a time in seconds"))
        })?;
        if end <= start {
            return Err(CoreError::invalid_boundaries(format!(
                "boundary {end} does not follow {start}"
            )));
        }
        ranges.push(TimeRange::new(start, end));
        start = end;
    }

    Ok(ranges)
}

/// One label from an Audacity label track export.
#[derive(Debug, Clone, PartialEq)]
pub struct AudacityLabel {
    /// Label start in seconds.
    pub start: f32,
    /// Label end in seconds.
    pub stop: f32,
    /// Label text, if the line had one.
    pub text: Option<String>,
}

impl AudacityLabel {
    /// The label's span.
    #[must_use]
    pub fn range(&self) -> TimeRange {
        TimeRange::new(self.start, self.stop)
    }
}

/// Parses the text of an Audacity label file.
///
/// Lines are tab separated `start`, `stop` and optional text. Lines with
/// fewer than two fields or unparsable times are skipped. Point labels
/// (`stop <= start`) end where the next label starts; a final point label
/// ends at `media_duration` when it is known. If the first label does not
/// start at 0, an implicit label covering `[0, first start)` is added.
#[must_use]
pub fn parse_audacity_labels(contents: &str, media_duration: Option<f32>) -> Vec<AudacityLabel> {
    let mut labels: Vec<AudacityLabel> = contents
        .lines()
        .map(|line| line.split('\t').collect::<Vec<_>>())
        .filter(|fields| fields.len() >= 2)
        .filter_map(|fields| {
            let start = fields[0].trim().parse().ok()?;
            let stop = fields[1].trim().parse().ok()?;
            Some(AudacityLabel {
                start,
                stop,
                text: fields.get(2).map(|t| (*t).to_string()),
            })
        })
        .collect();

    for i in 0..labels.len() {
        if labels[i].stop > labels[i].start {
            continue;
        }
        if let Some(next_start) = labels.get(i + 1).map(|l| l.start) {
            labels[i].stop = next_start;
        } else if let Some(duration) = media_duration {
            labels[i].stop = duration;
        }
    }

    if let Some(first_start) = labels.first().map(|l| l.start) {
        if first_start > 0.0 {
            labels.insert(
                0,
                AudacityLabel {
                    start: 0.0,
                    stop: first_start,
                    text: None,
                },
            );
        }
    }

    labels
}

/// Reads an Audacity label file, using `probe` on `media_file` to end a
/// trailing point label.
///
/// # Errors
///
/// Returns an error if the label file cannot be read or the media
/// duration cannot be determined.
pub fn read_audacity_labels(
    path: &Path,
    media_file: Option<&Path>,
    probe: &dyn MediaProbe,
) -> CoreResult<Vec<AudacityLabel>> {
    let contents = fs::read_to_string(path)?;
    let duration = media_file
        .map(|media| probe.duration_seconds(media))
        .transpose()?;
    let labels = parse_audacity_labels(&contents, duration);
    if labels.is_empty() {
        return Err(CoreError::label_parse(format!(
            "{} contains no labels",
            path.display()
        )));
    }
    tracing::debug!(path = %path.display(), labels = labels.len(), "read Audacity labels");
    Ok(labels)
}
