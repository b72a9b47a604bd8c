//! Media duration probing.

use crate::error::{CoreError, CoreResult};
use std::path::Path;

/// Determines the playing time of a media file.
pub trait MediaProbe: Send + Sync {
    /// Returns the duration of the media at `path`, in seconds.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened or understood.
    fn duration_seconds(&self, path: &Path) -> CoreResult<f32>;
}

/// Reads durations from WAV headers.
#[derive(Debug, Clone, Copy, Default)]
pub struct WavProbe;

impl MediaProbe for WavProbe {
    #[allow(clippy::cast_precision_loss)]
    fn duration_seconds(&self, path: &Path) -> CoreResult<f32> {
        let reader = hound::WavReader::open(path).map_err(|e| CoreError::media_probe(path, e))?;
        let sample_rate = reader.spec().sample_rate;
        if sample_rate == 0 {
            return Err(CoreError::media_probe(path, "sample rate is zero"));
        }
        Ok((f64::from(reader.duration()) / f64::from(sample_rate)) as f32)
    }
}

/// Reports the same duration for every file.
///
/// Useful for media whose duration is known from elsewhere, and in tests.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedDuration(pub f32);

impl MediaProbe for FixedDuration {
    fn duration_seconds(&self, _path: &Path) -> CoreResult<f32> {
        Ok(self.0)
    }
}
