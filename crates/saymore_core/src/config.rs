//! Tier configuration.

/// Settings shared by a time tier and its segment files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TierConfig {
    /// Shortest segment a boundary edit may produce, in milliseconds.
    pub minimum_segment_length_ms: u32,

    /// Suffix of careful speech segment files.
    pub careful_speech_suffix: String,

    /// Suffix of oral translation segment files.
    pub oral_translation_suffix: String,

    /// Appended to the media file path to name the segment file folder.
    pub annotations_folder_suffix: String,

    /// Appended to the media file path to name the annotation document.
    pub annotation_file_suffix: String,
}

impl Default for TierConfig {
    fn default() -> Self {
        Self {
            minimum_segment_length_ms: 500,
            careful_speech_suffix: "_Careful.wav".to_string(),
            oral_translation_suffix: "_Translation.wav".to_string(),
            annotations_folder_suffix: "_Annotations".to_string(),
            annotation_file_suffix: ".annotations.eaf".to_string(),
        }
    }
}

impl TierConfig {
    /// Creates a configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the minimum segment length.
    #[must_use]
    pub const fn minimum_segment_length_ms(mut self, ms: u32) -> Self {
        self.minimum_segment_length_ms = ms;
        self
    }

    /// Sets the careful speech file suffix.
    #[must_use]
    pub fn careful_speech_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.careful_speech_suffix = suffix.into();
        self
    }

    /// Sets the oral translation file suffix.
    #[must_use]
    pub fn oral_translation_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.oral_translation_suffix = suffix.into();
        self
    }

    /// Sets the segment file folder suffix.
    #[must_use]
    pub fn annotations_folder_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.annotations_folder_suffix = suffix.into();
        self
    }

    /// Sets the annotation document suffix.
    #[must_use]
    pub fn annotation_file_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.annotation_file_suffix = suffix.into();
        self
    }

    /// Minimum segment length in seconds.
    #[must_use]
    pub fn minimum_segment_length(&self) -> f32 {
        self.minimum_segment_length_ms as f32 / 1000.0
    }

    /// Returns true if `[start, end)` is long enough to be a segment.
    #[must_use]
    pub fn is_acceptable_length(&self, start: f32, end: f32) -> bool {
        end - start >= self.minimum_segment_length()
    }
}
