//! Test fixtures and session helpers.
//!
//! Provides in-memory tiers for boundary-edit tests and temporary session
//! folders holding a real WAV recording for file-level tests.

use saymore_core::{
    segment_file_name, AnnotationFile, OralAnnotationType, TierCollection, TierConfig, TimeRange,
    TimeTier, WavProbe,
};
use saymore_storage::{FsFileStore, InMemoryFileStore, SegmentFileStore};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;

/// Media file used by in-memory tiers.
pub const MEMORY_MEDIA_FILE: &str = "/session/Recording.wav";

/// Sample rate of fixture recordings.
pub const FIXTURE_SAMPLE_RATE: u32 = 8000;

/// Creates a tier over an in-memory store.
///
/// The store is returned too so tests can add segment files and inspect
/// what happened to them.
pub fn memory_tier(
    total_time: f32,
    ranges: &[(f32, f32)],
    minimum_segment_length_ms: u32,
) -> (TimeTier, Arc<InMemoryFileStore>) {
    let store = Arc::new(InMemoryFileStore::new());
    let tier = TimeTier::new(MEMORY_MEDIA_FILE, total_time, store.clone())
        .with_config(TierConfig::new().minimum_segment_length_ms(minimum_segment_length_ms))
        .with_segments(ranges.iter().map(|&(start, end)| TimeRange::new(start, end)));
    (tier, store)
}

/// Adds both annotation files for every segment of `tier` to `store`.
pub fn add_all_segment_files(store: &InMemoryFileStore, tier: &TimeTier) {
    for segment in tier.segments() {
        for kind in OralAnnotationType::ALL {
            store.insert(
                &tier.segment_file_path(kind, segment.range()),
                b"RIFF".to_vec(),
            );
        }
    }
}

/// Names of the files currently in `tier`'s segment folder.
pub fn segment_file_names(tier: &TimeTier) -> Vec<String> {
    tier.store()
        .list(tier.segment_file_folder())
        .expect("Failed to list segment folder")
        .iter()
        .filter_map(|p| p.file_name())
        .map(|n| n.to_string_lossy().into_owned())
        .collect()
}

/// Writes a silent mono WAV file of `duration` seconds.
pub fn write_silent_wav(path: &Path, duration: f32) {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate: FIXTURE_SAMPLE_RATE,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let samples = (f64::from(duration) * f64::from(FIXTURE_SAMPLE_RATE)).round() as u32;

    let mut writer = hound::WavWriter::create(path, spec).expect("Failed to create WAV file");
    for _ in 0..samples {
        writer.write_sample(0i16).expect("Failed to write sample");
    }
    writer.finalize().expect("Failed to finalize WAV file");
}

/// A temporary session folder holding one recording.
pub struct TestSession {
    media_file: PathBuf,
    config: TierConfig,
    /// The temporary directory (kept alive to prevent cleanup).
    _temp_dir: TempDir,
}

impl TestSession {
    /// Creates a session with a silent recording of `duration` seconds.
    pub fn new(duration: f32) -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let media_file = temp_dir.path().join("Recording.wav");
        write_silent_wav(&media_file, duration);
        Self {
            media_file,
            config: TierConfig::default(),
            _temp_dir: temp_dir,
        }
    }

    /// Sets the configuration used by tiers and annotation files.
    #[must_use]
    pub fn with_config(mut self, config: TierConfig) -> Self {
        self.config = config;
        self
    }

    /// The recording.
    pub fn media_file(&self) -> &Path {
        &self.media_file
    }

    /// The session folder.
    pub fn folder(&self) -> &Path {
        self._temp_dir.path()
    }

    /// The configuration.
    pub fn config(&self) -> &TierConfig {
        &self.config
    }

    /// Folder for the recording's segment files.
    pub fn segment_folder(&self) -> PathBuf {
        let mut folder = self.media_file.as_os_str().to_os_string();
        folder.push(&self.config.annotations_folder_suffix);
        PathBuf::from(folder)
    }

    /// Writes an annotation file of `kind` for `range` and returns its path.
    pub fn write_segment_file(&self, kind: OralAnnotationType, range: TimeRange) -> PathBuf {
        let folder = self.segment_folder();
        std::fs::create_dir_all(&folder).expect("Failed to create segment folder");
        let path = folder.join(segment_file_name(kind, range.start, range.end, &self.config));
        write_silent_wav(&path, range.length());
        path
    }

    /// Creates a tier over the recording, backed by the file system.
    pub fn tier(&self, ranges: &[(f32, f32)]) -> TimeTier {
        let store: Arc<dyn SegmentFileStore> = Arc::new(FsFileStore::new());
        let mut tier = TimeTier::probe(&self.media_file, &WavProbe, store)
            .expect("Failed to probe fixture recording")
            .with_config(self.config.clone())
            .with_segments(ranges.iter().map(|&(start, end)| TimeRange::new(start, end)));
        tier.refresh_oral_annotation_flags();
        tier
    }

    /// Creates the recording's annotation file from end boundaries.
    pub fn create_annotation_file(&self, boundaries: &[&str]) -> AnnotationFile {
        AnnotationFile::create_from_time_strings(&self.media_file, boundaries, &self.config)
            .expect("Failed to create annotation file")
    }

    /// Loads the recording's annotation file.
    pub fn load(&self) -> (AnnotationFile, TierCollection) {
        AnnotationFile::load(
            saymore_core::annotation_file_path_for(&self.media_file, &self.config),
            &WavProbe,
            self.config.clone(),
            Arc::new(FsFileStore::new()),
        )
        .expect("Failed to load annotation file")
    }
}
