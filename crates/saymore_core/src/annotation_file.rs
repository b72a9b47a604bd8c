//! Loading tiers from, and saving them to, an ELAN annotation file.
//!
//! SayMore keeps one annotation file per recording, named after the media
//! file (`Recording.wav.annotations.eaf`). The transcription tier's
//! time-aligned annotations define the segments; every tier that depends
//! on the transcription tier becomes a text tier.

use crate::config::TierConfig;
use crate::error::{CoreError, CoreResult};
use crate::import::{segments_from_time_strings, AudacityLabel};
use crate::media::MediaProbe;
use crate::text_tier::{TextTier, TextTierType};
use crate::tier_collection::TierCollection;
use crate::time_tier::TimeTier;
use crate::types::TimeRange;
use saymore_eaf::{AnnotationDocument, FREE_TRANSLATION_TIER_ID, TRANSCRIPTION_TIER_ID};
use saymore_storage::SegmentFileStore;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Path of the annotation file for `media_file`.
#[must_use]
pub fn annotation_file_path_for(media_file: &Path, config: &TierConfig) -> PathBuf {
    let mut path = media_file.as_os_str().to_os_string();
    path.push(&config.annotation_file_suffix);
    PathBuf::from(path)
}

/// An annotation file on disk and its parsed document.
#[derive(Debug, Clone)]
pub struct AnnotationFile {
    path: PathBuf,
    document: AnnotationDocument,
}

impl AnnotationFile {
    /// Reads the annotation file at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not an ELAN document.
    pub fn open(path: impl Into<PathBuf>) -> CoreResult<Self> {
        let path = path.into();
        let document = AnnotationDocument::load(&path)?;
        Ok(Self { path, document })
    }

    /// Reads the annotation file at `path` and builds its tiers.
    ///
    /// # Errors
    ///
    /// See [`AnnotationFile::open`] and [`AnnotationFile::tier_collection`].
    pub fn load(
        path: impl Into<PathBuf>,
        probe: &dyn MediaProbe,
        config: TierConfig,
        store: Arc<dyn SegmentFileStore>,
    ) -> CoreResult<(Self, TierCollection)> {
        let file = Self::open(path)?;
        let collection = file.tier_collection(probe, config, store)?;
        Ok((file, collection))
    }

    /// Path of the annotation file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The parsed document.
    #[must_use]
    pub fn document(&self) -> &AnnotationDocument {
        &self.document
    }

    /// The media file the document refers to.
    ///
    /// Falls back to the annotation file's own name without its suffix
    /// when the document has no media descriptor.
    #[must_use]
    pub fn media_file(&self, config: &TierConfig) -> PathBuf {
        let folder = self.path.parent().unwrap_or_else(|| Path::new(""));
        if let Some(media) = self.document.media_file_path(folder) {
            return media;
        }

        let path = self.path.to_string_lossy();
        match path.strip_suffix(config.annotation_file_suffix.as_str()) {
            Some(stem) => PathBuf::from(stem),
            None => self.path.with_extension(""),
        }
    }

    /// Ranges of the transcription annotations, with their ids and text.
    ///
    /// Annotations whose time slots are missing or unaligned are skipped.
    fn aligned_annotations(&self) -> Vec<(TimeRange, &str, &str)> {
        let doc = &self.document;
        doc.transcription_annotations()
            .into_iter()
            .filter_map(|a| {
                let start = doc.time_slot_seconds(&a.time_slot_ref1);
                let end = doc.time_slot_seconds(&a.time_slot_ref2);
                match (start, end) {
                    (Some(start), Some(end)) => {
                        Some((TimeRange::new(start, end), a.id.as_str(), a.value.as_str()))
                    }
                    _ => {
                        tracing::warn!(
                            annotation = %a.id,
                            file = %self.path.display(),
                            "skipping transcription annotation without aligned time slots"
                        );
                        None
                    }
                }
            })
            .collect()
    }

    /// Builds the time tier and text tiers described by the document.
    ///
    /// # Errors
    ///
    /// Returns an error if the media duration cannot be determined.
    pub fn tier_collection(
        &self,
        probe: &dyn MediaProbe,
        config: TierConfig,
        store: Arc<dyn SegmentFileStore>,
    ) -> CoreResult<TierCollection> {
        let media_file = self.media_file(&config);
        let total_time = probe.duration_seconds(&media_file)?;
        let annotations = self.aligned_annotations();

        let mut time_tier = TimeTier::new(media_file, total_time, store)
            .with_config(config)
            .with_segments(annotations.iter().map(|(range, _, _)| *range));
        time_tier.refresh_oral_annotation_flags();

        let mut collection = TierCollection::new(time_tier);
        for (index, (_, _, value)) in annotations.iter().enumerate() {
            collection.set_text(TRANSCRIPTION_TIER_ID, index, value)?;
        }

        for tier in self.document.dependent_tiers() {
            let values = self.document.dependent_annotations(&tier.id);
            let texts = annotations
                .iter()
                .map(|(_, id, _)| {
                    values
                        .get(id)
                        .map(|a| a.value.clone())
                        .unwrap_or_default()
                })
                .collect();
            let tier_type = if tier.id == FREE_TRANSLATION_TIER_ID {
                TextTierType::FreeTranslation
            } else {
                TextTierType::Other
            };
            collection.add_text_tier(TextTier::new(tier.id.clone(), tier_type).with_texts(texts))?;
        }
        // Documents from other tools may lack the free translation tier;
        // it is written on the next save.
        if collection.free_translation_tier().is_none() {
            collection.add_text_tier(TextTier::new(
                FREE_TRANSLATION_TIER_ID,
                TextTierType::FreeTranslation,
            ))?;
        }

        tracing::debug!(
            file = %self.path.display(),
            segments = collection.time_tier().len(),
            text_tiers = collection.text_tiers().len(),
            "loaded annotation file"
        );
        Ok(collection)
    }

    /// Writes the collection's segments and texts into the document and
    /// saves it.
    ///
    /// Time slots and the annotations of the transcription tier and of
    /// every text tier are rebuilt from scratch; everything else in the
    /// document is kept.
    ///
    /// # Errors
    ///
    /// Returns an error if a segment is empty or the file cannot be written.
    pub fn save(&mut self, collection: &TierCollection) -> CoreResult<()> {
        let mut doc = self.document.clone();
        let dependent: Vec<&TextTier> = collection
            .text_tiers()
            .iter()
            .filter(|t| t.tier_type() != TextTierType::Transcription)
            .collect();

        doc.remove_time_slots();
        doc.remove_tier_annotations(TRANSCRIPTION_TIER_ID);
        for tier in &dependent {
            doc.ensure_dependent_tier(tier.id());
            doc.remove_tier_annotations(tier.id());
        }
        doc.correct_last_used_annotation_id();

        let transcription = collection.transcription_tier();
        for (index, segment) in collection.time_tier().segments().iter().enumerate() {
            let text = transcription.and_then(|t| t.text(index));
            let id = doc.add_transcription_annotation(segment.start(), segment.end(), text)?;
            for tier in &dependent {
                if let Some(text) = tier.text(index).filter(|t| !t.is_empty()) {
                    doc.set_dependent_annotation_value(tier.id(), &id, Some(text))?;
                }
            }
        }

        doc.save(&self.path)?;
        self.document = doc;
        tracing::debug!(
            file = %self.path.display(),
            segments = collection.time_tier().len(),
            "saved annotation file"
        );
        Ok(())
    }

    /// Creates the annotation file for `media_file` with the given segments.
    ///
    /// # Errors
    ///
    /// Returns an error if a range is empty or the file cannot be written.
    pub fn create_from_segments(
        media_file: &Path,
        ranges: &[TimeRange],
        config: &TierConfig,
    ) -> CoreResult<Self> {
        let segments: Vec<(TimeRange, Option<&str>)> =
            ranges.iter().map(|range| (*range, None)).collect();
        Self::create(annotation_file_path_for(media_file, config), media_file, &segments)
    }

    /// Creates the annotation file for `media_file` from successive end
    /// boundaries.
    ///
    /// # Errors
    ///
    /// Returns an error if the boundaries are invalid or the file cannot be
    /// written.
    pub fn create_from_time_strings(
        media_file: &Path,
        boundaries: &[&str],
        config: &TierConfig,
    ) -> CoreResult<Self> {
        let ranges = segments_from_time_strings(boundaries)?;
        Self::create_from_segments(media_file, &ranges, config)
    }

    /// Creates the annotation file for `media_file` from Audacity labels,
    /// using label text as transcription.
    ///
    /// Labels that are still empty after fix-up are skipped.
    ///
    /// # Errors
    ///
    /// Returns an error if no label is usable or the file cannot be written.
    pub fn create_from_labels(
        media_file: &Path,
        labels: &[AudacityLabel],
        config: &TierConfig,
    ) -> CoreResult<Self> {
        Self::create_from_labels_at(annotation_file_path_for(media_file, config), media_file, labels)
    }

    /// Like [`AnnotationFile::create_from_labels`], writing to `path`
    /// instead of the default location next to the media file.
    ///
    /// # Errors
    ///
    /// Returns an error if no label is usable or the file cannot be written.
    pub fn create_from_labels_at(
        path: impl Into<PathBuf>,
        media_file: &Path,
        labels: &[AudacityLabel],
    ) -> CoreResult<Self> {
        let segments: Vec<(TimeRange, Option<&str>)> = labels
            .iter()
            .filter(|label| {
                let usable = label.stop > label.start;
                if !usable {
                    tracing::warn!(start = label.start, stop = label.stop, "skipping empty label");
                }
                usable
            })
            .map(|label| (label.range(), label.text.as_deref()))
            .collect();

        if segments.is_empty() {
            return Err(CoreError::label_parse("no label spans any time"));
        }
        Self::create(path.into(), media_file, &segments)
    }

    fn create(
        path: PathBuf,
        media_file: &Path,
        segments: &[(TimeRange, Option<&str>)],
    ) -> CoreResult<Self> {
        let media_name = media_file
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .ok_or_else(|| {
                CoreError::invalid_argument(format!(
                    "{} does not name a file",
                    media_file.display()
                ))
            })?;

        let mut document = AnnotationDocument::new_for_media(&media_name);
        for (range, text) in segments {
            document.add_transcription_annotation(range.start, range.end, *text)?;
        }

        document.save(&path)?;
        tracing::debug!(file = %path.display(), segments = segments.len(), "created annotation file");
        Ok(Self { path, document })
    }
}
