//! The annotation document and its editing operations.

use crate::error::{EafError, EafResult};
use crate::mime::mime_type_for;
use crate::model::{
    parse_numeric_id, seconds_to_ms, AlignableAnnotation, Annotation, Declaration, Header,
    MediaDescriptor, Property, RefAnnotation, Tier, TimeSlot, FREE_TRANSLATION_TIER_ID,
    LAST_USED_ANNOTATION_ID_PROPERTY, TIME_UNITS_MILLISECONDS, TRANSCRIPTION_TIER_ID,
};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Linguistic type of the transcription tier.
const TRANSCRIPTION_TYPE: &str = "Transcription";
/// Linguistic type of the free translation tier.
const TRANSLATION_TYPE: &str = "Translation";

/// An ELAN annotation document held in memory.
///
/// Fields are public so callers can inspect everything that was read;
/// the methods implement the edits SayMore performs when it saves a
/// segmented recording.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnnotationDocument {
    /// Attributes of the `ANNOTATION_DOCUMENT` root element.
    pub attributes: Vec<(String, String)>,
    /// The `HEADER` element, if present.
    pub header: Option<Header>,
    /// `TIME_ORDER` slots in document order.
    pub time_slots: Vec<TimeSlot>,
    /// `TIER` elements in document order.
    pub tiers: Vec<Tier>,
    /// Trailing declarations (`LINGUISTIC_TYPE`, `LOCALE`, `CONSTRAINT`, ...).
    pub declarations: Vec<Declaration>,
}

impl AnnotationDocument {
    /// Creates an empty document with no header and no tiers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates the document SayMore writes for a freshly segmented recording.
    ///
    /// It has a header pointing at `media_file`, an empty time order, an
    /// empty transcription tier, an empty free translation tier and the
    /// linguistic type declarations ELAN needs to open it.
    #[must_use]
    pub fn new_for_media(media_file: &str) -> Self {
        let mut doc = Self {
            attributes: vec![
                ("AUTHOR".to_string(), String::new()),
                ("FORMAT".to_string(), "2.7".to_string()),
                ("VERSION".to_string(), "2.7".to_string()),
                (
                    "xmlns:xsi".to_string(),
                    "http://www.w3.org/2001/XMLSchema-instance".to_string(),
                ),
                (
                    "xsi:noNamespaceSchemaLocation".to_string(),
                    "http://www.mpi.nl/tools/elan/EAFv2.7.xsd".to_string(),
                ),
            ],
            header: None,
            time_slots: Vec::new(),
            tiers: vec![Tier::new(TRANSCRIPTION_TIER_ID, TRANSCRIPTION_TYPE, None)],
            declarations: vec![
                Declaration::new(
                    "LINGUISTIC_TYPE",
                    &[
                        ("GRAPHIC_REFERENCES", "false"),
                        ("LINGUISTIC_TYPE_ID", TRANSCRIPTION_TYPE),
                        ("TIME_ALIGNABLE", "true"),
                    ],
                ),
                Declaration::new("LOCALE", &[("COUNTRY_CODE", "US"), ("LANGUAGE_CODE", "en")]),
                Declaration::new(
                    "CONSTRAINT",
                    &[
                        (
                            "DESCRIPTION",
                            "1-1 association with a parent annotation",
                        ),
                        ("STEREOTYPE", "Symbolic_Association"),
                    ],
                ),
            ],
        };
        doc.set_media_file(media_file);
        doc.set_last_used_annotation_id_unchecked(0);
        doc.ensure_free_translation_tier();
        doc
    }

    /// Parses a document from XML text.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not well-formed XML or its root is
    /// not `ANNOTATION_DOCUMENT`.
    pub fn from_xml(xml: &str) -> EafResult<Self> {
        crate::reader::parse(xml)
    }

    /// Serializes the document to XML text.
    ///
    /// # Errors
    ///
    /// Returns an error if the XML writer fails.
    pub fn to_xml(&self) -> EafResult<String> {
        crate::writer::write(self)
    }

    /// Loads a document from a file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> EafResult<Self> {
        let xml = fs::read_to_string(path)?;
        Self::from_xml(&xml)
    }

    /// Writes the document to `path` atomically.
    ///
    /// The XML goes to a temporary sibling file first, which is then
    /// renamed over `path`, so a crash never leaves a truncated document.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or any file operation fails.
    pub fn save(&self, path: &Path) -> EafResult<()> {
        let xml = self.to_xml()?;
        let temp = temp_path_for(path);
        fs::write(&temp, xml.as_bytes())?;
        fs::rename(&temp, path)?;
        tracing::debug!(path = %path.display(), tiers = self.tiers.len(), "saved annotation document");
        Ok(())
    }

    /// Returns true if `path` names a readable ELAN document.
    #[must_use]
    pub fn is_elan_file(path: &Path) -> bool {
        Self::load(path).is_ok()
    }

    /// Points the document at a different media file and saves it in place.
    ///
    /// # Errors
    ///
    /// Returns an error if the document cannot be loaded or saved.
    pub fn change_media_file_name(path: &Path, media_file: &str) -> EafResult<()> {
        let mut doc = Self::load(path)?;
        doc.set_media_file(media_file);
        doc.save(path)
    }

    // ------------------------------------------------------------------
    // Header and media descriptor
    // ------------------------------------------------------------------

    /// Returns the header, creating it when missing.
    ///
    /// A created header has an empty `MEDIA_FILE`, millisecond time units
    /// and an empty media descriptor.
    pub fn header_mut(&mut self) -> &mut Header {
        self.header.get_or_insert_with(|| Header {
            media_file: Some(String::new()),
            time_units: Some(TIME_UNITS_MILLISECONDS.to_string()),
            media_descriptors: vec![MediaDescriptor::default()],
            properties: Vec::new(),
        })
    }

    /// Returns the `MEDIA_URL` of the first media descriptor.
    #[must_use]
    pub fn media_file_name(&self) -> Option<&str> {
        self.header
            .as_ref()?
            .media_descriptors
            .first()?
            .media_url
            .as_deref()
    }

    /// Resolves the media file against the folder holding the document.
    #[must_use]
    pub fn media_file_path(&self, annotation_folder: &Path) -> Option<PathBuf> {
        self.media_file_name().map(|name| annotation_folder.join(name))
    }

    /// Sets the media file, creating the header and descriptor as needed.
    ///
    /// Only the file name is stored; any folder part (with either kind of
    /// separator) is dropped.
    pub fn set_media_file(&mut self, media_file: &str) {
        let file_name = media_file
            .rsplit(['/', '\\'])
            .next()
            .unwrap_or(media_file)
            .to_string();
        let mime_type = mime_type_for(&file_name).map(str::to_string);

        let header = self.header_mut();
        if header.media_descriptors.is_empty() {
            header.media_descriptors.push(MediaDescriptor::default());
        }
        let descriptor = &mut header.media_descriptors[0];
        descriptor.media_url = Some(file_name);
        descriptor.mime_type = mime_type;
    }

    // ------------------------------------------------------------------
    // Annotation ids
    // ------------------------------------------------------------------

    /// Returns the stored last used annotation number, if any.
    #[must_use]
    pub fn last_used_annotation_id(&self) -> Option<u32> {
        self.header
            .as_ref()?
            .properties
            .iter()
            .find(|p| p.name.as_deref() == Some(LAST_USED_ANNOTATION_ID_PROPERTY))?
            .value
            .trim()
            .parse()
            .ok()
    }

    /// Returns the next annotation id (`a1`, `a2`, ...) and records it as used.
    pub fn next_annotation_id_and_increment(&mut self) -> String {
        let next = self.last_used_annotation_id().unwrap_or(0) + 1;
        self.set_last_used_annotation_id_unchecked(next);
        format!("a{next}")
    }

    /// Stores the last used annotation number.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` if `id` is zero.
    pub fn set_last_used_annotation_id(&mut self, id: u32) -> EafResult<()> {
        if id < 1 {
            return Err(EafError::invalid_argument(
                "last used annotation id must be at least 1",
            ));
        }
        self.set_last_used_annotation_id_unchecked(id);
        Ok(())
    }

    fn set_last_used_annotation_id_unchecked(&mut self, id: u32) {
        let properties = &mut self.header_mut().properties;
        let value = id.to_string();
        match properties
            .iter_mut()
            .find(|p| p.name.as_deref() == Some(LAST_USED_ANNOTATION_ID_PROPERTY))
        {
            Some(property) => property.value = value,
            None => properties.push(Property {
                name: Some(LAST_USED_ANNOTATION_ID_PROPERTY.to_string()),
                value,
            }),
        }
    }

    /// Resets the last used annotation number to the highest id in use.
    ///
    /// Documents edited in ELAN, or whose tiers were cleared, can carry a
    /// stale value; after this call the next id follows the highest one
    /// actually present.
    pub fn correct_last_used_annotation_id(&mut self) {
        let highest = self
            .tiers
            .iter()
            .flat_map(|t| t.annotations.iter())
            .filter_map(Annotation::numeric_id)
            .max()
            .unwrap_or(0);

        if self.last_used_annotation_id() != Some(highest) {
            self.set_last_used_annotation_id_unchecked(highest);
        }
    }

    // ------------------------------------------------------------------
    // Time slots
    // ------------------------------------------------------------------

    /// Returns every aligned time slot as `(id, seconds)` in document order.
    #[must_use]
    pub fn time_slot_values(&self) -> Vec<(&str, f32)> {
        self.time_slots
            .iter()
            .filter_map(|slot| slot.seconds().map(|s| (slot.id.as_str(), s)))
            .collect()
    }

    /// Returns the time of one slot in seconds.
    #[must_use]
    pub fn time_slot_seconds(&self, id: &str) -> Option<f32> {
        self.time_slots
            .iter()
            .find(|slot| slot.id == id)
            .and_then(TimeSlot::seconds)
    }

    /// Removes every time slot.
    pub fn remove_time_slots(&mut self) {
        self.time_slots.clear();
    }

    /// Appends a time slot and returns its new id.
    pub fn add_time_slot(&mut self, seconds: f32) -> String {
        let next = self
            .time_slots
            .iter()
            .filter_map(|slot| parse_numeric_id(&slot.id, "ts"))
            .max()
            .unwrap_or(0)
            + 1;
        let id = format!("ts{next}");
        self.time_slots.push(TimeSlot {
            id: id.clone(),
            value_ms: Some(seconds_to_ms(seconds)),
        });
        id
    }

    // ------------------------------------------------------------------
    // Tiers and annotations
    // ------------------------------------------------------------------

    /// Returns a tier by id.
    #[must_use]
    pub fn tier(&self, id: &str) -> Option<&Tier> {
        self.tiers.iter().find(|t| t.id == id)
    }

    /// Returns a tier by id, mutably.
    pub fn tier_mut(&mut self, id: &str) -> Option<&mut Tier> {
        self.tiers.iter_mut().find(|t| t.id == id)
    }

    /// Returns the transcription tier's annotations ordered by start time.
    ///
    /// Annotations whose start slot is missing or unaligned sort last.
    #[must_use]
    pub fn transcription_annotations(&self) -> Vec<&AlignableAnnotation> {
        let Some(tier) = self.tier(TRANSCRIPTION_TIER_ID) else {
            return Vec::new();
        };

        let slots: HashMap<&str, f32> = self.time_slot_values().into_iter().collect();
        let mut annotations: Vec<(&AlignableAnnotation, f32)> = tier
            .annotations
            .iter()
            .filter_map(|a| match a {
                Annotation::Alignable(a) => Some(a),
                Annotation::Reference(_) => None,
            })
            .map(|a| {
                let start = slots
                    .get(a.time_slot_ref1.as_str())
                    .copied()
                    .unwrap_or(f32::MAX);
                (a, start)
            })
            .collect();

        annotations.sort_by(|a, b| a.1.total_cmp(&b.1));
        annotations.into_iter().map(|(a, _)| a).collect()
    }

    /// Returns the ids of the transcription annotations, in time order.
    #[must_use]
    pub fn transcription_annotation_ids(&self) -> Vec<&str> {
        self.transcription_annotations()
            .into_iter()
            .map(|a| a.id.as_str())
            .collect()
    }

    /// Returns the tiers whose parent is the transcription tier.
    #[must_use]
    pub fn dependent_tiers(&self) -> Vec<&Tier> {
        self.tiers
            .iter()
            .filter(|t| t.is_dependent_on_transcription())
            .collect()
    }

    /// Adds an empty free translation tier (and its linguistic type) if the
    /// document has none.
    pub fn ensure_free_translation_tier(&mut self) {
        self.ensure_dependent_tier(FREE_TRANSLATION_TIER_ID);
    }

    /// Adds an empty tier depending on the transcription tier, with the
    /// symbolic association linguistic type, if no tier has `tier_id`.
    pub fn ensure_dependent_tier(&mut self, tier_id: &str) {
        if self.tier(tier_id).is_none() {
            self.tiers.push(Tier::new(
                tier_id,
                TRANSLATION_TYPE,
                Some(TRANSCRIPTION_TIER_ID),
            ));
        }

        let has_type = self.declarations.iter().any(|d| {
            d.name == "LINGUISTIC_TYPE" && d.attribute("LINGUISTIC_TYPE_ID") == Some(TRANSLATION_TYPE)
        });
        if !has_type {
            let insert_at = self
                .declarations
                .iter()
                .rposition(|d| d.name == "LINGUISTIC_TYPE")
                .map_or(0, |i| i + 1);
            self.declarations.insert(
                insert_at,
                Declaration::new(
                    "LINGUISTIC_TYPE",
                    &[
                        ("CONSTRAINTS", "Symbolic_Association"),
                        ("GRAPHIC_REFERENCES", "false"),
                        ("LINGUISTIC_TYPE_ID", TRANSLATION_TYPE),
                        ("TIME_ALIGNABLE", "false"),
                    ],
                ),
            );
        }
    }

    /// Returns a dependent tier's annotations keyed by parent annotation id.
    #[must_use]
    pub fn dependent_annotations(&self, tier_id: &str) -> HashMap<&str, &RefAnnotation> {
        let Some(tier) = self.tier(tier_id) else {
            return HashMap::new();
        };

        tier.annotations
            .iter()
            .filter_map(|a| match a {
                Annotation::Reference(r) => Some((r.annotation_ref.as_str(), r)),
                Annotation::Alignable(_) => None,
            })
            .collect()
    }

    /// Removes every annotation of a tier. Unknown tier ids are ignored.
    pub fn remove_tier_annotations(&mut self, tier_id: &str) {
        if let Some(tier) = self.tier_mut(tier_id) {
            tier.annotations.clear();
        }
    }

    /// Adds a time-aligned transcription annotation and returns its id.
    ///
    /// Two time slots are created for the boundaries. The transcription
    /// tier is created if the document lacks one.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` if `end` is not after `start`.
    pub fn add_transcription_annotation(
        &mut self,
        start: f32,
        end: f32,
        value: Option<&str>,
    ) -> EafResult<String> {
        if end <= start {
            return Err(EafError::invalid_argument(format!(
                "annotation end {end} is not after start {start}"
            )));
        }

        let ts1 = self.add_time_slot(start);
        let ts2 = self.add_time_slot(end);
        let id = self.next_annotation_id_and_increment();

        if self.tier(TRANSCRIPTION_TIER_ID).is_none() {
            self.tiers
                .insert(0, Tier::new(TRANSCRIPTION_TIER_ID, TRANSCRIPTION_TYPE, None));
        }
        if let Some(tier) = self.tier_mut(TRANSCRIPTION_TIER_ID) {
            tier.annotations
                .push(Annotation::Alignable(AlignableAnnotation {
                    id: id.clone(),
                    time_slot_ref1: ts1,
                    time_slot_ref2: ts2,
                    value: value.unwrap_or_default().to_string(),
                }));
        }

        Ok(id)
    }

    /// Sets the text of any annotation. `None` stores an empty string.
    ///
    /// # Errors
    ///
    /// Returns `AnnotationNotFound` if no annotation has `annotation_id`.
    pub fn set_annotation_value(
        &mut self,
        annotation_id: &str,
        value: Option<&str>,
    ) -> EafResult<()> {
        let annotation = self
            .tiers
            .iter_mut()
            .flat_map(|t| t.annotations.iter_mut())
            .find(|a| a.id() == annotation_id)
            .ok_or_else(|| EafError::AnnotationNotFound {
                annotation_id: annotation_id.to_string(),
            })?;
        annotation.set_value(value.unwrap_or_default());
        Ok(())
    }

    /// Sets the dependent annotation of `tier_id` that refers to
    /// `parent_id`, creating it when missing.
    ///
    /// # Errors
    ///
    /// Returns `TierNotFound` if the tier does not exist.
    pub fn set_dependent_annotation_value(
        &mut self,
        tier_id: &str,
        parent_id: &str,
        value: Option<&str>,
    ) -> EafResult<()> {
        if self.tier(tier_id).is_none() {
            return Err(EafError::tier_not_found(tier_id));
        }

        let value = value.unwrap_or_default().to_string();
        let existing = self.tier_mut(tier_id).and_then(|tier| {
            tier.annotations.iter_mut().find(|a| {
                matches!(a, Annotation::Reference(r) if r.annotation_ref == parent_id)
            })
        });
        if let Some(annotation) = existing {
            annotation.set_value(value);
            return Ok(());
        }

        let id = self.next_annotation_id_and_increment();
        if let Some(tier) = self.tier_mut(tier_id) {
            tier.annotations.push(Annotation::Reference(RefAnnotation {
                id,
                annotation_ref: parent_id.to_string(),
                value,
            }));
        }
        Ok(())
    }
}

fn temp_path_for(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}
