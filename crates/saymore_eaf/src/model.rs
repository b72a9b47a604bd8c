//! Element types of an ELAN annotation document.

/// Id of the time-aligned transcription tier.
pub const TRANSCRIPTION_TIER_ID: &str = "Transcription";

/// Id of the free translation tier that depends on the transcription tier.
pub const FREE_TRANSLATION_TIER_ID: &str = "Phrase Free Translation";

/// Header property holding the numeric part of the last used annotation id.
pub const LAST_USED_ANNOTATION_ID_PROPERTY: &str = "lastUsedAnnotationId";

/// The only `TIME_UNITS` value SayMore writes.
pub const TIME_UNITS_MILLISECONDS: &str = "milliseconds";

/// Converts seconds to the millisecond count stored in `TIME_VALUE`.
///
/// Negative inputs clamp to zero.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn seconds_to_ms(seconds: f32) -> u64 {
    (f64::from(seconds) * 1000.0).round().max(0.0) as u64
}

/// Converts a `TIME_VALUE` millisecond count to seconds.
///
/// The division happens in `f32`, so `ms_to_seconds(2121)` is the same
/// value as `"2.121".parse::<f32>()`.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn ms_to_seconds(ms: u64) -> f32 {
    ms as f32 / 1000.0
}

/// The `HEADER` element.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Header {
    /// `MEDIA_FILE` attribute (ELAN leaves it empty).
    pub media_file: Option<String>,
    /// `TIME_UNITS` attribute.
    pub time_units: Option<String>,
    /// `MEDIA_DESCRIPTOR` children; SayMore only uses the first.
    pub media_descriptors: Vec<MediaDescriptor>,
    /// `PROPERTY` children.
    pub properties: Vec<Property>,
}

/// A `MEDIA_DESCRIPTOR` element.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MediaDescriptor {
    /// `MEDIA_URL`, the media file name relative to the document.
    pub media_url: Option<String>,
    /// `MIME_TYPE`.
    pub mime_type: Option<String>,
    /// Any other attributes, preserved on save.
    pub attributes: Vec<(String, String)>,
}

/// A header `PROPERTY` element.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Property {
    /// `NAME` attribute.
    pub name: Option<String>,
    /// Text content.
    pub value: String,
}

/// A `TIME_SLOT` element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeSlot {
    /// `TIME_SLOT_ID`, e.g. `ts3`.
    pub id: String,
    /// `TIME_VALUE` in milliseconds; unaligned slots have none.
    pub value_ms: Option<u64>,
}

impl TimeSlot {
    /// Returns the slot's time in seconds, if aligned.
    #[must_use]
    pub fn seconds(&self) -> Option<f32> {
        self.value_ms.map(ms_to_seconds)
    }
}

/// An annotation anchored to two time slots.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AlignableAnnotation {
    /// `ANNOTATION_ID`.
    pub id: String,
    /// `TIME_SLOT_REF1`.
    pub time_slot_ref1: String,
    /// `TIME_SLOT_REF2`.
    pub time_slot_ref2: String,
    /// `ANNOTATION_VALUE` text.
    pub value: String,
}

/// An annotation that refers to an annotation on the parent tier.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RefAnnotation {
    /// `ANNOTATION_ID`.
    pub id: String,
    /// `ANNOTATION_REF`, the parent annotation's id.
    pub annotation_ref: String,
    /// `ANNOTATION_VALUE` text.
    pub value: String,
}

/// One `ANNOTATION` element of a tier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Annotation {
    /// `ALIGNABLE_ANNOTATION`.
    Alignable(AlignableAnnotation),
    /// `REF_ANNOTATION`.
    Reference(RefAnnotation),
}

impl Annotation {
    /// Returns the annotation id.
    #[must_use]
    pub fn id(&self) -> &str {
        match self {
            Self::Alignable(a) => &a.id,
            Self::Reference(r) => &r.id,
        }
    }

    /// Returns the annotation text.
    #[must_use]
    pub fn value(&self) -> &str {
        match self {
            Self::Alignable(a) => &a.value,
            Self::Reference(r) => &r.value,
        }
    }

    /// Replaces the annotation text.
    pub fn set_value(&mut self, value: impl Into<String>) {
        match self {
            Self::Alignable(a) => a.value = value.into(),
            Self::Reference(r) => r.value = value.into(),
        }
    }

    /// Returns the numeric part of an `a<N>` id.
    #[must_use]
    pub fn numeric_id(&self) -> Option<u32> {
        parse_numeric_id(self.id(), "a")
    }
}

/// A `TIER` element.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tier {
    /// `TIER_ID`.
    pub id: String,
    /// `LINGUISTIC_TYPE_REF`.
    pub linguistic_type_ref: String,
    /// `PARENT_REF`, set on dependent tiers.
    pub parent_ref: Option<String>,
    /// Other attributes (`DEFAULT_LOCALE`, `PARTICIPANT`, ...), preserved on save.
    pub attributes: Vec<(String, String)>,
    /// The tier's annotations, in document order.
    pub annotations: Vec<Annotation>,
}

impl Tier {
    /// Creates an empty tier.
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        linguistic_type_ref: impl Into<String>,
        parent_ref: Option<&str>,
    ) -> Self {
        Self {
            id: id.into(),
            linguistic_type_ref: linguistic_type_ref.into(),
            parent_ref: parent_ref.map(str::to_string),
            attributes: vec![("DEFAULT_LOCALE".to_string(), "en".to_string())],
            annotations: Vec::new(),
        }
    }

    /// Returns true if this tier hangs off the transcription tier.
    #[must_use]
    pub fn is_dependent_on_transcription(&self) -> bool {
        self.parent_ref.as_deref() == Some(TRANSCRIPTION_TIER_ID)
    }
}

/// A childless top-level declaration such as `LINGUISTIC_TYPE`, `LOCALE`
/// or `CONSTRAINT`, kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    /// Element name.
    pub name: String,
    /// Attributes in document order.
    pub attributes: Vec<(String, String)>,
}

impl Declaration {
    /// Creates a declaration from string pairs.
    #[must_use]
    pub fn new(name: &str, attributes: &[(&str, &str)]) -> Self {
        Self {
            name: name.to_string(),
            attributes: attributes
                .iter()
                .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
                .collect(),
        }
    }

    /// Returns an attribute value.
    #[must_use]
    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

pub(crate) fn parse_numeric_id(id: &str, prefix: &str) -> Option<u32> {
    id.strip_prefix(prefix)?.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn whole_milliseconds_survive_the_f32_trip(ms in 0u64..4_000_000) {
            prop_assert_eq!(seconds_to_ms(ms_to_seconds(ms)), ms);
        }
    }

    #[test]
    fn millisecond_conversion_is_exact_for_ms_precision() {
        for text in ["0", "0.75", "1.25", "2.121", "33.5", "3599.999"] {
            let seconds: f32 = text.parse().unwrap();
            assert_eq!(ms_to_seconds(seconds_to_ms(seconds)), seconds, "{text}");
        }
    }

    #[test]
    fn negative_seconds_clamp_to_zero() {
        assert_eq!(seconds_to_ms(-1.0), 0);
    }

    #[test]
    fn numeric_id() {
        assert_eq!(parse_numeric_id("a12", "a"), Some(12));
        assert_eq!(parse_numeric_id("ts3", "ts"), Some(3));
        assert_eq!(parse_numeric_id("x12", "a"), None);
        assert_eq!(parse_numeric_id("a", "a"), None);
    }
}
