//! # SayMore EAF
//!
//! In-memory model and XML codec for ELAN annotation documents (`.eaf`).
//!
//! SayMore stores each recording's transcription in an ELAN document:
//!
//! ```text
//! ANNOTATION_DOCUMENT
//! ├─ HEADER            MEDIA_DESCRIPTOR (MEDIA_URL, MIME_TYPE), PROPERTY lastUsedAnnotationId
//! ├─ TIME_ORDER        TIME_SLOT id -> milliseconds
//! ├─ TIER Transcription              ALIGNABLE_ANNOTATION (TIME_SLOT_REF1, TIME_SLOT_REF2)
//! ├─ TIER Phrase Free Translation    REF_ANNOTATION (ANNOTATION_REF -> transcription id)
//! ├─ TIER <user defined> ...         REF_ANNOTATION
//! └─ LINGUISTIC_TYPE / LOCALE / CONSTRAINT declarations
//! ```
//!
//! Time values are integer milliseconds on disk and `f32` seconds in memory.
//!
//! ## Usage
//!
//! ```
//! use saymore_eaf::AnnotationDocument;
//!
//! let mut doc = AnnotationDocument::new_for_media("Recording.wav");
//! let id = doc.add_transcription_annotation(0.0, 2.5, Some("hello")).unwrap();
//!
//! let xml = doc.to_xml().unwrap();
//! let reloaded = AnnotationDocument::from_xml(&xml).unwrap();
//! assert_eq!(reloaded.transcription_annotation_ids(), vec![id.as_str()]);
//! assert_eq!(reloaded.media_file_name(), Some("Recording.wav"));
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod document;
mod error;
mod mime;
mod model;
mod reader;
mod writer;

pub use document::AnnotationDocument;
pub use error::{EafError, EafResult};
pub use mime::mime_type_for;
pub use model::{
    ms_to_seconds, seconds_to_ms, AlignableAnnotation, Annotation, Declaration, Header,
    MediaDescriptor, Property, RefAnnotation, Tier, TimeSlot, FREE_TRANSLATION_TIER_ID,
    LAST_USED_ANNOTATION_ID_PROPERTY, TIME_UNITS_MILLISECONDS, TRANSCRIPTION_TIER_ID,
};
