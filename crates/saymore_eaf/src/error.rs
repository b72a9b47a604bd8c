//! Error types for the EAF crate.

use std::io;
use thiserror::Error;

/// Result type for annotation document operations.
pub type EafResult<T> = Result<T, EafError>;

/// Errors that can occur while reading, writing or editing a document.
#[derive(Debug, Error)]
pub enum EafError {
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The XML is not well formed.
    #[error("malformed XML at byte {position}: {message}")]
    Xml {
        /// Byte offset in the input.
        position: usize,
        /// Parser message.
        message: String,
    },

    /// Serializing the document failed.
    #[error("failed to write XML: {message}")]
    Write {
        /// Writer message.
        message: String,
    },

    /// The XML is well formed but is not an ELAN document.
    #[error("invalid annotation document: {message}")]
    InvalidStructure {
        /// Description of the problem.
        message: String,
    },

    /// A `TIME_VALUE` attribute is not a millisecond count.
    #[error("time slot {slot_id} has invalid value {value:?}")]
    InvalidTimeValue {
        /// The offending slot.
        slot_id: String,
        /// The raw attribute value.
        value: String,
    },

    /// An argument is out of range.
    #[error("invalid argument: {message}")]
    InvalidArgument {
        /// Description of the problem.
        message: String,
    },

    /// No tier has the requested id.
    #[error("tier not found: {tier_id}")]
    TierNotFound {
        /// The requested tier id.
        tier_id: String,
    },

    /// No annotation has the requested id.
    #[error("annotation not found: {annotation_id}")]
    AnnotationNotFound {
        /// The requested annotation id.
        annotation_id: String,
    },
}

impl EafError {
    /// Creates an XML parse error.
    pub fn xml(position: usize, message: impl std::fmt::Display) -> Self {
        Self::Xml {
            position,
            message: message.to_string(),
        }
    }

    /// Creates an XML write error.
    pub fn write(message: impl std::fmt::Display) -> Self {
        Self::Write {
            message: message.to_string(),
        }
    }

    /// Creates an invalid structure error.
    pub fn invalid_structure(message: impl Into<String>) -> Self {
        Self::InvalidStructure {
            message: message.into(),
        }
    }

    /// Creates an invalid argument error.
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    /// Creates a tier not found error.
    pub fn tier_not_found(tier_id: impl Into<String>) -> Self {
        Self::TierNotFound {
            tier_id: tier_id.into(),
        }
    }
}
