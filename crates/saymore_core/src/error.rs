//! Error types for SayMore core.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors that can occur in SayMore core operations.
///
/// Rejected boundary edits are not errors; they are reported through
/// [`crate::BoundaryModificationResult`].
#[derive(Debug, Error)]
pub enum CoreError {
    /// Segment file store error.
    #[error("storage error: {0}")]
    Storage(#[from] saymore_storage::StorageError),

    /// Annotation document error.
    #[error("annotation document error: {0}")]
    Eaf(#[from] saymore_eaf::EafError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// A caller broke an operation's precondition.
    #[error("invalid argument: {message}")]
    InvalidArgument {
        /// Description of the violated precondition.
        message: String,
    },

    /// The media file's duration could not be determined.
    #[error("cannot read duration of {path}: {message}")]
    MediaProbe {
        /// The media file.
        path: PathBuf,
        /// Description of the failure.
        message: String,
    },

    /// A list of boundaries does not describe contiguous segments.
    #[error("invalid boundaries: {message}")]
    InvalidBoundaries {
        /// Description of the problem.
        message: String,
    },

    /// An Audacity label file could not be used.
    #[error("label parse error: {message}")]
    LabelParse {
        /// Description of the problem.
        message: String,
    },
}

impl CoreError {
    /// Creates an invalid argument error.
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    /// Creates a media probe error.
    pub fn media_probe(path: impl Into<PathBuf>, message: impl std::fmt::Display) -> Self {
        Self::MediaProbe {
            path: path.into(),
            message: message.to_string(),
        }
    }

    /// Creates an invalid boundaries error.
    pub fn invalid_boundaries(message: impl Into<String>) -> Self {
        Self::InvalidBoundaries {
            message: message.into(),
        }
    }

    /// Creates a label parse error.
    pub fn label_parse(message: impl Into<String>) -> Self {
        Self::LabelParse {
            message: message.into(),
        }
    }
}
