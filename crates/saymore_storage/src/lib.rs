//! # SayMore Storage
//!
//! File store abstraction for oral annotation segment files.
//!
//! Every careful-speech and oral-translation recording lives in a folder
//! next to the media file it annotates. The transcription core never
//! touches `std::fs` directly for those files: it goes through a
//! [`SegmentFileStore`], which keeps the segment model testable and lets
//! tests inject failures such as a file held open by a media player.
//!
//! ## Design Principles
//!
//! - Stores only know paths, not segments or boundaries
//! - Every operation reports failure as a [`StorageError`]
//! - Must be `Send + Sync` so a store can be shared between tiers
//!
//! ## Available Stores
//!
//! - [`FsFileStore`] - The operating system file system
//! - [`InMemoryFileStore`] - For testing, with per-path fault injection
//!
//! ## Example
//!
//! ```rust
//! use saymore_storage::{InMemoryFileStore, SegmentFileStore};
//! use std::path::Path;
//!
//! let store = InMemoryFileStore::new();
//! store.insert(Path::new("a.wav_Annotations/1_to_2_Careful.wav"), b"RIFF".to_vec());
//! store
//!     .rename(
//!         Path::new("a.wav_Annotations/1_to_2_Careful.wav"),
//!         Path::new("a.wav_Annotations/1_to_3_Careful.wav"),
//!     )
//!     .unwrap();
//! assert!(store.exists(Path::new("a.wav_Annotations/1_to_3_Careful.wav")));
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod error;
mod fs;
mod memory;
mod store;

pub use error::{StorageError, StorageResult};
pub use fs::FsFileStore;
pub use memory::InMemoryFileStore;
pub use store::SegmentFileStore;
