//! # SayMore Testkit
//!
//! Test utilities for SayMore.
//!
//! This crate provides:
//! - Session fixtures: a temporary folder with a real WAV recording
//! - In-memory tiers for fast boundary-edit tests
//! - A recording segment file observer for checking file operation order
//! - Property-based test generators using proptest
//!
//! ## Usage
//!
//! ```rust
//! use saymore_testkit::prelude::*;
//!
//! let (mut tier, _store) = memory_tier(10.0, &[(0.0, 2.0), (2.0, 5.0)], 1000);
//! assert!(tier.insert_segment_boundary(3.5).is_success());
//! assert_eq!(tier.len(), 3);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod fixtures;
pub mod generators;
pub mod observer;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::fixtures::*;
    pub use crate::generators::*;
    pub use crate::observer::*;
}

pub use fixtures::*;
pub use generators::*;
pub use observer::*;
