//! # treecache testkit
//!
//! Test utilities for treecache.
//!
//! This crate provides:
//! - Fixture record types and cache helpers
//! - Property-based test generators using proptest
//! - A patch harness that checks change records against the cache
//! - Patch semantics test vectors
//!
//! ## Usage
//!
//! ```
//! use treecache_testkit::prelude::*;
//!
//! with_dinosaurs(|cache| {
//!     let records = apply(cache, "dinosaurs/trex/dims/height", "5.2").unwrap();
//!     assert_eq!(records[0].key(), "trex");
//! });
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod fixtures;
pub mod generators;
pub mod integration;
pub mod vectors;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::fixtures::*;
    pub use crate::generators::*;
    pub use crate::integration::*;
    pub use crate::vectors::*;
}

pub use fixtures::*;
pub use generators::*;
pub use integration::*;
pub use vectors::*;
