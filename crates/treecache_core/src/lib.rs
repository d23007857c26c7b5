//! # treecache core
//!
//! An incremental merge cache mirroring a remote, path-addressed tree store.
//!
//! A live update feed delivers patches: a `/`-separated path and a raw
//! payload. The cache keeps a typed, insertion-ordered map of top-level
//! entities and applies each patch to it:
//!
//! - [`PathResolver`] splits the path, dropping the subscription base path
//! - [`bind`] and [`Location`] walk the segments through the value graph,
//!   creating missing containers with their defaults
//! - [`MergeEngine`] deletes, replaces or merges depending on the
//!   [`NodeKind`] of the addressed slot
//! - [`Changes`] reports the top-level entities the patch touched
//!
//! Cacheable types implement [`NodeType`]. Strings, [`Binary`], numbers,
//! vectors, string-keyed maps and [`Document`] come with implementations;
//! structs opt in with [`record!`].
//!
//! ## Usage
//!
//! ```
//! use serde::{Deserialize, Serialize};
//! use treecache_core::{record, CacheConfig, TreeCache};
//!
//! #[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
//! #[serde(default)]
//! struct Dino {
//!     #[serde(rename = "Height")]
//!     height: f64,
//! }
//!
//! record!(Dino { height });
//!
//! let mut cache = TreeCache::<Dino>::with_config(CacheConfig::new().base_path("dinosaurs"));
//!
//! let changes: Vec<_> = cache
//!     .apply_patch("dinosaurs/trex", r#"{"Height":5.2}"#)
//!     .unwrap()
//!     .collect();
//! assert_eq!(changes[0].key(), "trex");
//! assert_eq!(changes[0].value(), Some(&Dino { height: 5.2 }));
//! assert!(cache.contains("trex"));
//!
//! let changes: Vec<_> = cache.apply_patch("dinosaurs/trex", "").unwrap().collect();
//! assert!(changes[0].is_removal());
//! assert!(!cache.contains("trex"));
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod binder;
mod cache;
mod change;
mod config;
mod error;
mod merge;
mod path;
mod schema;
mod shared;

pub use binder::{bind, Location};
pub use cache::TreeCache;
pub use change::{ChangeRecord, Changes};
pub use config::CacheConfig;
pub use error::{CacheError, CacheResult, ResolveError, ResolveResult};
pub use merge::{merge_into, MergeEngine};
pub use path::{PatchPath, PathResolver};
pub use schema::{replace_with, FieldSchema, Node, NodeKind, NodeType, Record, StructSchema};
pub use shared::SharedCache;

pub use treecache_codec::{Binary, CodecError, CodecResult, Document, JsonCodec, PayloadCodec};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
