//! Error types for treecache core.

use crate::path::PatchPath;
use crate::schema::NodeKind;
use thiserror::Error;
use treecache_codec::CodecError;

/// Result type for navigation inside a node graph.
pub type ResolveResult<T> = Result<T, ResolveError>;

/// Result type for cache operations.
pub type CacheResult<T> = Result<T, CacheError>;

/// Reasons a path segment cannot be bound to a slot.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ResolveError {
    /// No field name or alias of a structured node matches the segment.
    #[error("`{type_name}` has no field matching `{segment}`")]
    UnknownField {
        /// Name of the structured type.
        type_name: &'static str,
        /// The unmatched segment.
        segment: String,
    },

    /// The node is a leaf and has no children.
    #[error("cannot descend into {kind} node with `{segment}`")]
    NotNavigable {
        /// Shape of the node.
        kind: NodeKind,
        /// The segment that was requested.
        segment: String,
    },

    /// Segment addressing a sequence is not an index.
    #[error("`{segment}` is not a sequence index")]
    InvalidIndex {
        /// The offending segment.
        segment: String,
    },

    /// Index is past the end of the sequence (appending is allowed).
    #[error("index {index} is out of range for sequence of length {len}")]
    IndexOutOfRange {
        /// Requested index.
        index: usize,
        /// Current sequence length.
        len: usize,
    },
}

impl ResolveError {
    /// Creates an unknown field error.
    pub fn unknown_field(type_name: &'static str, segment: impl Into<String>) -> Self {
        Self::UnknownField {
            type_name,
            segment: segment.into(),
        }
    }

    /// Creates a not navigable error.
    pub fn not_navigable(kind: NodeKind, segment: impl Into<String>) -> Self {
        Self::NotNavigable {
            kind,
            segment: segment.into(),
        }
    }

    /// Creates an invalid index error.
    pub fn invalid_index(segment: impl Into<String>) -> Self {
        Self::InvalidIndex {
            segment: segment.into(),
        }
    }
}

/// Errors reported by a patch application.
///
/// A failed patch leaves the cache exactly as it was before the call.
#[derive(Debug, Error)]
pub enum CacheError {
    /// A path segment could not be matched inside the node graph.
    #[error("cannot resolve path `{path}`: {source}")]
    PathResolution {
        /// The resolved patch path.
        path: String,
        /// What failed.
        #[source]
        source: ResolveError,
    },

    /// The payload does not decode into the shape the slot requires.
    #[error("cannot decode payload for `{path}`: {source}")]
    PayloadDecode {
        /// The resolved patch path.
        path: String,
        /// What failed.
        #[source]
        source: CodecError,
    },
}

impl CacheError {
    /// Creates a path resolution error.
    pub fn path_resolution(path: &PatchPath, source: ResolveError) -> Self {
        Self::PathResolution {
            path: path.to_string(),
            source,
        }
    }

    /// Creates a payload decode error.
    pub fn payload_decode(path: &PatchPath, source: CodecError) -> Self {
        Self::PayloadDecode {
            path: path.to_string(),
            source,
        }
    }

    /// Returns true for path resolution failures.
    pub fn is_path_resolution(&self) -> bool {
        matches!(self, Self::PathResolution { .. })
    }

    /// Returns true for payload decode failures.
    pub fn is_payload_decode(&self) -> bool {
        matches!(self, Self::PayloadDecode { .. })
    }

    /// Returns the resolved path the failing patch addressed.
    pub fn path(&self) -> &str {
        match self {
            Self::PathResolution { path, .. } | Self::PayloadDecode { path, .. } => path,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = ResolveError::unknown_field("Dino", "wings");
        assert_eq!(err.to_string(), "`Dino` has no field matching `wings`");

        let err = ResolveError::not_navigable(NodeKind::Primitive, "x");
        assert_eq!(err.to_string(), "cannot descend into primitive node with `x`");
    }

    #[test]
    fn cache_error_classification() {
        let path = PatchPath::from_segments(["trex", "wings"]);
        let err = CacheError::path_resolution(&path, ResolveError::unknown_field("Dino", "wings"));
        assert!(err.is_path_resolution());
        assert!(!err.is_payload_decode());
        assert_eq!(err.path(), "trex/wings");
        assert!(err.to_string().contains("trex/wings"));

        let err = CacheError::payload_decode(&path, CodecError::decoding_failed("bad"));
        assert!(err.is_payload_decode());
        assert!(std::error::Error::source(&err).is_some());
    }
}
