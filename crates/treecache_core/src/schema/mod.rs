//! Value-shape classification of cacheable types.
//!
//! Every type that can sit in the cache implements [`NodeType`], which
//! fixes its [`NodeKind`] once, at compile time. Navigation and merging go
//! through the object-safe [`Node`] trait so the engine can walk a graph of
//! heterogeneous values without knowing their concrete types.
//!
//! Default values come from [`Default`]: empty string, empty bytes, empty
//! map, zero-valued record.
//!
//! Provided implementations:
//!
//! | Type | Kind |
//! |---|---|
//! | `String` | [`NodeKind::Text`] |
//! | [`Binary`](treecache_codec::Binary) | [`NodeKind::Binary`] |
//! | `bool`, integers, floats, `char`, [`Document`] | [`NodeKind::Primitive`] |
//! | `Vec<T>` | [`NodeKind::Sequence`] |
//! | `BTreeMap<String, V>`, `HashMap<String, V>`, `IndexMap<String, V>` | [`NodeKind::Map`] |
//! | `Option<T>` | same as `T` |
//! | types declared with [`record!`](crate::record) | [`NodeKind::Struct`] |

mod container;
mod dynamic;
mod leaf;
mod record;

pub use record::{FieldSchema, Record, StructSchema};

use crate::error::{ResolveError, ResolveResult};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt;
use treecache_codec::{from_document, CodecError, CodecResult, Document};

/// Shape of a slot, deciding how patches addressing it are applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    /// UTF-8 text; payloads are assigned verbatim.
    Text,
    /// Byte sequence; payloads are base64 text.
    Binary,
    /// Any other scalar; payloads are decoded with replace semantics.
    Primitive,
    /// Ordered collection; payloads are decoded with replace semantics.
    Sequence,
    /// Fixed set of named fields; payloads are merged field by field.
    Struct,
    /// Dynamic string-keyed container; payloads are batch upserts.
    Map,
}

impl NodeKind {
    /// Returns a lowercase name for the kind.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Binary => "binary",
            Self::Primitive => "primitive",
            Self::Sequence => "sequence",
            Self::Struct => "struct",
            Self::Map => "map",
        }
    }

    /// Returns true for leaf kinds that never hold addressable children.
    pub const fn is_leaf(self) -> bool {
        matches!(self, Self::Text | Self::Binary | Self::Primitive)
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A slot in the cached object graph.
///
/// Only [`kind`](Node::kind) and [`replace`](Node::replace) are required;
/// the other operations default to failing, and each shape overrides the
/// ones that apply to it.
pub trait Node: fmt::Debug {
    /// Returns the static shape of this node.
    fn kind(&self) -> NodeKind;

    /// Returns the child addressed by `segment`, creating it with its
    /// default value if it is missing.
    fn child_mut(&mut self, segment: &str) -> ResolveResult<&mut dyn Node> {
        Err(ResolveError::not_navigable(self.kind(), segment))
    }

    /// Removes (or resets to default) the child addressed by `segment`.
    fn remove_child(&mut self, segment: &str) -> ResolveResult<()> {
        Err(ResolveError::not_navigable(self.kind(), segment))
    }

    /// Replaces this value with one decoded from `document`.
    fn replace(&mut self, document: Document) -> CodecResult<()>;

    /// Merges `document` into this value.
    ///
    /// Records and schemaless objects distinguish this from
    /// [`replace`](Node::replace).
    fn merge(&mut self, document: Document) -> CodecResult<()> {
        self.replace(document)
    }

    /// Assigns raw payload text.
    fn assign_text(&mut self, _text: &str) -> CodecResult<()> {
        Err(CodecError::shape_mismatch("text slot", self.kind().name()))
    }

    /// Assigns payload text the codec failed to parse with `error`.
    ///
    /// Typed slots reject it; schemaless documents keep it as a string.
    fn assign_unparsed(&mut self, _text: &str, error: CodecError) -> CodecResult<()> {
        Err(error)
    }

    /// Assigns decoded bytes.
    fn assign_bytes(&mut self, _bytes: Vec<u8>) -> CodecResult<()> {
        Err(CodecError::shape_mismatch("binary slot", self.kind().name()))
    }

    /// Upserts keyed entries; a `null` entry removes its key.
    fn upsert(&mut self, _entries: Vec<(String, Document)>) -> CodecResult<()> {
        Err(CodecError::shape_mismatch("map slot", self.kind().name()))
    }
}

/// A concrete cacheable type with a fixed shape.
pub trait NodeType: Node + Default + Clone + Serialize + DeserializeOwned + 'static {
    /// The shape of every value of this type.
    const KIND: NodeKind;
}

/// Replaces `slot` with a value decoded from `document`.
///
/// The usual [`Node::replace`] body for serde-decodable types.
pub fn replace_with<T: DeserializeOwned>(slot: &mut T, document: Document) -> CodecResult<()> {
    *slot = from_document(document)?;
    Ok(())
}
