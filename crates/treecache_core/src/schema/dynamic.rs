//! Untyped documents as cache nodes.
//!
//! A [`Document`] is classified as a primitive, but it behaves like the
//! value it currently holds. An object absorbs an object payload the way a
//! map does: each member is upserted and a `null` member removes its key.
//! Scalars and arrays are replaced wholesale. Payload text that does not
//! parse is kept as a string, since feeds send leaf strings unquoted.
//! Objects and arrays can be navigated into, which lets a cache of
//! documents mirror an arbitrary tree without a schema.

use super::container::{index_child, remove_index};
use super::{Node, NodeKind, NodeType};
use crate::error::{ResolveError, ResolveResult};
use treecache_codec::{document_kind, CodecError, CodecResult, Document};

impl Node for Document {
    fn kind(&self) -> NodeKind {
        NodeKind::Primitive
    }

    fn child_mut(&mut self, segment: &str) -> ResolveResult<&mut dyn Node> {
        if self.is_null() {
            *self = Document::Object(serde_json::Map::new());
        }
        match self {
            Document::Object(map) => Ok(map.entry(segment).or_insert(Document::Null)),
            Document::Array(items) => index_child(items, segment),
            _ => Err(ResolveError::not_navigable(NodeKind::Primitive, segment)),
        }
    }

    fn remove_child(&mut self, segment: &str) -> ResolveResult<()> {
        match self {
            Document::Null => Ok(()),
            Document::Object(map) => {
                map.shift_remove(segment);
                Ok(())
            }
            Document::Array(items) => remove_index(items, segment),
            _ => Err(ResolveError::not_navigable(NodeKind::Primitive, segment)),
        }
    }

    fn replace(&mut self, document: Document) -> CodecResult<()> {
        *self = document;
        Ok(())
    }

    fn merge(&mut self, document: Document) -> CodecResult<()> {
        match document {
            Document::Object(members) if self.is_null() || self.is_object() => {
                if self.is_null() {
                    *self = Document::Object(serde_json::Map::new());
                }
                self.upsert(members.into_iter().collect())
            }
            document => self.replace(document),
        }
    }

    fn assign_unparsed(&mut self, text: &str, _error: CodecError) -> CodecResult<()> {
        *self = Document::String(text.to_owned());
        Ok(())
    }

    fn upsert(&mut self, entries: Vec<(String, Document)>) -> CodecResult<()> {
        let map = match self {
            Document::Object(map) => map,
            other => return Err(CodecError::shape_mismatch("object", document_kind(other))),
        };
        for (key, value) in entries {
            if value.is_null() {
                map.shift_remove(&key);
            } else {
                map.insert(key, value);
            }
        }
        Ok(())
    }
}

impl NodeType for Document {
    const KIND: NodeKind = NodeKind::Primitive;
}
