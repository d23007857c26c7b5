//! Container nodes: options, sequences and string-keyed maps.

use super::{replace_with, Node, NodeKind, NodeType};
use crate::error::{ResolveError, ResolveResult};
use indexmap::IndexMap;
use std::collections::{BTreeMap, HashMap};
use treecache_codec::{from_document, CodecError, CodecResult, Document};

// An absent optional value is materialized before anything reaches into it.
impl<T: NodeType> Node for Option<T> {
    fn kind(&self) -> NodeKind {
        T::KIND
    }

    fn child_mut(&mut self, segment: &str) -> ResolveResult<&mut dyn Node> {
        self.get_or_insert_with(T::default).child_mut(segment)
    }

    fn remove_child(&mut self, segment: &str) -> ResolveResult<()> {
        self.get_or_insert_with(T::default).remove_child(segment)
    }

    fn replace(&mut self, document: Document) -> CodecResult<()> {
        replace_with(self, document)
    }

    fn merge(&mut self, document: Document) -> CodecResult<()> {
        self.get_or_insert_with(T::default).merge(document)
    }

    fn assign_text(&mut self, text: &str) -> CodecResult<()> {
        self.get_or_insert_with(T::default).assign_text(text)
    }

    fn assign_unparsed(&mut self, text: &str, error: CodecError) -> CodecResult<()> {
        self.get_or_insert_with(T::default).assign_unparsed(text, error)
    }

    fn assign_bytes(&mut self, bytes: Vec<u8>) -> CodecResult<()> {
        self.get_or_insert_with(T::default).assign_bytes(bytes)
    }

    fn upsert(&mut self, entries: Vec<(String, Document)>) -> CodecResult<()> {
        self.get_or_insert_with(T::default).upsert(entries)
    }
}

impl<T: NodeType> NodeType for Option<T> {
    const KIND: NodeKind = T::KIND;
}

fn parse_index(segment: &str) -> ResolveResult<usize> {
    segment
        .parse()
        .map_err(|_| ResolveError::invalid_index(segment))
}

/// Addresses element `segment` of `items`; one past the end appends a
/// default element.
pub(crate) fn index_child<'a, T>(items: &'a mut Vec<T>, segment: &str) -> ResolveResult<&'a mut dyn Node>
where
    T: Node + Default + 'static,
{
    let index = parse_index(segment)?;
    let len = items.len();
    if index == len {
        items.push(T::default());
    }
    match items.get_mut(index) {
        Some(item) => Ok(item),
        None => Err(ResolveError::IndexOutOfRange { index, len }),
    }
}

/// Removes element `segment` of `items` if present.
pub(crate) fn remove_index<T>(items: &mut Vec<T>, segment: &str) -> ResolveResult<()> {
    let index = parse_index(segment)?;
    if index < items.len() {
        items.remove(index);
    }
    Ok(())
}

impl<T: NodeType> Node for Vec<T> {
    fn kind(&self) -> NodeKind {
        NodeKind::Sequence
    }

    fn child_mut(&mut self, segment: &str) -> ResolveResult<&mut dyn Node> {
        index_child(self, segment)
    }

    fn remove_child(&mut self, segment: &str) -> ResolveResult<()> {
        remove_index(self, segment)
    }

    fn replace(&mut self, document: Document) -> CodecResult<()> {
        replace_with(self, document)
    }
}

impl<T: NodeType> NodeType for Vec<T> {
    const KIND: NodeKind = NodeKind::Sequence;
}

/// Decodes every entry before any is applied, so a bad entry leaves the
/// map untouched.
fn decode_upserts<V: NodeType>(entries: Vec<(String, Document)>) -> CodecResult<Vec<(String, Option<V>)>> {
    entries
        .into_iter()
        .map(|(key, document)| match document {
            Document::Null => Ok((key, None)),
            document => from_document(document).map(|value| (key, Some(value))),
        })
        .collect()
}

macro_rules! map_node {
    ($map:ident, $remove:ident) => {
        impl<V: NodeType> Node for $map<String, V> {
            fn kind(&self) -> NodeKind {
                NodeKind::Map
            }

            fn child_mut(&mut self, segment: &str) -> ResolveResult<&mut dyn Node> {
                Ok(self.entry(segment.to_owned()).or_default())
            }

            fn remove_child(&mut self, segment: &str) -> ResolveResult<()> {
                self.$remove(segment);
                Ok(())
            }

            fn replace(&mut self, document: Document) -> CodecResult<()> {
                replace_with(self, document)
            }

            fn upsert(&mut self, entries: Vec<(String, Document)>) -> CodecResult<()> {
                for (key, value) in decode_upserts::<V>(entries)? {
                    match value {
                        Some(value) => {
                            self.insert(key, value);
                        }
                        None => {
                            self.$remove(key.as_str());
                        }
                    }
                }
                Ok(())
            }
        }

        impl<V: NodeType> NodeType for $map<String, V> {
            const KIND: NodeKind = NodeKind::Map;
        }
    };
}

map_node!(BTreeMap, remove);
map_node!(HashMap, remove);
map_node!(IndexMap, shift_remove);
