//! Binding path segments to slots in a node graph.

use crate::error::ResolveResult;
use crate::schema::Node;
use tracing::trace;

/// Walks `segments` down from `node` and returns the node they address.
///
/// Missing map keys, unset optional fields and the element one past the
/// end of a sequence are created with their default values on the way
/// down, so binding can mutate the graph even when it ultimately fails.
pub fn bind<'a>(node: &'a mut dyn Node, segments: &[String]) -> ResolveResult<&'a mut dyn Node> {
    let mut current = node;
    for segment in segments {
        trace!(segment = %segment, kind = %current.kind(), "binding segment");
        current = current.child_mut(segment)?;
    }
    Ok(current)
}

/// A slot addressed by one segment below a bound parent.
///
/// Valid for a single patch application. [`get`](Location::get) yields the
/// slot itself (creating it if needed) so it can be assigned, replaced or
/// merged; [`delete`](Location::delete) removes it from the parent.
#[derive(Debug)]
pub struct Location<'a> {
    parent: &'a mut dyn Node,
    segment: &'a str,
}

impl<'a> Location<'a> {
    /// Binds every segment but the last, and addresses the last one.
    ///
    /// Returns `None` for an empty segment list: the slot is then the
    /// starting node itself, which only its owner can delete.
    pub fn bind(node: &'a mut dyn Node, segments: &'a [String]) -> ResolveResult<Option<Self>> {
        let Some((last, parents)) = segments.split_last() else {
            return Ok(None);
        };
        let parent = bind(node, parents)?;
        Ok(Some(Self {
            parent,
            segment: last,
        }))
    }

    /// Returns the addressed segment.
    pub fn segment(&self) -> &str {
        self.segment
    }

    /// Returns the bound parent node.
    pub fn parent(&self) -> &dyn Node {
        &*self.parent
    }

    /// Returns the addressed slot, creating it with its default if absent.
    pub fn get(self) -> ResolveResult<&'a mut dyn Node> {
        self.parent.child_mut(self.segment)
    }

    /// Removes the addressed slot, or resets a record field to its default.
    pub fn delete(self) -> ResolveResult<()> {
        self.parent.remove_child(self.segment)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ResolveError;
    use crate::schema::NodeKind;
    use serde_json::json;
    use std::collections::BTreeMap;
    use treecache_codec::Document;

    fn segments(path: &str) -> Vec<String> {
        path.split('/').map(str::to_owned).collect()
    }

    #[test]
    fn empty_path_binds_the_node_itself() {
        let mut map: BTreeMap<String, u32> = BTreeMap::new();
        let node = bind(&mut map, &[]).unwrap();
        assert_eq!(node.kind(), NodeKind::Map);
        assert!(Location::bind(&mut map, &[]).unwrap().is_none());
    }

    #[test]
    fn creates_intermediate_containers() {
        let mut tree: BTreeMap<String, BTreeMap<String, BTreeMap<String, u32>>> =
            BTreeMap::new();
        let path = segments("a/b/c");
        bind(&mut tree, &path).unwrap().replace(json!(3)).unwrap();
        assert_eq!(tree["a"]["b"]["c"], 3);
    }

    #[test]
    fn stops_at_leaves() {
        let mut doc = json!({"a": 1});
        let path = segments("a/b");
        let err = bind(&mut doc, &path).unwrap_err();
        assert_eq!(err, ResolveError::not_navigable(NodeKind::Primitive, "b"));
    }

    #[test]
    fn location_get_and_delete() {
        let mut doc = Document::Null;
        let path = segments("x/y");

        let location = Location::bind(&mut doc, &path).unwrap().unwrap();
        assert_eq!(location.segment(), "y");
        location.get().unwrap().replace(json!("v")).unwrap();
        assert_eq!(doc, json!({"x": {"y": "v"}}));

        let location = Location::bind(&mut doc, &path).unwrap().unwrap();
        assert_eq!(location.parent().kind(), NodeKind::Primitive);
        location.delete().unwrap();
        assert_eq!(doc, json!({"x": {}}));
    }
}
