//! Leaf nodes: text, binary and scalar primitives.

use super::{replace_with, Node, NodeKind, NodeType};
use treecache_codec::{Binary, CodecResult, Document};

impl Node for String {
    fn kind(&self) -> NodeKind {
        NodeKind::Text
    }

    fn replace(&mut self, document: Document) -> CodecResult<()> {
        replace_with(self, document)
    }

    fn assign_text(&mut self, text: &str) -> CodecResult<()> {
        text.clone_into(self);
        Ok(())
    }
}

impl NodeType for String {
    const KIND: NodeKind = NodeKind::Text;
}

impl Node for Binary {
    fn kind(&self) -> NodeKind {
        NodeKind::Binary
    }

    fn replace(&mut self, document: Document) -> CodecResult<()> {
        replace_with(self, document)
    }

    fn assign_bytes(&mut self, bytes: Vec<u8>) -> CodecResult<()> {
        *self = Binary::new(bytes);
        Ok(())
    }
}

impl NodeType for Binary {
    const KIND: NodeKind = NodeKind::Binary;
}

/// Implements [`Node`] and [`NodeType`] as primitives for serde types.
///
/// Patches addressing a primitive are decoded with replace semantics.
/// Use it for field-less enums and other scalar-like types:
///
/// ```
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Debug, Clone, Default, Serialize, Deserialize)]
/// enum Diet {
///     #[default]
///     Herbivore,
///     Carnivore,
/// }
///
/// treecache_core::primitive_node!(Diet);
/// ```
#[macro_export]
macro_rules! primitive_node {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl $crate::Node for $ty {
                fn kind(&self) -> $crate::NodeKind {
                    $crate::NodeKind::Primitive
                }

                fn replace(&mut self, document: $crate::Document) -> $crate::CodecResult<()> {
                    $crate::replace_with(self, document)
                }
            }

            impl $crate::NodeType for $ty {
                const KIND: $crate::NodeKind = $crate::NodeKind::Primitive;
            }
        )+
    };
}

crate::primitive_node!(bool, char, i8, i16, i32, i64, i128, u8, u16, u32, u64, u128, f32, f64);

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn text_is_assigned_verbatim() {
        let mut name = String::from("old");
        name.assign_text("{\"not\": json}").unwrap();
        assert_eq!(name, "{\"not\": json}");
    }

    #[test]
    fn binary_takes_bytes() {
        let mut blob = Binary::default();
        blob.assign_bytes(vec![1, 2, 3]).unwrap();
        assert_eq!(blob.as_bytes(), &[1, 2, 3]);
        assert!(blob.assign_text("AQID").is_err());
    }

    #[test]
    fn primitives_replace() {
        let mut height = 1.0_f64;
        height.replace(json!(5.2)).unwrap();
        assert_eq!(height, 5.2);

        let mut count = 0_u8;
        assert!(count.replace(json!(300)).is_err());
        assert_eq!(count, 0);
    }
}
