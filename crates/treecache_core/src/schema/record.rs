//! Field tables for structured records.
//!
//! A record type gets one [`StructSchema`], built the first time it is
//! needed and shared afterwards. The schema maps every field name
//! (case-insensitively) and every serialization alias (exactly) to a pair
//! of plain function pointers: one borrowing the field as a [`Node`], one
//! resetting it to its default.

use super::Node;
use crate::error::{ResolveError, ResolveResult};
use std::collections::HashMap;
use std::fmt;
use tracing::trace;
use treecache_codec::{keyed_entries, CodecResult, Document};

/// Accessors for one field of record type `S`.
pub struct FieldSchema<S> {
    name: &'static str,
    alias: Option<&'static str>,
    access: fn(&mut S) -> &mut dyn Node,
    reset: fn(&mut S),
}

impl<S> FieldSchema<S> {
    /// Creates a field entry.
    pub const fn new(
        name: &'static str,
        alias: Option<&'static str>,
        access: fn(&mut S) -> &mut dyn Node,
        reset: fn(&mut S),
    ) -> Self {
        Self {
            name,
            alias,
            access,
            reset,
        }
    }

    /// Returns the field name.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Returns the serialization alias, if declared.
    pub fn alias(&self) -> Option<&'static str> {
        self.alias
    }

    /// Borrows the field of `target` as a node.
    pub fn access<'a>(&self, target: &'a mut S) -> &'a mut dyn Node {
        (self.access)(target)
    }

    /// Resets the field of `target` to its default value.
    pub fn reset(&self, target: &mut S) {
        (self.reset)(target);
    }
}

impl<S> fmt::Debug for FieldSchema<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldSchema")
            .field("name", &self.name)
            .field("alias", &self.alias)
            .finish()
    }
}

/// The field table of a record type.
pub struct StructSchema<S> {
    type_name: &'static str,
    fields: Vec<FieldSchema<S>>,
    by_name: HashMap<String, usize>,
    by_alias: HashMap<&'static str, usize>,
}

impl<S> StructSchema<S> {
    /// Builds the lookup tables for `fields`.
    ///
    /// When names or aliases collide, the field declared first wins.
    pub fn new(type_name: &'static str, fields: Vec<FieldSchema<S>>) -> Self {
        let mut by_name = HashMap::with_capacity(fields.len());
        let mut by_alias = HashMap::new();
        for (index, field) in fields.iter().enumerate() {
            by_name.entry(fold(field.name)).or_insert(index);
            if let Some(alias) = field.alias {
                by_alias.entry(alias).or_insert(index);
            }
        }
        Self {
            type_name,
            fields,
            by_name,
            by_alias,
        }
    }

    /// Returns the record type name.
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Returns the fields in declaration order.
    pub fn fields(&self) -> &[FieldSchema<S>] {
        &self.fields
    }

    /// Finds the field addressed by `segment`.
    pub fn field(&self, segment: &str) -> Option<&FieldSchema<S>> {
        let by_name = self.by_name.get(&fold(segment)).copied();
        let by_alias = self.by_alias.get(segment).copied();
        let index = match (by_name, by_alias) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        };
        index.map(|i| &self.fields[i])
    }

    fn resolve(&self, segment: &str) -> ResolveResult<&FieldSchema<S>> {
        self.field(segment)
            .ok_or_else(|| ResolveError::unknown_field(self.type_name, segment))
    }

    /// Borrows the field of `target` addressed by `segment`.
    pub fn child_mut<'a>(&self, target: &'a mut S, segment: &str) -> ResolveResult<&'a mut dyn Node> {
        Ok(self.resolve(segment)?.access(target))
    }

    /// Resets the field of `target` addressed by `segment`.
    pub fn reset(&self, target: &mut S, segment: &str) -> ResolveResult<()> {
        self.resolve(segment)?.reset(target);
        Ok(())
    }

    /// Merges an object document into `target`.
    ///
    /// Each member naming a field replaces that field wholesale; a `null`
    /// member resets it. Members naming no field are ignored and fields
    /// not mentioned keep their values.
    pub fn merge(&self, target: &mut S, document: Document) -> CodecResult<()> {
        for (key, value) in keyed_entries(document)? {
            let Some(field) = self.field(&key) else {
                trace!(record = self.type_name, member = %key, "ignoring unknown member");
                continue;
            };
            if value.is_null() {
                field.reset(target);
            } else {
                field.access(target).replace(value)?;
            }
        }
        Ok(())
    }
}

impl<S> fmt::Debug for StructSchema<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StructSchema")
            .field("type_name", &self.type_name)
            .field("fields", &self.fields)
            .finish()
    }
}

fn fold(name: &str) -> String {
    name.to_lowercase()
}

/// A structured type with a field table.
///
/// Implemented by [`record!`](crate::record).
pub trait Record: Sized + 'static {
    /// Returns the shared field table.
    fn schema() -> &'static StructSchema<Self>;
}

/// Declares a struct as a cacheable record.
///
/// Lists the fields that patches may address, each optionally followed by
/// `as "alias"` naming its serialized key. Field names match path
/// segments case-insensitively; aliases match exactly. The struct must
/// derive `Debug`, `Default`, `Clone`, `Serialize` and `Deserialize`, and
/// every listed field type must implement [`NodeType`](crate::NodeType).
/// Mark the struct `#[serde(default)]` so replace decodes tolerate
/// missing members the way merges do.
///
/// ```
/// use serde::{Deserialize, Serialize};
/// use treecache_core::{record, Node, NodeKind};
///
/// #[derive(Debug, Clone, Default, Serialize, Deserialize)]
/// #[serde(default)]
/// struct Dino {
///     #[serde(rename = "Height")]
///     height: f64,
///     #[serde(rename = "species_name")]
///     species: Option<String>,
/// }
///
/// record!(Dino { height, species as "species_name" });
///
/// let mut dino = Dino::default();
/// assert_eq!(dino.kind(), NodeKind::Struct);
/// dino.child_mut("SPECIES_NAME").unwrap_err();
/// dino.child_mut("species_name").unwrap().assign_text("T. rex").unwrap();
/// assert_eq!(dino.species.as_deref(), Some("T. rex"));
/// ```
#[macro_export]
macro_rules! record {
    ($ty:ident { $($field:ident $(as $alias:literal)?),* $(,)? }) => {
        impl $crate::Record for $ty {
            fn schema() -> &'static $crate::StructSchema<Self> {
                static SCHEMA: ::std::sync::OnceLock<$crate::StructSchema<$ty>> =
                    ::std::sync::OnceLock::new();
                SCHEMA.get_or_init(|| {
                    $crate::StructSchema::new(
                        ::core::stringify!($ty),
                        ::std::vec![$(
                            {
                                fn access(target: &mut $ty) -> &mut dyn $crate::Node {
                                    &mut target.$field
                                }
                                fn reset(target: &mut $ty) {
                                    target.$field = ::core::default::Default::default();
                                }
                                $crate::FieldSchema::new(
                                    ::core::stringify!($field),
                                    ::core::option::Option::None $(.or(::core::option::Option::Some($alias)))?,
                                    access,
                                    reset,
                                )
                            }
                        ),*],
                    )
                })
            }
        }

        impl $crate::Node for $ty {
            fn kind(&self) -> $crate::NodeKind {
                $crate::NodeKind::Struct
            }

            fn child_mut(&mut self, segment: &str) -> $crate::ResolveResult<&mut dyn $crate::Node> {
                <$ty as $crate::Record>::schema().child_mut(self, segment)
            }

            fn remove_child(&mut self, segment: &str) -> $crate::ResolveResult<()> {
                <$ty as $crate::Record>::schema().reset(self, segment)
            }

            fn replace(&mut self, document: $crate::Document) -> $crate::CodecResult<()> {
                $crate::replace_with(self, document)
            }

            fn merge(&mut self, document: $crate::Document) -> $crate::CodecResult<()> {
                <$ty as $crate::Record>::schema().merge(self, document)
            }
        }

        impl $crate::NodeType for $ty {
            const KIND: $crate::NodeKind = $crate::NodeKind::Struct;
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::NodeKind;
    use serde::{Deserialize, Serialize};
    use serde_json::json;
    use std::collections::BTreeMap;

    #[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
    #[serde(default)]
    struct Dimensions {
        #[serde(rename = "Height")]
        height: f64,
        #[serde(rename = "Length")]
        length: f64,
    }

    crate::record!(Dimensions { height, length });

    #[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
    #[serde(default)]
    struct Dino {
        #[serde(rename = "dims")]
        dimensions: Option<Dimensions>,
        #[serde(rename = "Order")]
        order: String,
        tags: BTreeMap<String, String>,
    }

    crate::record!(Dino { dimensions as "dims", order, tags });

    #[test]
    fn schema_is_built_once() {
        let first = <Dino as Record>::schema() as *const StructSchema<Dino>;
        let second = <Dino as Record>::schema() as *const StructSchema<Dino>;
        assert_eq!(first, second);
        assert_eq!(Dino::schema().type_name(), "Dino");
        assert_eq!(Dino::schema().fields().len(), 3);
    }

    #[test]
    fn fields_match_by_name_or_alias() {
        let schema = Dino::schema();
        assert_eq!(schema.field("DIMENSIONS").map(FieldSchema::name), Some("dimensions"));
        assert_eq!(schema.field("dims").map(FieldSchema::name), Some("dimensions"));
        assert_eq!(schema.field("Order").map(FieldSchema::name), Some("order"));
        assert!(schema.field("DIMS").is_none());
        assert!(schema.field("wings").is_none());
    }

    #[test]
    fn first_declared_field_wins() {
        fn a(target: &mut (u32, u32)) -> &mut dyn Node {
            &mut target.0
        }
        fn b(target: &mut (u32, u32)) -> &mut dyn Node {
            &mut target.1
        }
        fn reset(_: &mut (u32, u32)) {}

        let schema = StructSchema::new(
            "Pair",
            vec![
                FieldSchema::new("first", Some("second"), a, reset),
                FieldSchema::new("second", None, b, reset),
            ],
        );
        assert_eq!(schema.field("second").map(FieldSchema::name), Some("first"));
    }

    #[test]
    fn unknown_field_is_a_resolution_error() {
        let mut dino = Dino::default();
        let err = dino.child_mut("wings").unwrap_err();
        assert_eq!(err, ResolveError::unknown_field("Dino", "wings"));
        assert!(dino.remove_child("wings").is_err());
    }

    #[test]
    fn descending_materializes_optional_records() {
        let mut dino = Dino::default();
        let height = dino
            .child_mut("dims")
            .and_then(|dims| dims.child_mut("height"))
            .unwrap();
        assert_eq!(height.kind(), NodeKind::Primitive);
        height.replace(json!(5.2)).unwrap();
        assert_eq!(dino.dimensions.unwrap().height, 5.2);
    }

    #[test]
    fn merge_keeps_unmentioned_fields() {
        let mut dino = Dino {
            dimensions: Some(Dimensions {
                height: 1.0,
                length: 2.0,
            }),
            order: "theropod".into(),
            tags: BTreeMap::new(),
        };
        dino.merge(json!({"dims": {"Height": 5.0}, "Wings": true}))
            .unwrap();

        // Named fields are replaced wholesale, not merged further down.
        assert_eq!(
            dino.dimensions,
            Some(Dimensions {
                height: 5.0,
                length: 0.0
            })
        );
        assert_eq!(dino.order, "theropod");
    }

    #[test]
    fn merge_null_resets_field() {
        let mut dino = Dino {
            order: "theropod".into(),
            ..Dino::default()
        };
        dino.merge(json!({"order": null})).unwrap();
        assert_eq!(dino.order, "");
    }

    #[test]
    fn merge_requires_object() {
        let mut dino = Dino::default();
        assert!(dino.merge(json!([1, 2])).is_err());
    }

    #[test]
    fn remove_child_resets_field() {
        let mut dino = Dino {
            order: "theropod".into(),
            ..Dino::default()
        };
        dino.remove_child("ORDER").unwrap();
        assert_eq!(dino.order, "");
    }
}
