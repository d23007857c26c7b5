//! Patch test vectors.
//!
//! Each vector is a short patch sequence against a schemaless cache
//! together with the change records the last patch must produce and the
//! cache contents afterwards.

use crate::generators::Patch;
use serde::{Deserialize, Serialize};
use serde_json::json;
use treecache_core::{CacheConfig, Document, TreeCache};

/// A patch scenario with its expected outcome.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatchVector {
    /// Unique identifier for this vector.
    pub id: String,
    /// Human-readable description.
    pub description: String,
    /// Base path the cache subscribes to.
    pub base_path: Option<String>,
    /// Patches applied before the one under test.
    pub setup: Vec<Patch>,
    /// The patch under test.
    pub patch: Patch,
    /// Expected `[key, value]` records of the patch under test.
    pub expected_records: Vec<(String, Option<Document>)>,
    /// Expected cache contents afterwards, as one object.
    pub expected_cache: Document,
    /// Whether the patch under test must be rejected.
    pub expect_error: bool,
}

impl PatchVector {
    /// Builds the cache this vector runs against.
    pub fn cache(&self) -> TreeCache<Document> {
        let mut config = CacheConfig::new();
        if let Some(base) = &self.base_path {
            config = config.base_path(base.clone());
        }
        TreeCache::with_config(config)
    }
}

fn vector(id: &str, description: &str) -> PatchVector {
    PatchVector {
        id: id.into(),
        description: description.into(),
        base_path: None,
        setup: Vec::new(),
        patch: Patch::new("", ""),
        expected_records: Vec::new(),
        expected_cache: json!({}),
        expect_error: false,
    }
}

/// Patch semantics vectors.
pub fn patch_vectors() -> Vec<PatchVector> {
    vec![
        PatchVector {
            base_path: Some("dinosaurs".into()),
            patch: Patch::new("dinosaurs/trex", r#"{"Height":5.2}"#),
            expected_records: vec![("trex".into(), Some(json!({"Height": 5.2})))],
            expected_cache: json!({"trex": {"Height": 5.2}}),
            ..vector("entity_put", "Entity upsert below the base path")
        },
        PatchVector {
            base_path: Some("dinosaurs".into()),
            setup: vec![Patch::new("dinosaurs/trex", r#"{"Height":5.2}"#)],
            patch: Patch::delete("dinosaurs/trex"),
            expected_records: vec![("trex".into(), None)],
            ..vector("entity_delete", "Empty payload removes the entity")
        },
        PatchVector {
            patch: Patch::new("a/b/c", "1"),
            expected_records: vec![("a".into(), Some(json!({"b": {"c": 1}})))],
            expected_cache: json!({"a": {"b": {"c": 1}}}),
            ..vector("auto_create", "Missing intermediate containers are created")
        },
        PatchVector {
            setup: vec![Patch::new("a", r#"{"x":1,"y":2}"#)],
            patch: Patch::new("a/x", "null"),
            expected_records: vec![("a".into(), Some(json!({"y": 2})))],
            expected_cache: json!({"a": {"y": 2}}),
            ..vector("nested_delete", "Nested deletion reports the entity")
        },
        PatchVector {
            setup: vec![Patch::new("old", "1")],
            patch: Patch::new("/", r#"{"p":1,"old":null,"q":[2]}"#),
            expected_records: vec![
                ("p".into(), Some(json!(1))),
                ("old".into(), None),
                ("q".into(), Some(json!([2]))),
            ],
            expected_cache: json!({"p": 1, "q": [2]}),
            ..vector("root_batch", "Root object upserts every entry in order")
        },
        PatchVector {
            setup: vec![Patch::new("a", "1"), Patch::new("b", "2")],
            patch: Patch::new("", "null"),
            expected_records: vec![("a".into(), None), ("b".into(), None)],
            ..vector("root_delete", "Root deletion clears the cache")
        },
        PatchVector {
            setup: vec![Patch::new("a", r#"{"n":1}"#)],
            patch: Patch::new("a/n/deeper", "2"),
            expected_cache: json!({"a": {"n": 1}}),
            expect_error: true,
            ..vector("scalar_descent", "Descending into a scalar is rejected")
        },
        PatchVector {
            setup: vec![Patch::new("a", "1")],
            patch: Patch::new("/", "[1, 2]"),
            expected_cache: json!({"a": 1}),
            expect_error: true,
            ..vector("bad_payload", "Root payload must be a keyed collection")
        },
        PatchVector {
            setup: vec![Patch::new("lion", r#"{"age":4}"#)],
            patch: Patch::new("lion/name", "Leo"),
            expected_records: vec![("lion".into(), Some(json!({"age": 4, "name": "Leo"})))],
            expected_cache: json!({"lion": {"age": 4, "name": "Leo"}}),
            ..vector("text_leaf", "Unquoted text is kept as a string")
        },
        PatchVector {
            setup: vec![Patch::new("lion", r#"{"age":4,"mane":true}"#)],
            patch: Patch::new("lion", r#"{"name":"Leo","mane":null}"#),
            expected_records: vec![("lion".into(), Some(json!({"age": 4, "name": "Leo"})))],
            expected_cache: json!({"lion": {"age": 4, "name": "Leo"}}),
            ..vector("object_merge", "Object payloads keep sibling members")
        },
    ]
}
