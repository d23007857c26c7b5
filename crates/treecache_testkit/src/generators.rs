//! Property-based test generators using proptest.
//!
//! Provides strategies for patch paths, payloads and whole patch
//! sequences, plus fixture records.

use crate::fixtures::{Dimensions, Dinosaur};
use proptest::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use treecache_core::{Binary, Document};

/// Strategy for generating a single path segment.
pub fn segment_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-z][a-z0-9_]{0,7}").expect("Invalid regex")
}

/// Strategy for generating a relative path of `1..=max_depth` segments.
pub fn path_strategy(max_depth: usize) -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec(segment_strategy(), 1..=max_depth.max(1))
}

/// Strategy for generating scalar JSON documents.
pub fn scalar_strategy() -> impl Strategy<Value = Document> {
    prop_oneof![
        any::<bool>().prop_map(Document::from),
        any::<i32>().prop_map(Document::from),
        (-1.0e6..1.0e6f64).prop_map(Document::from),
        "[a-zA-Z ]{0,16}".prop_map(Document::from),
    ]
}

/// Strategy for generating JSON objects of scalars keyed by segments.
pub fn object_strategy() -> impl Strategy<Value = Document> {
    prop::collection::btree_map(segment_strategy(), scalar_strategy(), 0..6)
        .prop_map(|map| Document::Object(map.into_iter().collect()))
}

/// One `(path, payload)` instruction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Patch {
    /// Slash-separated path.
    pub path: String,
    /// Raw payload text.
    pub data: String,
}

impl Patch {
    /// Creates a patch.
    pub fn new(path: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            data: data.into(),
        }
    }

    /// Creates a deleting patch.
    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(path, "")
    }

    /// Returns the first path segment.
    pub fn entity_key(&self) -> Option<&str> {
        self.path.split('/').find(|s| !s.is_empty())
    }

    /// Returns true if the payload deletes the addressed node.
    pub fn is_deletion(&self) -> bool {
        treecache_codec::is_deletion(&self.data)
    }
}

/// Strategy for generating patches against a schemaless cache.
///
/// Paths draw their first segment from a small key pool so that later
/// patches in a sequence revisit earlier entities.
pub fn patch_strategy() -> impl Strategy<Value = Patch> {
    let key = prop::sample::select(vec!["alpha", "beta", "gamma", "delta"]);
    let path = (key, prop::collection::vec(segment_strategy(), 0..3)).prop_map(|(key, rest)| {
        let mut segments = vec![key.to_owned()];
        segments.extend(rest);
        segments.join("/")
    });
    let payload = prop_oneof![
        3 => scalar_strategy().prop_map(|doc| doc.to_string()),
        2 => object_strategy().prop_map(|doc| doc.to_string()),
        1 => prop::sample::select(vec!["", "null", "  "]).prop_map(str::to_owned),
    ];
    (path, payload).prop_map(|(path, data)| Patch { path, data })
}

/// Strategy for generating a sequence of patches.
pub fn patch_sequence_strategy(min: usize, max: usize) -> impl Strategy<Value = Vec<Patch>> {
    prop::collection::vec(patch_strategy(), min..max)
}

// Quarter steps survive a decimal round trip exactly.
fn quarters(n: u32) -> f64 {
    f64::from(n) / 4.0
}

/// Strategy for generating dimensions.
pub fn dimensions_strategy() -> impl Strategy<Value = Dimensions> {
    (0..200u32, 0..200u32, 0..400_000u32).prop_map(|(height, length, weight)| Dimensions {
        height: quarters(height),
        length: quarters(length),
        weight: quarters(weight),
    })
}

/// Strategy for generating dinosaurs.
pub fn dinosaur_strategy() -> impl Strategy<Value = Dinosaur> {
    (
        "[a-z]{0,12}",
        1800..2030i64,
        prop::option::of(dimensions_strategy()),
        prop::collection::vec(any::<u8>(), 0..32),
        prop::collection::vec("[a-z]{1,6}", 0..4),
        prop::collection::btree_map(segment_strategy(), 0..10u32, 0..4),
    )
        .prop_map(|(order, appeared, dimensions, thumbnail, tags, scores)| Dinosaur {
            order,
            appeared,
            dimensions,
            thumbnail: Binary::new(thumbnail),
            tags,
            scores,
        })
}

/// Strategy for generating a keyed batch of dinosaurs.
pub fn dinosaur_batch_strategy(max: usize) -> impl Strategy<Value = BTreeMap<String, Dinosaur>> {
    prop::collection::btree_map(segment_strategy(), dinosaur_strategy(), 0..max)
}

/// Configuration for property tests.
#[derive(Debug, Clone)]
pub struct PropTestConfig {
    /// Number of test cases to run.
    pub cases: u32,
    /// Maximum shrink iterations.
    pub max_shrink_iters: u32,
}

impl Default for PropTestConfig {
    fn default() -> Self {
        Self {
            cases: 256,
            max_shrink_iters: 1000,
        }
    }
}

impl PropTestConfig {
    /// Creates a configuration for quick tests.
    #[must_use]
    pub fn quick() -> Self {
        Self {
            cases: 32,
            max_shrink_iters: 100,
        }
    }

    /// Creates a configuration for thorough tests.
    #[must_use]
    pub fn thorough() -> Self {
        Self {
            cases: 1024,
            max_shrink_iters: 10000,
        }
    }

    /// Converts to proptest config.
    #[must_use]
    pub fn to_proptest_config(&self) -> ProptestConfig {
        ProptestConfig {
            cases: self.cases,
            max_shrink_iters: self.max_shrink_iters,
            ..ProptestConfig::default()
        }
    }
}
