//! Fixture record types and cache helpers.
//!
//! The record types mirror a small remote tree of dinosaurs, exercising
//! every slot kind: text, binary, primitives, sequences, nested records
//! and string-keyed maps.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use treecache_core::{
    record, Binary, CacheConfig, CacheResult, ChangeRecord, Document, NodeType, TreeCache,
};

/// Base path every fixture cache subscribes to.
pub const DINOSAURS: &str = "dinosaurs";

/// Physical measurements of a dinosaur.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Dimensions {
    /// Height in metres.
    #[serde(rename = "Height")]
    pub height: f64,
    /// Length in metres.
    #[serde(rename = "Length")]
    pub length: f64,
    /// Weight in kilograms.
    #[serde(rename = "Weight")]
    pub weight: f64,
}

record!(Dimensions {
    height,
    length,
    weight
});

/// One dinosaur entry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Dinosaur {
    /// Taxonomic order.
    pub order: String,
    /// Year of first description.
    pub appeared: i64,
    /// Measurements, absent until first reported.
    #[serde(rename = "dims")]
    pub dimensions: Option<Dimensions>,
    /// Thumbnail image.
    pub thumbnail: Binary,
    /// Free-form tags.
    pub tags: Vec<String>,
    /// Scores keyed by judge.
    pub scores: BTreeMap<String, u32>,
}

record!(Dinosaur {
    order,
    appeared,
    dimensions as "dims",
    thumbnail,
    tags,
    scores
});

/// A cache over `T` subscribed to [`DINOSAURS`].
pub fn dinosaur_config() -> CacheConfig {
    CacheConfig::new().base_path(DINOSAURS)
}

/// Creates an empty dinosaur cache.
pub fn dinosaur_cache() -> TreeCache<Dinosaur> {
    TreeCache::with_config(dinosaur_config())
}

/// Creates an empty schemaless cache.
pub fn document_cache() -> TreeCache<Document> {
    TreeCache::new()
}

/// Applies one patch and collects its records.
pub fn apply<T: NodeType>(
    cache: &mut TreeCache<T>,
    path: &str,
    payload: &str,
) -> CacheResult<Vec<ChangeRecord<T>>> {
    Ok(cache.apply_patch(path, payload)?.collect())
}

/// Applies every patch in order, stopping at the first rejection.
pub fn apply_all<'a, T, I>(cache: &mut TreeCache<T>, patches: I) -> CacheResult<Vec<ChangeRecord<T>>>
where
    T: NodeType,
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    let mut records = Vec::new();
    for (path, payload) in patches {
        records.extend(cache.apply_patch(path, payload)?);
    }
    Ok(records)
}

/// Runs `f` against an empty dinosaur cache.
///
/// # Example
///
/// ```
/// use treecache_testkit::with_dinosaurs;
///
/// with_dinosaurs(|cache| {
///     cache.apply_patch("dinosaurs/trex/order", "theropoda").unwrap().for_each(drop);
///     assert!(cache.contains("trex"));
/// });
/// ```
pub fn with_dinosaurs<F, R>(f: F) -> R
where
    F: FnOnce(&mut TreeCache<Dinosaur>) -> R,
{
    let mut cache = dinosaur_cache();
    f(&mut cache)
}

/// Ready-made cache states.
pub mod scenarios {
    use super::*;

    /// Names used by [`populated_dinosaurs`], in insertion order.
    pub const NAMES: [&str; 4] = ["bruhathkayosaurus", "lambeosaurus", "linhenykus", "pterodactyl"];

    /// A cache seeded with `count` dinosaurs, cycling through [`NAMES`]
    /// with a numeric suffix once they run out.
    pub fn populated_dinosaurs(count: usize) -> TreeCache<Dinosaur> {
        let entries = (0..count).map(|i| {
            let base = NAMES[i % NAMES.len()];
            let key = if i < NAMES.len() {
                base.to_owned()
            } else {
                format!("{base}{i}")
            };
            let dinosaur = Dinosaur {
                order: "ornithischia".into(),
                appeared: 1850 + i as i64,
                dimensions: Some(Dimensions {
                    height: 1.0 + i as f64,
                    length: 2.0 * (1.0 + i as f64),
                    weight: 100.0,
                }),
                ..Dinosaur::default()
            };
            (key, dinosaur)
        });
        TreeCache::with_entries(dinosaur_config(), Default::default(), entries)
    }

    /// A snapshot in the shape the remote store sends for the base path.
    pub fn snapshot_text() -> String {
        serde_json::json!({
            "lambeosaurus": {
                "order": "ornithischia",
                "appeared": 1914,
                "dims": {"Height": 2.1, "Length": 12.5, "Weight": 5000}
            },
            "stegosaurus": {
                "order": "ornithischia",
                "appeared": 1877,
                "dims": {"Height": 4, "Length": 9, "Weight": 2500}
            }
        })
        .to_string()
    }
}
