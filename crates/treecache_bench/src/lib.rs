//! Benchmark utilities.

#![warn(missing_docs)]

use serde_json::json;
use treecache_core::TreeCache;
use treecache_testkit::{dinosaur_cache, Dinosaur};

/// Builds a root batch payload of `count` dinosaurs.
pub fn batch_payload(count: usize) -> String {
    let entries: serde_json::Map<String, serde_json::Value> = (0..count)
        .map(|i| {
            (
                format!("dino_{}", i),
                json!({
                    "order": "theropoda",
                    "appeared": 1900 + i,
                    "dims": {"Height": 1.5, "Length": 4.0, "Weight": 900},
                    "tags": ["fast", "carnivore"],
                    "scores": {"ann": 3, "bob": 4}
                }),
            )
        })
        .collect();
    serde_json::Value::Object(entries).to_string()
}

/// Builds a dinosaur cache holding `count` entries.
pub fn populated_cache(count: usize) -> TreeCache<Dinosaur> {
    let mut cache = dinosaur_cache();
    cache
        .seed(&batch_payload(count))
        .expect("Failed to seed benchmark cache");
    cache
}

/// Builds a `/`-joined dynamic path `depth` segments deep under `key`.
pub fn deep_path(key: &str, depth: usize) -> String {
    let mut path = key.to_owned();
    for level in 0..depth {
        path.push_str(&format!("/level_{}", level));
    }
    path
}
