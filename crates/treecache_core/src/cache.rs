//! The cache facade.

use crate::change::{Changes, Emission};
use crate::config::CacheConfig;
use crate::error::{CacheError, CacheResult};
use crate::merge::MergeEngine;
use crate::path::{PatchPath, PathResolver};
use crate::schema::NodeType;
use indexmap::IndexMap;
use tracing::debug;
use treecache_codec::{decode_entries, is_deletion, JsonCodec, PayloadCodec};

/// An insertion-ordered mirror of a remote tree, keyed by top-level entity.
///
/// Patches are applied one at a time with [`apply_patch`](Self::apply_patch).
/// Each patch first runs against a draft of the entity it touches and is
/// committed only if it succeeds, so a rejected patch leaves the cache as
/// it was.
///
/// # Example
///
/// ```
/// use treecache_core::{CacheConfig, Document, TreeCache};
///
/// let config = CacheConfig::new().base_path("zoo");
/// let mut cache: TreeCache<Document> = TreeCache::with_config(config);
///
/// let changes: Vec<_> = cache
///     .apply_patch("/zoo/lion/age", "7")
///     .unwrap()
///     .collect();
/// assert_eq!(changes[0].key(), "lion");
/// assert_eq!(changes[0].value(), Some(&serde_json::json!({"age": 7})));
///
/// cache.apply_patch("/zoo/lion", "").unwrap().for_each(drop);
/// assert!(!cache.contains("lion"));
/// ```
#[derive(Debug, Clone)]
pub struct TreeCache<T, C = JsonCodec> {
    entries: IndexMap<String, T>,
    resolver: PathResolver,
    codec: C,
    config: CacheConfig,
}

impl<T: NodeType> TreeCache<T> {
    /// Creates an empty cache with the default configuration.
    pub fn new() -> Self {
        Self::with_config(CacheConfig::default())
    }

    /// Creates an empty cache decoding JSON payloads.
    pub fn with_config(config: CacheConfig) -> Self {
        Self::with_codec(config, JsonCodec::new())
    }
}

impl<T: NodeType> Default for TreeCache<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: NodeType> FromIterator<(String, T)> for TreeCache<T> {
    fn from_iter<I: IntoIterator<Item = (String, T)>>(iter: I) -> Self {
        Self::with_entries(CacheConfig::default(), JsonCodec::new(), iter)
    }
}

impl<T: NodeType, C: PayloadCodec> TreeCache<T, C> {
    /// Creates an empty cache decoding payloads with `codec`.
    pub fn with_codec(config: CacheConfig, codec: C) -> Self {
        Self::with_entries(config, codec, std::iter::empty())
    }

    /// Creates a cache pre-populated with `entries`.
    pub fn with_entries<I>(config: CacheConfig, codec: C, entries: I) -> Self
    where
        I: IntoIterator<Item = (String, T)>,
    {
        Self {
            entries: entries.into_iter().collect(),
            resolver: PathResolver::from_config(&config),
            codec,
            config,
        }
    }

    /// Loads a full snapshot without emitting changes.
    ///
    /// `snapshot` is decoded like a batch at the root: every entry replaces
    /// the value under its key and `null` entries remove theirs. Returns
    /// the number of entries in the snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::PayloadDecode`] if any entry fails to decode,
    /// in which case nothing is loaded.
    pub fn seed(&mut self, snapshot: &str) -> CacheResult<usize> {
        let entries = decode_entries::<T, C>(&self.codec, snapshot)
            .map_err(|e| CacheError::payload_decode(&PatchPath::root(), e))?;
        let count = entries.len();
        for (key, value) in entries {
            self.upsert(key, value);
        }
        debug!(entries = count, total = self.entries.len(), "seeded cache");
        Ok(count)
    }

    /// Returns the configuration the cache was built with.
    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    /// Returns the payload codec.
    pub fn codec(&self) -> &C {
        &self.codec
    }

    /// Returns the path resolver.
    pub fn resolver(&self) -> &PathResolver {
        &self.resolver
    }

    /// Returns true if a top-level entity exists under `key`.
    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Returns the top-level entity under `key`.
    pub fn get(&self, key: &str) -> Option<&T> {
        self.entries.get(key)
    }

    /// Returns the number of top-level entities.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the cache holds no entities.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the top-level keys in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> + '_ {
        self.entries.keys().map(String::as_str)
    }

    /// Returns the entities in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &T)> + '_ {
        self.entries.iter().map(|(key, value)| (key.as_str(), value))
    }

    /// Consumes the cache, returning its entities.
    pub fn into_entries(self) -> IndexMap<String, T> {
        self.entries
    }

    /// Applies one patch and returns the records it produced.
    ///
    /// `path` is resolved against the configured separator and base path.
    /// An empty, blank or `null` payload deletes the addressed node.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::PathResolution`] if the path does not lead to
    /// a slot, and [`CacheError::PayloadDecode`] if the payload does not
    /// fit the slot. Either way the cache is unchanged.
    pub fn apply_patch(&mut self, path: &str, payload: &str) -> CacheResult<Changes<'_, T>> {
        let resolved = self.resolver.resolve(path);
        let emissions = self.apply_resolved(&resolved, payload).inspect_err(|e| {
            debug!(path = %resolved, error = %e, "rejected patch");
        })?;
        debug!(
            path = %resolved,
            segments = resolved.len(),
            records = emissions.len(),
            "applied patch"
        );
        Ok(Changes::new(&self.entries, emissions))
    }

    fn apply_resolved(&mut self, path: &PatchPath, payload: &str) -> CacheResult<Vec<Emission>> {
        let Some(key) = path.entity_key() else {
            return self.apply_root(payload);
        };

        if path.nested().is_empty() && is_deletion(payload) {
            self.entries.shift_remove(key);
            return Ok(vec![Emission::Removed(key.to_owned())]);
        }

        let mut draft = self.entries.get(key).cloned().unwrap_or_default();
        MergeEngine::new(&self.codec).apply(&mut draft, path, payload)?;
        self.entries.insert(key.to_owned(), draft);
        Ok(vec![Emission::Updated(key.to_owned())])
    }

    fn apply_root(&mut self, payload: &str) -> CacheResult<Vec<Emission>> {
        if is_deletion(payload) {
            return Ok(self
                .entries
                .drain(..)
                .map(|(key, _)| Emission::Removed(key))
                .collect());
        }

        let entries = decode_entries::<T, C>(&self.codec, payload)
            .map_err(|e| CacheError::payload_decode(&PatchPath::root(), e))?;
        Ok(entries
            .into_iter()
            .map(|(key, value)| self.upsert(key, value))
            .collect())
    }

    fn upsert(&mut self, key: String, value: Option<T>) -> Emission {
        match value {
            Some(value) => {
                self.entries.insert(key.clone(), value);
                Emission::Updated(key)
            }
            None => {
                self.entries.shift_remove(&key);
                Emission::Removed(key)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ChangeRecord;
    use serde::{Deserialize, Serialize};
    use serde_json::json;
    use std::collections::BTreeMap;
    use treecache_codec::Document;

    #[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
    #[serde(default)]
    struct Dino {
        #[serde(rename = "Height")]
        height: f64,
        #[serde(rename = "Order")]
        order: String,
    }

    crate::record!(Dino { height, order });

    fn apply<T: NodeType, C: PayloadCodec>(
        cache: &mut TreeCache<T, C>,
        path: &str,
        payload: &str,
    ) -> CacheResult<Vec<ChangeRecord<T>>> {
        cache.apply_patch(path, payload).map(Iterator::collect)
    }

    fn dino(height: f64) -> Dino {
        Dino {
            height,
            ..Dino::default()
        }
    }

    #[test]
    fn entity_upsert_and_delete() {
        let mut cache = TreeCache::<Dino>::with_config(CacheConfig::new().base_path("dinosaurs"));

        let records = apply(&mut cache, "dinosaurs/trex", r#"{"Height":5.2}"#).unwrap();
        assert_eq!(records, vec![ChangeRecord::updated("trex", dino(5.2))]);
        assert!(cache.contains("trex"));

        let records = apply(&mut cache, "dinosaurs/trex", "").unwrap();
        assert_eq!(records, vec![ChangeRecord::removed("trex")]);
        assert!(!cache.contains("trex"));
        assert!(cache.is_empty());
    }

    #[test]
    fn nested_patch_reports_the_entity() {
        let mut cache = TreeCache::<Dino>::new();
        apply(&mut cache, "trex", r#"{"Height":5.2,"Order":"theropoda"}"#).unwrap();

        let records = apply(&mut cache, "trex/order", "saurischia").unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].key(), "trex");
        assert_eq!(records[0].value().unwrap().order, "saurischia");
        assert_eq!(records[0].value().unwrap().height, 5.2);

        let records = apply(&mut cache, "trex/order", "null").unwrap();
        assert_eq!(records, vec![ChangeRecord::updated("trex", dino(5.2))]);
    }

    #[test]
    fn root_batch_upserts_every_entry() {
        let mut cache = TreeCache::<Dino>::new();
        apply(&mut cache, "old", r#"{"Height":1}"#).unwrap();

        let records = apply(
            &mut cache,
            "/",
            r#"{"stego":{"Height":4},"old":null,"raptor":{"Height":0.5}}"#,
        )
        .unwrap();
        let keys: Vec<_> = records.iter().map(ChangeRecord::key).collect();
        assert_eq!(keys, vec!["stego", "old", "raptor"]);
        assert!(records[1].is_removal());
        assert_eq!(cache.keys().collect::<Vec<_>>(), vec!["stego", "raptor"]);
    }

    #[test]
    fn root_deletion_clears() {
        let mut cache: TreeCache<u32> = [("a".to_owned(), 1), ("b".to_owned(), 2)]
            .into_iter()
            .collect();
        let records = apply(&mut cache, "", "null").unwrap();
        assert_eq!(
            records,
            vec![ChangeRecord::removed("a"), ChangeRecord::removed("b")]
        );
        assert!(cache.is_empty());
    }

    #[test]
    fn failed_patch_leaves_cache_unchanged() {
        let mut cache = TreeCache::<Dino>::new();
        apply(&mut cache, "trex", r#"{"Height":5.2}"#).unwrap();
        let before = cache.clone().into_entries();

        let err = apply(&mut cache, "trex/wings", "2").unwrap_err();
        assert!(err.is_path_resolution());
        let err = apply(&mut cache, "trex/height", "tall").unwrap_err();
        assert!(err.is_payload_decode());
        let err = apply(&mut cache, "", r#"{"a":{"Height":1},"b":{"Height":"x"}}"#).unwrap_err();
        assert!(err.is_payload_decode());
        let err = apply(&mut cache, "raptor/wings", "2").unwrap_err();
        assert_eq!(err.path(), "raptor/wings");

        assert_eq!(cache.clone().into_entries(), before);
        assert!(!cache.contains("raptor"));
    }

    #[test]
    fn dynamic_maps_auto_create() {
        let mut cache: TreeCache<BTreeMap<String, BTreeMap<String, u32>>> = TreeCache::new();
        let records = apply(&mut cache, "a/b/c", "3").unwrap();
        assert_eq!(records[0].key(), "a");
        assert_eq!(cache.get("a").unwrap()["b"]["c"], 3);
    }

    #[test]
    fn seed_loads_without_changes() {
        let mut cache: TreeCache<Document> = TreeCache::new();
        let count = cache.seed(r#"{"x":{"n":1},"y":2}"#).unwrap();
        assert_eq!(count, 2);
        assert_eq!(cache.get("x"), Some(&json!({"n": 1})));
        assert!(cache.seed("[1]").is_err());
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn changes_are_lazy_and_exact() {
        let mut cache = TreeCache::<u32>::new();
        let changes = cache.apply_patch("", r#"{"a":1,"b":2,"c":3}"#).unwrap();
        assert_eq!(changes.len(), 3);
        drop(changes);
        assert_eq!(cache.iter().map(|(_, v)| *v).sum::<u32>(), 6);
    }
}
