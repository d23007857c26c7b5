//! Cross-crate integration test helpers.
//!
//! [`PatchHarness`] drives a cache with patches and keeps a second copy
//! of the data built only from the emitted change records, the way a
//! downstream subscriber would. After every patch the two must agree.

use crate::generators::Patch;
use indexmap::IndexMap;
use treecache_core::{CacheError, ChangeRecord, NodeType, TreeCache};

/// A test harness that replays patches and checks the change stream.
#[derive(Debug)]
pub struct PatchHarness<T> {
    /// The cache under test.
    pub cache: TreeCache<T>,
    mirror: IndexMap<String, T>,
    applied: usize,
    rejected: Vec<(Patch, CacheError)>,
}

impl<T: NodeType + PartialEq> PatchHarness<T> {
    /// Creates a harness around `cache`, mirroring its current contents.
    pub fn new(cache: TreeCache<T>) -> Self {
        let mirror = cache
            .iter()
            .map(|(key, value)| (key.to_owned(), value.clone()))
            .collect();
        Self {
            cache,
            mirror,
            applied: 0,
            rejected: Vec::new(),
        }
    }

    /// Applies one patch, feeding its records to the mirror.
    ///
    /// A rejected patch is recorded, not raised.
    pub fn apply(&mut self, patch: &Patch) -> Vec<ChangeRecord<T>> {
        match self.cache.apply_patch(&patch.path, &patch.data) {
            Ok(changes) => {
                let records: Vec<_> = changes.collect();
                for record in &records {
                    match &record.value {
                        Some(value) => {
                            self.mirror.insert(record.key.clone(), value.clone());
                        }
                        None => {
                            self.mirror.shift_remove(&record.key);
                        }
                    }
                }
                self.applied += 1;
                records
            }
            Err(err) => {
                self.rejected.push((patch.clone(), err));
                Vec::new()
            }
        }
    }

    /// Applies every patch in order.
    pub fn apply_all<'a>(&mut self, patches: impl IntoIterator<Item = &'a Patch>) {
        for patch in patches {
            self.apply(patch);
        }
    }

    /// Asserts that the records seen so far reproduce the cache.
    pub fn verify_mirror(&self) {
        assert_eq!(
            self.mirror.len(),
            self.cache.len(),
            "Mirror and cache hold different key counts"
        );
        for (key, value) in self.cache.iter() {
            assert_eq!(
                self.mirror.get(key),
                Some(value),
                "Mirror disagrees with cache for {:?}",
                key
            );
        }
    }

    /// Returns the number of applied patches.
    pub fn applied(&self) -> usize {
        self.applied
    }

    /// Returns the rejected patches with their errors.
    pub fn rejected(&self) -> &[(Patch, CacheError)] {
        &self.rejected
    }
}

impl<T: NodeType + PartialEq> Default for PatchHarness<T> {
    fn default() -> Self {
        Self::new(TreeCache::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{dinosaur_cache, Dinosaur};
    use treecache_core::Document;

    #[test]
    fn test_patch_harness() {
        let mut harness = PatchHarness::<Document>::default();
        harness.apply(&Patch::new("a/b", "1"));
        harness.apply(&Patch::new("a/b/c", "2"));
        harness.apply(&Patch::new("", r#"{"x":true,"y":false}"#));
        harness.apply(&Patch::delete("x"));

        assert_eq!(harness.applied(), 3);
        assert_eq!(harness.rejected().len(), 1);
        assert!(harness.rejected()[0].1.is_path_resolution());
        harness.verify_mirror();
    }

    #[test]
    fn test_dinosaur_stream() {
        let mut harness = PatchHarness::<Dinosaur>::new(dinosaur_cache());
        harness.apply_all(&[
            Patch::new("dinosaurs/trex/dims", r#"{"Height":5.2}"#),
            Patch::new("dinosaurs/trex/scores", r#"{"ann":4,"bob":5}"#),
            Patch::new("dinosaurs/trex/scores/ann", "null"),
            Patch::new("dinosaurs/trex/thumbnail", "AQID"),
        ]);
        assert!(harness.rejected().is_empty());
        harness.verify_mirror();

        let trex = harness.cache.get("trex").unwrap();
        assert_eq!(trex.scores.len(), 1);
        assert_eq!(trex.thumbnail.as_bytes(), &[1, 2, 3]);
    }
}
