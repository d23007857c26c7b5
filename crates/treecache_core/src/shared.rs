//! A cache shared between one writer and any number of readers.

use crate::cache::TreeCache;
use crate::change::ChangeRecord;
use crate::error::CacheResult;
use crate::schema::NodeType;
use parking_lot::RwLock;
use std::sync::Arc;
use treecache_codec::{JsonCodec, PayloadCodec};

/// A [`TreeCache`] behind a read-write lock.
///
/// Clones share the same cache. Each patch is applied under the write lock,
/// so readers only ever see the cache between patches.
#[derive(Debug)]
pub struct SharedCache<T, C = JsonCodec> {
    inner: Arc<RwLock<TreeCache<T, C>>>,
}

impl<T, C> Clone for SharedCache<T, C> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T: NodeType, C: PayloadCodec> SharedCache<T, C> {
    /// Wraps `cache` for sharing.
    pub fn new(cache: TreeCache<T, C>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(cache)),
        }
    }

    /// Applies one patch and collects its records.
    ///
    /// # Errors
    ///
    /// See [`TreeCache::apply_patch`].
    pub fn apply_patch(&self, path: &str, payload: &str) -> CacheResult<Vec<ChangeRecord<T>>> {
        let mut cache = self.inner.write();
        let records = cache.apply_patch(path, payload)?.collect();
        Ok(records)
    }

    /// Runs `f` with shared access to the cache.
    pub fn read<R>(&self, f: impl FnOnce(&TreeCache<T, C>) -> R) -> R {
        f(&self.inner.read())
    }

    /// Returns true if a top-level entity exists under `key`.
    pub fn contains(&self, key: &str) -> bool {
        self.inner.read().contains(key)
    }

    /// Returns a copy of the top-level entity under `key`.
    pub fn get_cloned(&self, key: &str) -> Option<T> {
        self.inner.read().get(key).cloned()
    }

    /// Returns the number of top-level entities.
    pub fn len(&self) -> usize {
        self.inner.read().len()
    }

    /// Returns true if the cache holds no entities.
    pub fn is_empty(&self) -> bool {
        self.inner.read().is_empty()
    }
}

impl<T: NodeType, C: PayloadCodec> From<TreeCache<T, C>> for SharedCache<T, C> {
    fn from(cache: TreeCache<T, C>) -> Self {
        Self::new(cache)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;
    use std::thread;

    type Counters = BTreeMap<String, u64>;

    #[test]
    fn clones_share_state() {
        let shared = SharedCache::new(TreeCache::<Counters>::new());
        let other = shared.clone();

        let records = shared.apply_patch("hits/home", "3").unwrap();
        assert_eq!(records.len(), 1);
        assert!(other.contains("hits"));
        assert_eq!(other.get_cloned("hits").unwrap()["home"], 3);
        assert_eq!(other.read(|cache| cache.len()), 1);
    }

    #[test]
    fn readers_see_whole_patches() {
        let shared: SharedCache<Counters> = TreeCache::new().into();
        let writer = {
            let shared = shared.clone();
            thread::spawn(move || {
                for n in 0..100 {
                    let payload = format!(r#"{{"a":{n},"b":{n}}}"#);
                    shared.apply_patch("pair", &payload).unwrap();
                }
            })
        };

        for _ in 0..100 {
            if let Some(pair) = shared.get_cloned("pair") {
                assert_eq!(pair.get("a"), pair.get("b"));
            }
        }
        writer.join().unwrap();
        assert_eq!(shared.get_cloned("pair").unwrap()["a"], 99);
    }
}
