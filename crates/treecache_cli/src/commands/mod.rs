//! CLI command implementations.

pub mod log;
pub mod replay;
pub mod split;
pub mod verify;

use treecache_core::{CacheConfig, Document, TreeCache};

/// Path handling options shared by every command.
#[derive(Debug, Clone, Default)]
pub struct PathOptions {
    /// Subscription base path stripped from patch paths.
    pub base_path: Option<String>,
    /// Keep empty segments instead of dropping them.
    pub keep_empty_segments: bool,
}

impl PathOptions {
    /// Builds the cache configuration these options describe.
    pub fn config(&self) -> CacheConfig {
        let mut config = CacheConfig::new().remove_empty_segments(!self.keep_empty_segments);
        if let Some(base) = &self.base_path {
            config = config.base_path(base.clone());
        }
        config
    }

    /// Creates an empty schemaless cache.
    pub fn cache(&self) -> TreeCache<Document> {
        TreeCache::with_config(self.config())
    }
}
