//! Cache configuration.

/// Configuration for a [`TreeCache`](crate::TreeCache).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheConfig {
    /// Character separating path segments.
    pub separator: char,

    /// Whether empty segments (from repeated or trailing separators) are
    /// dropped while splitting a path.
    pub remove_empty_segments: bool,

    /// Location of the subscription in the remote tree.
    ///
    /// Patch paths starting with these segments have them stripped before
    /// the first remaining segment is taken as the entity key.
    pub base_path: Option<String>,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            separator: '/',
            remove_empty_segments: true,
            base_path: None,
        }
    }
}

impl CacheConfig {
    /// Creates a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the path separator.
    #[must_use]
    pub const fn separator(mut self, separator: char) -> Self {
        self.separator = separator;
        self
    }

    /// Sets whether empty segments are dropped.
    #[must_use]
    pub const fn remove_empty_segments(mut self, value: bool) -> Self {
        self.remove_empty_segments = value;
        self
    }

    /// Sets the subscription base path.
    #[must_use]
    pub fn base_path(mut self, path: impl Into<String>) -> Self {
        self.base_path = Some(path.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = CacheConfig::default();
        assert_eq!(config.separator, '/');
        assert!(config.remove_empty_segments);
        assert!(config.base_path.is_none());
    }

    #[test]
    fn builder_pattern() {
        let config = CacheConfig::new()
            .separator('.')
            .remove_empty_segments(false)
            .base_path("dinosaurs");

        assert_eq!(config.separator, '.');
        assert!(!config.remove_empty_segments);
        assert_eq!(config.base_path.as_deref(), Some("dinosaurs"));
    }
}
