//! Patch path splitting.
//!
//! Purely lexical: segments are not decoded and not checked against any
//! schema. Binding them to slots is the job of [`crate::binder`].

use crate::config::CacheConfig;
use std::fmt;

/// A patch path split into segments.
///
/// The empty path addresses the cache root. Otherwise the first segment is
/// the key of the top-level entity the patch belongs to.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct PatchPath {
    segments: Vec<String>,
}

impl PatchPath {
    /// The root path.
    pub fn root() -> Self {
        Self::default()
    }

    /// Builds a path from already split segments.
    pub fn from_segments<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            segments: segments.into_iter().map(Into::into).collect(),
        }
    }

    /// Returns true if this path addresses the cache root.
    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    /// Returns all segments.
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Returns the number of segments.
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Returns true if there are no segments.
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Key of the top-level entity, or `None` for the root.
    pub fn entity_key(&self) -> Option<&str> {
        self.segments.first().map(String::as_str)
    }

    /// Segments below the top-level entity.
    pub fn nested(&self) -> &[String] {
        self.segments.get(1..).unwrap_or_default()
    }
}

impl fmt::Display for PatchPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.segments.join("/"))
    }
}

/// Splits raw patch paths into [`PatchPath`]s.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathResolver {
    separator: char,
    remove_empty: bool,
    base: Vec<String>,
}

impl Default for PathResolver {
    fn default() -> Self {
        Self::new('/', true)
    }
}

impl PathResolver {
    /// Creates a resolver with no base path.
    pub fn new(separator: char, remove_empty: bool) -> Self {
        Self {
            separator,
            remove_empty,
            base: Vec::new(),
        }
    }

    /// Creates a resolver from a cache configuration.
    pub fn from_config(config: &CacheConfig) -> Self {
        let resolver = Self::new(config.separator, config.remove_empty_segments);
        match &config.base_path {
            Some(base) => resolver.with_base(base),
            None => resolver,
        }
    }

    /// Sets the base path stripped from every resolved path.
    ///
    /// The base is split with the same rules as patch paths.
    #[must_use]
    pub fn with_base(mut self, base: &str) -> Self {
        self.base = self.split(base);
        self
    }

    /// Returns the base path segments.
    pub fn base(&self) -> &[String] {
        &self.base
    }

    /// Splits a raw path into segments.
    ///
    /// One leading separator is always tolerated, so `""` and `"/"` both
    /// denote the root.
    pub fn split(&self, path: &str) -> Vec<String> {
        let trimmed = path.strip_prefix(self.separator).unwrap_or(path);
        if trimmed.is_empty() {
            return Vec::new();
        }
        trimmed
            .split(self.separator)
            .filter(|segment| !(self.remove_empty && segment.is_empty()))
            .map(str::to_owned)
            .collect()
    }

    /// Splits a raw path and strips the base path if it is a prefix.
    ///
    /// Paths are accepted both with and without the base, so the two are
    /// ambiguous when an entity key repeats the base. With base
    /// `dinosaurs`, the path `dinosaurs` always resolves to the root and an
    /// entity literally named `dinosaurs` is only reachable as
    /// `dinosaurs/dinosaurs`.
    pub fn resolve(&self, path: &str) -> PatchPath {
        let mut segments = self.split(path);
        if !self.base.is_empty() && segments.starts_with(&self.base) {
            segments.drain(..self.base.len());
        }
        PatchPath { segments }
    }
}
