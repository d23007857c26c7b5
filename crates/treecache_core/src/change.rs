//! Change records emitted by patch application.
//!
//! Applying a patch mutates the cache eagerly but reports lazily: the
//! returned [`Changes`] iterator only remembers which keys were touched,
//! and clones each entity's new value as the record for it is pulled.

use indexmap::IndexMap;
use serde::Serialize;
use std::iter::FusedIterator;
use std::vec;

/// The new state of one top-level entity after a patch.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChangeRecord<T> {
    /// Key of the top-level entity.
    pub key: String,
    /// Its value after the patch, or `None` if it was removed.
    pub value: Option<T>,
}

impl<T> ChangeRecord<T> {
    /// Creates an update record.
    pub fn updated(key: impl Into<String>, value: T) -> Self {
        Self {
            key: key.into(),
            value: Some(value),
        }
    }

    /// Creates a removal record.
    pub fn removed(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: None,
        }
    }

    /// Returns the entity key.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Returns the new value, if the entity still exists.
    pub fn value(&self) -> Option<&T> {
        self.value.as_ref()
    }

    /// Returns true if the entity was removed.
    pub fn is_removal(&self) -> bool {
        self.value.is_none()
    }

    /// Splits the record into key and value.
    pub fn into_parts(self) -> (String, Option<T>) {
        (self.key, self.value)
    }
}

/// What happened to one key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Emission {
    Updated(String),
    Removed(String),
}

/// Records produced by one patch, in emission order.
///
/// Borrows the cache; drop it before applying the next patch.
#[must_use = "changes are computed lazily; iterate them or drop them explicitly"]
#[derive(Debug)]
pub struct Changes<'a, T> {
    entries: &'a IndexMap<String, T>,
    pending: vec::IntoIter<Emission>,
}

impl<'a, T> Changes<'a, T> {
    pub(crate) fn new(entries: &'a IndexMap<String, T>, pending: Vec<Emission>) -> Self {
        Self {
            entries,
            pending: pending.into_iter(),
        }
    }

    /// Returns true if no records remain.
    pub fn is_empty(&self) -> bool {
        self.pending.len() == 0
    }
}

impl<T: Clone> Iterator for Changes<'_, T> {
    type Item = ChangeRecord<T>;

    fn next(&mut self) -> Option<Self::Item> {
        Some(match self.pending.next()? {
            // An updated key may have been removed by a later entry of the
            // same batch; report what the cache now holds.
            Emission::Updated(key) => match self.entries.get(&key) {
                Some(value) => ChangeRecord::updated(key, value.clone()),
                None => ChangeRecord::removed(key),
            },
            Emission::Removed(key) => ChangeRecord::removed(key),
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.pending.size_hint()
    }
}

impl<T: Clone> ExactSizeIterator for Changes<'_, T> {}

impl<T: Clone> FusedIterator for Changes<'_, T> {}

#[cfg(test)]
mod tests {
    use super::*;

    fn entries() -> IndexMap<String, u32> {
        let mut entries = IndexMap::new();
        entries.insert("a".to_owned(), 1);
        entries.insert("b".to_owned(), 2);
        entries
    }

    #[test]
    fn records_are_cloned_on_demand() {
        let entries = entries();
        let mut changes = Changes::new(
            &entries,
            vec![
                Emission::Updated("b".into()),
                Emission::Removed("c".into()),
            ],
        );
        assert_eq!(changes.len(), 2);
        assert_eq!(changes.next(), Some(ChangeRecord::updated("b", 2)));
        assert!(!changes.is_empty());
        assert_eq!(changes.next(), Some(ChangeRecord::removed("c")));
        assert!(changes.is_empty());
        assert_eq!(changes.next(), None);
    }

    #[test]
    fn updated_but_absent_reports_removal() {
        let entries = entries();
        let records: Vec<_> = Changes::new(&entries, vec![Emission::Updated("z".into())]).collect();
        assert!(records[0].is_removal());
        assert_eq!(records[0].key(), "z");
    }

    #[test]
    fn record_accessors() {
        let record = ChangeRecord::updated("trex", 5);
        assert_eq!(record.value(), Some(&5));
        assert!(!record.is_removal());
        assert_eq!(record.into_parts(), ("trex".to_owned(), Some(5)));
    }

    #[test]
    fn records_serialize() {
        let record = ChangeRecord::<u32>::removed("trex");
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json, serde_json::json!({"key": "trex", "value": null}));
    }
}
