//! Per-session registry of field cells.

use ahash::AHashMap;
use fieldkit_core::FieldValue;
use tracing::trace;

use crate::reactive::ReactiveCell;
use crate::snapshot::Snapshot;

/// Insertion-ordered `name → cell` map. Names are unique and never removed.
#[derive(Debug, Default)]
pub struct FieldStore {
    order: Vec<(String, ReactiveCell<FieldValue>)>,
    index: AHashMap<String, usize>,
}

impl FieldStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The cell for `name`, created empty on first request.
    pub fn get_or_create(&mut self, name: &str) -> ReactiveCell<FieldValue> {
        if let Some(&slot) = self.index.get(name) {
            return self.order[slot].1.clone();
        }
        let cell = ReactiveCell::new();
        self.index.insert(name.to_owned(), self.order.len());
        self.order.push((name.to_owned(), cell.clone()));
        trace!(message = "store.register", field = name, fields = self.order.len());
        cell
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<ReactiveCell<FieldValue>> {
        self.index.get(name).map(|&slot| self.order[slot].1.clone())
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// `(name, cell)` pairs in registration order.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &ReactiveCell<FieldValue>)> {
        self.order.iter().map(|(name, cell)| (name.as_str(), cell))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Current value of every cell, in registration order.
    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        let mut snapshot = Snapshot::default();
        for (name, cell) in &self.order {
            snapshot.push(name.clone(), cell.get());
        }
        snapshot
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn get_or_create_is_idempotent() {
        let mut store = FieldStore::new();
        let first = store.get_or_create("email");
        let second = store.get_or_create("email");
        assert!(first.ptr_eq(&second));
        assert_eq!(store.len(), 1);
        assert_eq!(first.get(), None);
    }

    #[test]
    fn entries_keep_registration_order() {
        let mut store = FieldStore::new();
        for name in ["b", "a", "c", "a"] {
            let _ = store.get_or_create(name);
        }
        let names: Vec<_> = store.entries().map(|(name, _)| name).collect();
        assert_eq!(names, ["b", "a", "c"]);
    }

    #[test]
    fn get_does_not_create() {
        let mut store = FieldStore::new();
        assert!(store.get("x").is_none());
        assert!(store.is_empty());
        let cell = store.get_or_create("x");
        assert!(store.get("x").is_some_and(|c| c.ptr_eq(&cell)));
        assert!(store.contains("x"));
    }

    #[test]
    fn snapshot_reads_every_cell() {
        let mut store = FieldStore::new();
        store.get_or_create("name").set("Ada".into());
        let _ = store.get_or_create("empty");
        let snapshot = store.snapshot();
        assert_eq!(snapshot.names(), ["name", "empty"]);
        assert_eq!(
            snapshot.value("name").and_then(FieldValue::as_text),
            Some("Ada")
        );
        assert_eq!(snapshot.value("empty"), None);
    }
}
