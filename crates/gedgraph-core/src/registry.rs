//! Insertion-ordered, id-keyed record registry

use std::collections::HashMap;

/// Position of a record in its [`Registry`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Handle(usize);

/// Records keyed by id, iterated in first-insertion order
///
/// Inserting an id that already exists replaces the record in place
/// (last write wins) and keeps its original position.
#[derive(Debug, Clone)]
pub struct Registry<T> {
    index: HashMap<String, usize>,
    records: Vec<T>,
}

impl<T> Registry<T> {
    pub fn new() -> Self {
        Self {
            index: HashMap::new(),
            records: Vec::new(),
        }
    }

    /// Register a record, replacing any earlier one with the same id
    pub fn insert(&mut self, id: impl Into<String>, record: T) -> Handle {
        let id = id.into();
        if let Some(&pos) = self.index.get(&id) {
            tracing::debug!("Replacing earlier record with duplicate id {}", id);
            self.records[pos] = record;
            return Handle(pos);
        }
        let pos = self.records.len();
        self.records.push(record);
        self.index.insert(id, pos);
        Handle(pos)
    }

    pub fn get(&self, id: &str) -> Option<&T> {
        self.index.get(id).map(|&pos| &self.records[pos])
    }

    pub fn get_mut(&mut self, handle: Handle) -> Option<&mut T> {
        self.records.get_mut(handle.0)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.records.iter()
    }
}

impl<T> Default for Registry<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a, T> IntoIterator for &'a Registry<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
