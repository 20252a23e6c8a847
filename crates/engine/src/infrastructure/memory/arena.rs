//! Id-indexed record table.

use std::collections::BTreeMap;

/// One table of records keyed by their typed id.
///
/// Iteration is in ascending id order, which keeps listings deterministic.
#[derive(Debug)]
pub struct Arena<K, T> {
    slots: BTreeMap<K, T>,
}

impl<K: Ord + Copy, T> Arena<K, T> {
    pub fn new() -> Self {
        Self {
            slots: BTreeMap::new(),
        }
    }

    /// Insert or replace the record stored under `id`.
    pub fn insert(&mut self, id: K, value: T) -> Option<T> {
        self.slots.insert(id, value)
    }

    pub fn get(&self, id: K) -> Option<&T> {
        self.slots.get(&id)
    }

    pub fn get_mut(&mut self, id: K) -> Option<&mut T> {
        self.slots.get_mut(&id)
    }

    pub fn remove(&mut self, id: K) -> Option<T> {
        self.slots.remove(&id)
    }

    pub fn contains(&self, id: K) -> bool {
        self.slots.contains_key(&id)
    }

    pub fn values(&self) -> impl Iterator<Item = &T> {
        self.slots.values()
    }

    pub fn values_mut(&mut self) -> impl Iterator<Item = &mut T> {
        self.slots.values_mut()
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

impl<K: Ord + Copy, T> Default for Arena<K, T> {
    fn default() -> Self {
        Self::new()
    }
}
