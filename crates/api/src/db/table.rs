//! Insertion-ordered keyed table.
//!
//! Lookups go through a hash index; iteration follows insertion order, which
//! is the order every listing endpoint returns.

use std::collections::HashMap;
use std::hash::Hash;

/// A map that remembers insertion order.
#[derive(Debug, Clone)]
pub struct Table<K, V> {
    index: HashMap<K, usize>,
    rows: Vec<(K, V)>,
}

impl<K: Clone + Eq + Hash, V> Table<K, V> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            index: HashMap::new(),
            rows: Vec::new(),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    #[must_use]
    pub fn get(&self, key: &K) -> Option<&V> {
        let pos = *self.index.get(key)?;
        self.rows.get(pos).map(|(_, v)| v)
    }

    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        let pos = *self.index.get(key)?;
        self.rows.get_mut(pos).map(|(_, v)| v)
    }

    #[must_use]
    pub fn contains_key(&self, key: &K) -> bool {
        self.index.contains_key(key)
    }

    /// Insert or replace. A replaced row keeps its original position.
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        if let Some(slot) = self.get_mut(&key) {
            return Some(std::mem::replace(slot, value));
        }
        self.index.insert(key.clone(), self.rows.len());
        self.rows.push((key, value));
        None
    }

    /// Remove a row, keeping the relative order of the rest.
    pub fn remove(&mut self, key: &K) -> Option<V> {
        let pos = self.index.remove(key)?;
        let (_, value) = self.rows.remove(pos);
        self.reindex_from(pos);
        Some(value)
    }

    /// Remove every row matching `pred`. Returns how many were removed.
    pub fn remove_where(&mut self, mut pred: impl FnMut(&V) -> bool) -> usize {
        let before = self.rows.len();
        self.rows.retain(|(_, v)| !pred(v));
        let removed = before - self.rows.len();
        if removed > 0 {
            self.index.clear();
            self.reindex_from(0);
        }
        removed
    }

    /// Values in insertion order.
    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.rows.iter().map(|(_, v)| v)
    }

    fn reindex_from(&mut self, start: usize) {
        for (pos, (key, _)) in self.rows.iter().enumerate().skip(start) {
            self.index.insert(key.clone(), pos);
        }
    }
}

impl<K: Clone + Eq + Hash, V> Default for Table<K, V> {
    fn default() -> Self {
        Self::new()
    }
}
