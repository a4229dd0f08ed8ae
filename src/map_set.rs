//! Key to set-of-values store.

use std::borrow::Borrow;
use std::collections::BTreeSet;
use std::ops::Deref;

use crate::map::SparseMap;

/// Maps each key to an ordered set of values.
///
/// A key's set is created on the first `put` for it and removed with it; a
/// key whose last value is removed through [`remove_value`](Self::remove_value)
/// disappears as well.
pub struct SparseMapSet<K, V> {
    map: SparseMap<K, BTreeSet<V>>,
}

impl<K, V> SparseMapSet<K, V>
where
    K: Ord + Clone,
    V: Ord + Clone,
{
    pub fn new() -> Self {
        Self {
            map: SparseMap::new(),
        }
    }

    /// Add `value` to the set under `key`, returning whether it was new.
    pub fn put(&self, key: K, value: V) -> bool {
        self.map.write().entry(key).or_default().insert(value)
    }

    /// Add every value under `key`; returns how many were new.
    pub fn put_all(&self, key: K, values: impl IntoIterator<Item = V>) -> usize {
        let _guard = self.map.compound();
        let mut map = self.map.write();
        let set = map.entry(key).or_default();
        values.into_iter().filter(|v| set.insert(v.clone())).count()
    }

    pub fn contains<Q>(&self, key: &Q, value: &V) -> bool
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.map
            .read()
            .get(key)
            .is_some_and(|set| set.contains(value))
    }

    /// Remove the whole set under `key`.
    pub fn remove<Q>(&self, key: &Q) -> Option<BTreeSet<V>>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.map.remove(key).map(|(_, set)| set)
    }

    /// Remove one value under `key`, returning whether it was present.
    pub fn remove_value<Q>(&self, key: &Q, value: &V) -> bool
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let mut map = self.map.write();
        let Some(set) = map.get_mut(key) else {
            return false;
        };
        let removed = set.remove(value);
        if set.is_empty() {
            map.remove(key);
        }
        removed
    }

    /// Total number of values across every key.
    pub fn value_count(&self) -> usize {
        self.map.read().values().map(BTreeSet::len).sum()
    }
}

impl<K, V> Deref for SparseMapSet<K, V> {
    type Target = SparseMap<K, BTreeSet<V>>;

    fn deref(&self) -> &SparseMap<K, BTreeSet<V>> {
        &self.map
    }
}

impl<K, V> Default for SparseMapSet<K, V>
where
    K: Ord + Clone,
    V: Ord + Clone,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K: std::fmt::Debug, V: std::fmt::Debug> std::fmt::Debug for SparseMapSet<K, V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Debug::fmt(&self.map, f)
    }
}
