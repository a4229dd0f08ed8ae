//! Exact-key store with prior-value reporting.

use std::borrow::Borrow;
use std::collections::BTreeMap;
use std::ops::Deref;

use crate::map::SparseMap;

/// An ordered map keyed by exact keys.
///
/// `put` reports what was there before: `None` when the key was absent, the
/// prior value otherwise, even when that value is itself "empty" (for
/// example `Some(None)` when `V = Option<_>`).
pub struct SparseStore<K, V> {
    map: SparseMap<K, V>,
}

impl<K, V> SparseStore<K, V>
where
    K: Ord + Clone,
    V: Clone,
{
    pub fn new() -> Self {
        Self {
            map: SparseMap::new(),
        }
    }

    /// Insert a key-value pair.
    ///
    /// Returns the previous value if the key already existed.
    pub fn put(&self, key: K, value: V) -> Option<V> {
        self.map.insert(key, value)
    }

    /// Insert every entry as one compound operation.
    ///
    /// Returns the replaced entries, in insertion order.
    pub fn put_all(&self, entries: impl IntoIterator<Item = (K, V)>) -> Vec<(K, V)> {
        let _guard = self.map.compound();
        let mut replaced = Vec::new();
        for (key, value) in entries {
            if let Some(prior) = self.map.insert(key.clone(), value) {
                replaced.push((key, prior));
            }
        }
        tracing::trace!(replaced = replaced.len(), "store put_all");
        replaced
    }

    /// Remove a key, returning its value if it existed.
    pub fn remove<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.map.remove(key).map(|(_, v)| v)
    }

    /// Remove every key as one compound operation, returning the removed entries.
    pub fn remove_all<'a, Q>(&self, keys: impl IntoIterator<Item = &'a Q>) -> Vec<(K, V)>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized + 'a,
    {
        let _guard = self.map.compound();
        keys.into_iter().filter_map(|key| self.map.remove(key)).collect()
    }

    pub fn clear(&self) {
        self.map.clear();
    }
}

impl<K, V> Deref for SparseStore<K, V> {
    type Target = SparseMap<K, V>;

    fn deref(&self) -> &SparseMap<K, V> {
        &self.map
    }
}

impl<K, V> Default for SparseStore<K, V>
where
    K: Ord + Clone,
    V: Clone,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> From<BTreeMap<K, V>> for SparseStore<K, V>
where
    K: Ord + Clone,
    V: Clone,
{
    fn from(map: BTreeMap<K, V>) -> Self {
        Self {
            map: SparseMap::from_map(map),
        }
    }
}

impl<K, V> FromIterator<(K, V)> for SparseStore<K, V>
where
    K: Ord + Clone,
    V: Clone,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self::from(iter.into_iter().collect::<BTreeMap<K, V>>())
    }
}

impl<K: std::fmt::Debug, V: std::fmt::Debug> std::fmt::Debug for SparseStore<K, V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Debug::fmt(&self.map, f)
    }
}
