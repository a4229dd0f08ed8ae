//! Ordered sparse map foundation shared by every store in the crate.
//!
//! [`SparseMap`] wraps an ordered map behind a read-write lock so single-key
//! operations and directional walks are safe from many threads. Compound
//! operations (bulk puts and removes, the grid's evict-then-insert) also hold
//! a reentrant mutex for their whole sequence, which serializes them against
//! each other but not against readers.
//!
//! The map exposes only reads and walks publicly; each store layers its own
//! mutation rules on top.

use std::borrow::Borrow;
use std::collections::BTreeMap;
use std::fmt;
use std::ops::Bound;

use parking_lot::{
    ReentrantMutex, ReentrantMutexGuard, RwLock, RwLockReadGuard, RwLockWriteGuard,
};

use crate::error::{Error, Result};

/// Boundary control for a directional walk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Walk {
    /// Whether the walk may start at the key itself.
    pub inclusive: bool,
    /// Whether the key that triggers the stop predicate is dropped even when
    /// it satisfies the include predicate.
    pub exclude_stop: bool,
}

impl Walk {
    pub const INCLUSIVE: Walk = Walk {
        inclusive: true,
        exclude_stop: true,
    };

    pub const EXCLUSIVE: Walk = Walk {
        inclusive: false,
        exclude_stop: true,
    };

    /// Keep the stopping key when it satisfies the include predicate.
    pub const fn keep_stop(self) -> Self {
        Self {
            exclude_stop: false,
            ..self
        }
    }
}

impl Default for Walk {
    fn default() -> Self {
        Self::INCLUSIVE
    }
}

/// A concurrent ordered map with predicate-driven directional walks.
pub struct SparseMap<K, V> {
    inner: RwLock<BTreeMap<K, V>>,
    compound: ReentrantMutex<()>,
}

impl<K, V> SparseMap<K, V>
where
    K: Ord + Clone,
    V: Clone,
{
    pub fn new() -> Self {
        Self::from_map(BTreeMap::new())
    }

    pub fn from_map(map: BTreeMap<K, V>) -> Self {
        Self {
            inner: RwLock::new(map),
            compound: ReentrantMutex::new(()),
        }
    }

    pub fn len(&self) -> usize {
        self.inner.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.read().is_empty()
    }

    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.inner.read().contains_key(key)
    }

    /// The value stored under `key`, or `None` when the key is absent.
    pub fn get<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.inner.read().get(key).cloned()
    }

    /// The value stored under `key`, or `default` when the key is absent.
    pub fn get_or<Q>(&self, key: &Q, default: V) -> V
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.get(key).unwrap_or(default)
    }

    pub fn lowest(&self) -> Option<K> {
        self.inner.read().keys().next().cloned()
    }

    pub fn highest(&self) -> Option<K> {
        self.inner.read().keys().next_back().cloned()
    }

    /// The `index`-th key in ascending order.
    ///
    /// # Errors
    ///
    /// [`Error::IndexOutOfRange`] when `index >= len`.
    pub fn key_at(&self, index: usize) -> Result<K> {
        let map = self.inner.read();
        map.keys()
            .nth(index)
            .cloned()
            .ok_or(Error::IndexOutOfRange {
                index,
                len: map.len(),
            })
    }

    /// Ordered snapshot of every key.
    pub fn keys(&self) -> Vec<K> {
        self.inner.read().keys().cloned().collect()
    }

    /// Ordered snapshot of every entry.
    pub fn iter(&self) -> std::vec::IntoIter<(K, V)> {
        let entries: Vec<(K, V)> = self
            .inner
            .read()
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        entries.into_iter()
    }

    pub fn to_map(&self) -> BTreeMap<K, V> {
        self.inner.read().clone()
    }

    /// Entries for exactly `keys`, in the order requested. Absent keys are skipped.
    pub fn entries<'a, Q>(&self, keys: impl IntoIterator<Item = &'a Q>) -> Vec<(K, V)>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized + 'a,
    {
        let map = self.inner.read();
        keys.into_iter()
            .filter_map(|key| map.get_key_value(key))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    /// Snapshot of the entries below `key` (and at it, when `inclusive`).
    pub fn head_map<Q>(&self, key: &Q, inclusive: bool) -> BTreeMap<K, V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let end = if inclusive {
            Bound::Included(key)
        } else {
            Bound::Excluded(key)
        };
        self.inner
            .read()
            .range::<Q, _>((Bound::Unbounded, end))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    /// Snapshot of the entries above `key` (and at it, when `inclusive`).
    pub fn tail_map<Q>(&self, key: &Q, inclusive: bool) -> BTreeMap<K, V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let start = if inclusive {
            Bound::Included(key)
        } else {
            Bound::Excluded(key)
        };
        self.inner
            .read()
            .range::<Q, _>((start, Bound::Unbounded))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    // =========================================================================
    // Directional walks
    // =========================================================================

    /// Every key below `key` (and `key` itself when `inclusive`), descending.
    pub fn lower<Q>(&self, key: &Q, inclusive: bool) -> Vec<K>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let walk = Walk {
            inclusive,
            ..Walk::default()
        };
        self.lower_with(key, walk, |_| true, |_| false)
    }

    /// Every key above `key` (and `key` itself when `inclusive`), ascending.
    pub fn higher<Q>(&self, key: &Q, inclusive: bool) -> Vec<K>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let walk = Walk {
            inclusive,
            ..Walk::default()
        };
        self.higher_with(key, walk, |_| true, |_| false)
    }

    /// Walk descending keys from `key`, collecting those passing `include`
    /// until one passes `stop`.
    pub fn lower_with<Q>(
        &self,
        key: &Q,
        walk: Walk,
        include: impl FnMut(&K) -> bool,
        stop: impl FnMut(&K) -> bool,
    ) -> Vec<K>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let end = if walk.inclusive {
            Bound::Included(key)
        } else {
            Bound::Excluded(key)
        };
        let map = self.inner.read();
        let keys = map.range::<Q, _>((Bound::Unbounded, end)).rev().map(|(k, _)| k);
        collect_walk(keys, walk, include, stop)
    }

    /// Walk ascending keys from `key`, collecting those passing `include`
    /// until one passes `stop`.
    pub fn higher_with<Q>(
        &self,
        key: &Q,
        walk: Walk,
        include: impl FnMut(&K) -> bool,
        stop: impl FnMut(&K) -> bool,
    ) -> Vec<K>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let start = if walk.inclusive {
            Bound::Included(key)
        } else {
            Bound::Excluded(key)
        };
        let map = self.inner.read();
        let keys = map.range::<Q, _>((start, Bound::Unbounded)).map(|(k, _)| k);
        collect_walk(keys, walk, include, stop)
    }

    /// Walk every key from the lowest, ascending.
    pub fn ascend_with(
        &self,
        walk: Walk,
        include: impl FnMut(&K) -> bool,
        stop: impl FnMut(&K) -> bool,
    ) -> Vec<K> {
        let map = self.inner.read();
        collect_walk(map.keys(), walk, include, stop)
    }

    // =========================================================================
    // Mutation, for the stores built on top
    // =========================================================================

    pub(crate) fn read(&self) -> RwLockReadGuard<'_, BTreeMap<K, V>> {
        self.inner.read()
    }

    pub(crate) fn write(&self) -> RwLockWriteGuard<'_, BTreeMap<K, V>> {
        self.inner.write()
    }

    /// Hold for the duration of a compound operation.
    pub(crate) fn compound(&self) -> ReentrantMutexGuard<'_, ()> {
        self.compound.lock()
    }

    pub(crate) fn insert(&self, key: K, value: V) -> Option<V> {
        self.inner.write().insert(key, value)
    }

    pub(crate) fn remove<Q>(&self, key: &Q) -> Option<(K, V)>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.inner.write().remove_entry(key)
    }

    pub(crate) fn clear(&self) {
        self.inner.write().clear();
    }
}

fn collect_walk<'a, K: Clone + 'a>(
    keys: impl Iterator<Item = &'a K>,
    walk: Walk,
    mut include: impl FnMut(&K) -> bool,
    mut stop: impl FnMut(&K) -> bool,
) -> Vec<K> {
    let mut out = Vec::new();
    for key in keys {
        if stop(key) {
            if !walk.exclude_stop && include(key) {
                out.push(key.clone());
            }
            break;
        }
        if include(key) {
            out.push(key.clone());
        }
    }
    out
}

impl<K, V> Default for SparseMap<K, V>
where
    K: Ord + Clone,
    V: Clone,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> From<BTreeMap<K, V>> for SparseMap<K, V>
where
    K: Ord + Clone,
    V: Clone,
{
    fn from(map: BTreeMap<K, V>) -> Self {
        Self::from_map(map)
    }
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for SparseMap<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.inner.read().iter()).finish()
    }
}
