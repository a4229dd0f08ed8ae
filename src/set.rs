//! Ordered set of unique elements.

use std::borrow::Borrow;
use std::ops::Deref;

use crate::map::SparseMap;

/// An ordered, concurrent set; elements are the keys of a [`SparseMap`].
pub struct SparseSet<E> {
    map: SparseMap<E, ()>,
}

impl<E> SparseSet<E>
where
    E: Ord + Clone,
{
    pub fn new() -> Self {
        Self {
            map: SparseMap::new(),
        }
    }

    /// Add an element, returning whether it was newly added.
    pub fn add(&self, element: E) -> bool {
        self.map.insert(element, ()).is_none()
    }

    /// Add every element as one compound operation; returns how many were new.
    pub fn add_all(&self, elements: impl IntoIterator<Item = E>) -> usize {
        let _guard = self.map.compound();
        elements.into_iter().filter(|e| self.add(e.clone())).count()
    }

    pub fn contains<Q>(&self, element: &Q) -> bool
    where
        E: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.map.contains_key(element)
    }

    /// Remove an element, returning whether it was present.
    pub fn remove<Q>(&self, element: &Q) -> bool
    where
        E: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.map.remove(element).is_some()
    }

    pub fn remove_all<'a, Q>(&self, elements: impl IntoIterator<Item = &'a Q>) -> usize
    where
        E: Borrow<Q>,
        Q: Ord + ?Sized + 'a,
    {
        let _guard = self.map.compound();
        elements.into_iter().filter(|e| self.remove(*e)).count()
    }

    pub fn first(&self) -> Option<E> {
        self.map.lowest()
    }

    pub fn last(&self) -> Option<E> {
        self.map.highest()
    }

    pub fn to_vec(&self) -> Vec<E> {
        self.map.keys()
    }
}

impl<E> Deref for SparseSet<E> {
    type Target = SparseMap<E, ()>;

    fn deref(&self) -> &SparseMap<E, ()> {
        &self.map
    }
}

impl<E: Ord + Clone> Default for SparseSet<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: Ord + Clone> FromIterator<E> for SparseSet<E> {
    fn from_iter<I: IntoIterator<Item = E>>(iter: I) -> Self {
        Self {
            map: SparseMap::from_map(iter.into_iter().map(|e| (e, ())).collect()),
        }
    }
}

impl<E: Ord + Clone + std::fmt::Debug> std::fmt::Debug for SparseSet<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_set().entries(self.map.read().keys()).finish()
    }
}
