//! Region-keyed grid with replace-on-overlap insertion.
//!
//! Every key stored in a [`SparseGrid`] got there through `put`, `put_all`,
//! `FromIterator` or a validated [`SparseGrid::try_from_map`], so under the
//! default eviction conditions no two stored regions intersect. Searches lean
//! on that: see [`Condition::prune`](crate::Condition::prune). Once a put
//! runs with eviction conditions that omit [`Condition::Intersects`] the grid
//! may hold overlapping regions, and the walk below the query is never cut
//! short until removals leave the stored regions disjoint again.

use std::borrow::Borrow;
use std::cmp::Reverse;
use std::collections::{BTreeMap, BTreeSet, BinaryHeap};
use std::ops::Deref;
use std::sync::atomic::{AtomicBool, Ordering};

use tracing::{debug, trace};

use crate::condition::{Condition, Direction, Start};
use crate::config::Config;
use crate::cursor::SearchCursor;
use crate::error::{Error, Result};
use crate::map::{SparseMap, Walk};
use crate::position::Position;
use crate::region::Region;

#[inline]
fn region_of<K: Borrow<Region>>(key: &K) -> &Region {
    key.borrow()
}

/// An ordered, concurrent map from rectangular regions to values.
///
/// `K` is any key that borrows as a [`Region`] and orders exactly as that
/// region does; `Region` itself is the usual choice.
pub struct SparseGrid<K, V> {
    map: SparseMap<K, V>,
    config: Config,
    may_overlap: AtomicBool,
}

impl<K, V> SparseGrid<K, V>
where
    K: Borrow<Region> + Ord + Clone,
    V: Clone,
{
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    pub fn with_config(config: Config) -> Self {
        Self {
            map: SparseMap::new(),
            config,
            may_overlap: AtomicBool::new(false),
        }
    }

    /// Build a grid from entries assembled elsewhere.
    ///
    /// # Errors
    ///
    /// [`Error::OverlappingRegions`] naming the first pair of keys found to
    /// intersect.
    pub fn try_from_map(map: BTreeMap<K, V>) -> Result<Self> {
        Self::try_from_map_with_config(map, Config::default())
    }

    pub fn try_from_map_with_config(map: BTreeMap<K, V>, config: Config) -> Result<Self> {
        let grid = Self::with_config(config);
        for (key, value) in map {
            if let Some(other) = grid.get_intersecting(region_of(&key)).first() {
                return Err(Error::OverlappingRegions {
                    first: region_of(other).to_string(),
                    second: region_of(&key).to_string(),
                });
            }
            grid.map.insert(key, value);
        }
        debug!(entries = grid.len(), "built grid from map");
        Ok(grid)
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Whether a put has run without evicting on intersection, so stored
    /// regions may overlap.
    ///
    /// While set, `get_contains` and `get_intersecting` scan every key below
    /// the query, and each removal re-checks the whole grid in `O(n log n)`.
    /// The flag clears as soon as that check finds the regions disjoint.
    pub fn may_overlap(&self) -> bool {
        self.may_overlap.load(Ordering::Acquire)
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// True if any stored key meets any of `conditions` against `key`.
    ///
    /// An empty `conditions` falls back to the configured lookup conditions.
    pub fn has(&self, key: &Region, conditions: &[Condition]) -> bool {
        self.lookup(conditions)
            .iter()
            .any(|condition| !self.search(key, *condition).is_empty())
    }

    /// Stored keys meeting any of `conditions` against `key`, ascending.
    ///
    /// An empty `conditions` falls back to the configured lookup conditions.
    pub fn get_keys(&self, key: &Region, conditions: &[Condition]) -> Vec<K> {
        self.find(key, self.lookup(conditions))
    }

    /// Like [`get_keys`](Self::get_keys), with each key's value.
    pub fn get_all(&self, key: &Region, conditions: &[Condition]) -> Vec<(K, V)> {
        let keys = self.get_keys(key, conditions);
        self.map.entries::<K>(keys.iter())
    }

    /// The stored key equal to `key`, if any.
    pub fn get_matches(&self, key: &Region) -> Vec<K> {
        self.search(key, Condition::Match)
    }

    /// Stored keys lying within `key`.
    pub fn get_within(&self, key: &Region) -> Vec<K> {
        self.search(key, Condition::Within)
    }

    /// The stored key containing `key`; at most one exists in a grid.
    pub fn get_contains(&self, key: &Region) -> Vec<K> {
        self.search(key, Condition::Contains)
    }

    /// Stored keys intersecting `key`.
    pub fn get_intersecting(&self, key: &Region) -> Vec<K> {
        self.search(key, Condition::Intersects)
    }

    /// Stored keys whose X range overlaps `key`'s, found by a full scan.
    pub fn get_x_intercepting(&self, key: &Region) -> Vec<K> {
        self.search(key, Condition::XIntercepts)
    }

    /// Stored keys whose Y range overlaps `key`'s, found by a full scan.
    pub fn get_y_intercepting(&self, key: &Region) -> Vec<K> {
        self.search(key, Condition::YIntercepts)
    }

    /// Stored keys meeting `condition` against `key`, ascending.
    ///
    /// The ascending walk runs first, then the walk below `key` when the
    /// condition's plan asks for one. Both share one [`SearchCursor`] so
    /// coverage seen ascending can cut the descending walk short.
    pub fn search(&self, key: &Region, condition: Condition) -> Vec<K> {
        let plan = condition.plan();
        let mut cursor = SearchCursor::new(*key);
        let include = |candidate: &K| condition.matches(key, region_of(candidate));
        let walk = Walk::INCLUSIVE.keep_stop();

        let mut found = {
            let stop = |candidate: &K| {
                condition.prune(&mut cursor, region_of(candidate), Direction::Higher)
            };
            match plan.start {
                Start::Query => self.map.higher_with(key, walk, include, stop),
                Start::Column => {
                    let probe = Region::column_probe(key.x().start());
                    self.map.higher_with(&probe, walk, include, stop)
                }
                Start::Lowest => self.map.ascend_with(walk, include, stop),
            }
        };

        if plan.walk_lower {
            let overlap_free = !self.may_overlap.load(Ordering::Acquire);
            let stop = |candidate: &K| {
                overlap_free
                    && condition.prune(&mut cursor, region_of(candidate), Direction::Lower)
            };
            let mut lower = self
                .map
                .lower_with(key, Walk::EXCLUSIVE.keep_stop(), include, stop);
            lower.reverse();
            lower.append(&mut found);
            found = lower;
        }

        trace!(%key, %condition, found = found.len(), "grid search");
        found
    }

    // =========================================================================
    // Mutation
    // =========================================================================

    /// Insert `value` at `key`, evicting every stored entry the configured
    /// eviction conditions select. Returns the evicted entries.
    pub fn put(&self, key: K, value: V) -> Vec<(K, V)> {
        self.put_all([(key, value)], &[])
    }

    /// Insert every entry as one compound operation.
    ///
    /// A later entry in `entries` drops any earlier one it meets under the
    /// eviction conditions. The stored entries the survivors meet are then
    /// evicted and the survivors installed. An exact key overwritten on
    /// install is reported as evicted too.
    pub fn put_all(
        &self,
        entries: impl IntoIterator<Item = (K, V)>,
        conditions: &[Condition],
    ) -> Vec<(K, V)> {
        let conditions = self.eviction(conditions);
        let batch = resolve_batch(entries, conditions);

        let _guard = self.map.compound();
        if !conditions.contains(&Condition::Intersects) && !batch.is_empty() {
            self.may_overlap.store(true, Ordering::Release);
        }
        let mut evicted = self.evict(batch.iter().map(|(key, _)| region_of(key)), conditions);
        let installed = batch.len();
        for (key, value) in batch {
            if let Some(prior) = self.map.insert(key.clone(), value) {
                evicted.push((key, prior));
            }
        }
        if conditions.contains(&Condition::Intersects) && !evicted.is_empty() {
            self.recheck_overlap();
        }

        debug!(installed, evicted = evicted.len(), "grid put");
        evicted
    }

    /// Remove every stored entry meeting `conditions` against `key`.
    ///
    /// An empty `conditions` falls back to the configured eviction conditions.
    pub fn remove(&self, key: &Region, conditions: &[Condition]) -> Vec<(K, V)> {
        self.remove_all(std::iter::once(key), conditions)
    }

    /// [`remove`](Self::remove) for each key, as one compound operation.
    pub fn remove_all<'a>(
        &self,
        keys: impl IntoIterator<Item = &'a Region>,
        conditions: &[Condition],
    ) -> Vec<(K, V)> {
        let conditions = self.eviction(conditions);
        let _guard = self.map.compound();
        let evicted = self.evict(keys, conditions);
        if !evicted.is_empty() {
            self.recheck_overlap();
        }
        debug!(evicted = evicted.len(), "grid remove");
        evicted
    }

    // =========================================================================
    // Internals
    // =========================================================================

    fn lookup<'a>(&'a self, conditions: &'a [Condition]) -> &'a [Condition] {
        if conditions.is_empty() {
            &self.config.lookup
        } else {
            conditions
        }
    }

    fn eviction<'a>(&'a self, conditions: &'a [Condition]) -> &'a [Condition] {
        if conditions.is_empty() {
            &self.config.evict_on
        } else {
            conditions
        }
    }

    /// Union of the searches for each condition, ascending.
    fn find(&self, key: &Region, conditions: &[Condition]) -> Vec<K> {
        match conditions {
            [] => Vec::new(),
            [only] => self.search(key, *only),
            _ => conditions
                .iter()
                .flat_map(|condition| self.search(key, *condition))
                .collect::<BTreeSet<K>>()
                .into_iter()
                .collect(),
        }
    }

    /// Caller holds the compound lock.
    fn evict<'a>(
        &self,
        keys: impl IntoIterator<Item = &'a Region>,
        conditions: &[Condition],
    ) -> Vec<(K, V)> {
        let mut evicted = Vec::new();
        for key in keys {
            for found in self.find(key, conditions) {
                if let Some(entry) = self.map.remove::<K>(&found) {
                    trace!(%key, evicted = %region_of(&entry.0), "evict");
                    evicted.push(entry);
                }
            }
        }
        evicted
    }

    /// Clear `may_overlap` once the stored regions are disjoint again.
    /// Caller holds the compound lock.
    fn recheck_overlap(&self) {
        if !self.may_overlap.load(Ordering::Acquire) {
            return;
        }
        let disjoint = {
            let map = self.map.read();
            regions_disjoint(map.keys().map(|key| region_of(key)))
        };
        if disjoint {
            self.may_overlap.store(false, Ordering::Release);
            debug!(entries = self.len(), "stored regions disjoint again");
        }
    }
}

/// True iff no two of `regions` intersect.
///
/// `regions` must ascend by `x.start()`, as grid keys do. Sweeps X keeping the
/// Y spans of the regions covering the current column; those spans are
/// pairwise disjoint until the first overlap, so one neighbour on each side
/// decides.
fn regions_disjoint<'a>(regions: impl IntoIterator<Item = &'a Region>) -> bool {
    let mut active: BTreeMap<Position, Position> = BTreeMap::new();
    let mut expiry: BinaryHeap<Reverse<(Position, Position)>> = BinaryHeap::new();

    for region in regions {
        if region.is_empty() {
            continue;
        }
        let (x, y) = (region.x(), region.y());
        while let Some(&Reverse((x_end, y_start))) = expiry.peek() {
            if x_end > x.start() {
                break;
            }
            expiry.pop();
            active.remove(&y_start);
        }

        let below = active
            .range(..=y.start())
            .next_back()
            .is_some_and(|(_, &end)| end > y.start());
        let above = active
            .range(y.start()..)
            .next()
            .is_some_and(|(&start, _)| start < y.end());
        if below || above {
            return false;
        }
        active.insert(y.start(), y.end());
        expiry.push(Reverse((x.end(), y.start())));
    }
    true
}

/// Drop batch entries superseded by a later entry in the same batch.
fn resolve_batch<K, V>(
    entries: impl IntoIterator<Item = (K, V)>,
    conditions: &[Condition],
) -> Vec<(K, V)>
where
    K: Borrow<Region>,
{
    let mut batch: Vec<(K, V)> = Vec::new();
    for (key, value) in entries {
        let region = *region_of(&key);
        batch.retain(|(kept, _)| {
            !conditions
                .iter()
                .any(|condition| condition.matches(&region, region_of(kept)))
        });
        batch.push((key, value));
    }
    batch
}

impl<K, V> Deref for SparseGrid<K, V> {
    type Target = SparseMap<K, V>;

    fn deref(&self) -> &SparseMap<K, V> {
        &self.map
    }
}

impl<K, V> Default for SparseGrid<K, V>
where
    K: Borrow<Region> + Ord + Clone,
    V: Clone,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> FromIterator<(K, V)> for SparseGrid<K, V>
where
    K: Borrow<Region> + Ord + Clone,
    V: Clone,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let grid = Self::new();
        grid.put_all(iter, &[]);
        grid
    }
}

impl<K: std::fmt::Debug, V: std::fmt::Debug> std::fmt::Debug for SparseGrid<K, V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Debug::fmt(&self.map, f)
    }
}
