//! Caller-owned traversal state for one region query.

use crate::position::PositionBits;
use crate::region::Region;

/// Coverage accrued around a query region while walking candidate keys.
///
/// One cursor belongs to one query. Each axis tracks which positions of the
/// query's range have been intercepted by candidates seen so far; once an axis
/// is covered, the caller can reason that no further key is needed along it.
#[derive(Debug, Clone)]
pub struct SearchCursor {
    query: Region,
    x: PositionBits,
    y: PositionBits,
}

impl SearchCursor {
    pub fn new(query: Region) -> Self {
        Self {
            query,
            x: PositionBits::new(*query.x()),
            y: PositionBits::new(*query.y()),
        }
    }

    #[inline]
    pub fn query(&self) -> &Region {
        &self.query
    }

    /// Record the X positions of the query intercepted by `candidate`.
    pub fn accrue_x(&mut self, candidate: &Region) -> bool {
        self.x.accrue(candidate.x())
    }

    pub fn accrue_y(&mut self, candidate: &Region) -> bool {
        self.y.accrue(candidate.y())
    }

    /// Like [`accrue_x`](Self::accrue_x), but only for candidates passing `filter`.
    pub fn accrue_x_where(&mut self, candidate: &Region, filter: impl FnOnce(&Region) -> bool) -> bool {
        filter(candidate) && self.accrue_x(candidate)
    }

    pub fn accrue_y_where(&mut self, candidate: &Region, filter: impl FnOnce(&Region) -> bool) -> bool {
        filter(candidate) && self.accrue_y(candidate)
    }

    /// Record both axes, but only when `candidate` intersects the query.
    pub fn accrue_intersection(&mut self, candidate: &Region) -> bool {
        if !self.query.intersects(candidate) {
            return false;
        }
        self.accrue_x(candidate);
        self.accrue_y(candidate);
        true
    }

    #[inline]
    pub fn covered_x(&self) -> bool {
        self.x.covered()
    }

    #[inline]
    pub fn covered_y(&self) -> bool {
        self.y.covered()
    }

    pub fn x_bits(&self) -> &PositionBits {
        &self.x
    }

    pub fn y_bits(&self) -> &PositionBits {
        &self.y
    }

    pub fn clear_x(&mut self) {
        self.x.clear();
    }

    pub fn clear_y(&mut self) {
        self.y.clear();
    }

    /// Forget everything accrued, keeping the query.
    pub fn clear(&mut self) {
        self.clear_x();
        self.clear_y();
    }
}
