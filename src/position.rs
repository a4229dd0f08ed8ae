//! One-dimensional position ranges and the coverage tracker regions are built from.
//!
//! Ranges are half-open: `[min, max)` occupies `max - min` positions, so two
//! ranges that merely touch (`a.max == b.min`) do not intersect.

use std::fmt;
use std::str::FromStr;

use smallvec::SmallVec;

use crate::error::{Error, Result};

/// A single position along one axis.
pub type Position = i64;

// =============================================================================
// PositionRange
// =============================================================================

/// A contiguous half-open span of positions `[min, max)`.
///
/// Ordered by `min`, then `max`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PositionRange {
    min: Position,
    max: Position,
}

impl PositionRange {
    /// Create the range `[min, max)`.
    ///
    /// `min == max` is a legal empty range; `min > max` is rejected.
    pub fn new(min: Position, max: Position) -> Result<Self> {
        if min > max {
            return Err(Error::InvalidRange { min, max });
        }
        Ok(Self { min, max })
    }

    /// The one-wide range holding just `position`.
    pub fn point(position: Position) -> Result<Self> {
        let max = position
            .checked_add(1)
            .ok_or(Error::PositionOverflow(position))?;
        Ok(Self { min: position, max })
    }

    /// Empty range sitting at `position`; sorts before every other range with
    /// the same `min`.
    #[inline]
    pub(crate) const fn empty_at(position: Position) -> Self {
        Self {
            min: position,
            max: position,
        }
    }

    /// Inclusive lower bound.
    #[inline]
    pub fn start(&self) -> Position {
        self.min
    }

    /// Exclusive upper bound.
    #[inline]
    pub fn end(&self) -> Position {
        self.max
    }

    #[inline]
    pub fn len(&self) -> u64 {
        self.max.abs_diff(self.min)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.min == self.max
    }

    #[inline]
    pub fn contains_position(&self, position: Position) -> bool {
        self.min <= position && position < self.max
    }

    /// True iff `other` lies inside this range.
    #[inline]
    pub fn contains(&self, other: &PositionRange) -> bool {
        self.min <= other.min && other.max <= self.max
    }

    #[inline]
    pub fn within(&self, other: &PositionRange) -> bool {
        other.contains(self)
    }

    /// True iff the two ranges share at least one position.
    #[inline]
    pub fn intersects(&self, other: &PositionRange) -> bool {
        self.min < other.max && other.min < self.max && !self.is_empty() && !other.is_empty()
    }

    pub fn intersection(&self, other: &PositionRange) -> Option<PositionRange> {
        self.intersects(other).then(|| PositionRange {
            min: self.min.max(other.min),
            max: self.max.min(other.max),
        })
    }

    /// Shift both bounds by `delta`.
    pub fn shifted(&self, delta: Position) -> Result<Self> {
        match (self.min.checked_add(delta), self.max.checked_add(delta)) {
            (Some(min), Some(max)) => Ok(Self { min, max }),
            _ => Err(Error::PositionOverflow(self.max)),
        }
    }
}

impl fmt::Display for PositionRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.min, self.max)
    }
}

impl FromStr for PositionRange {
    type Err = Error;

    /// Parse `min[:max]`; a lone `min` is the one-wide range at `min`.
    fn from_str(spec: &str) -> Result<Self> {
        let parts: Vec<&str> = spec.split(':').map(str::trim).collect();
        match parts.as_slice() {
            [min] => Self::point(parse_position(spec, min)?),
            [min, max] => Self::new(parse_position(spec, min)?, parse_position(spec, max)?),
            _ => Err(Error::InvalidSpec {
                spec: spec.to_string(),
                part: spec.to_string(),
                reason: "expected min[:max]".to_string(),
            }),
        }
    }
}

fn parse_position(spec: &str, part: &str) -> Result<Position> {
    if part.is_empty() {
        return Err(Error::InvalidSpec {
            spec: spec.to_string(),
            part: part.to_string(),
            reason: "blank position".to_string(),
        });
    }
    part.parse().map_err(|e: std::num::ParseIntError| Error::InvalidSpec {
        spec: spec.to_string(),
        part: part.to_string(),
        reason: e.to_string(),
    })
}

// =============================================================================
// PositionBits
// =============================================================================

/// Records which positions of an owning range have been visited.
///
/// Visited positions are kept as sorted, disjoint, non-adjacent spans clipped
/// to the owning range, so a fully covered range collapses to a single span.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PositionBits {
    range: PositionRange,
    spans: SmallVec<[(Position, Position); 4]>,
}

impl PositionBits {
    pub fn new(range: PositionRange) -> Self {
        Self {
            range,
            spans: SmallVec::new(),
        }
    }

    /// The range whose coverage is tracked.
    #[inline]
    pub fn range(&self) -> &PositionRange {
        &self.range
    }

    /// Mark every position shared by `other` and the owning range.
    ///
    /// Returns false when the two ranges do not intersect.
    pub fn accrue(&mut self, other: &PositionRange) -> bool {
        let Some(part) = self.range.intersection(other) else {
            return false;
        };

        let (mut start, mut end) = (part.min, part.max);
        let lo = self.spans.partition_point(|&(_, e)| e < start);
        let mut hi = lo;
        while hi < self.spans.len() && self.spans[hi].0 <= end {
            start = start.min(self.spans[hi].0);
            end = end.max(self.spans[hi].1);
            hi += 1;
        }
        self.spans.drain(lo..hi);
        self.spans.insert(lo, (start, end));
        true
    }

    /// True once every position of the owning range has been accrued.
    pub fn covered(&self) -> bool {
        if self.range.is_empty() {
            return true;
        }
        matches!(self.spans.as_slice(), [(s, e)] if *s == self.range.min && *e == self.range.max)
    }

    /// Number of distinct positions accrued so far.
    pub fn accrued(&self) -> u64 {
        self.spans.iter().map(|&(s, e)| e.abs_diff(s)).sum()
    }

    #[inline]
    pub fn is_clear(&self) -> bool {
        self.spans.is_empty()
    }

    pub fn clear(&mut self) {
        self.spans.clear();
    }
}
