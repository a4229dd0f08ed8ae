//! Rectangular region keys.
//!
//! A [`Region`] is an X range crossed with a Y range. Regions are plain
//! immutable values: any traversal state accumulated while searching around
//! a region lives in a [`SearchCursor`](crate::SearchCursor), never on the
//! region itself.

use std::fmt;
use std::str::FromStr;

use crate::coord::Coord;
use crate::error::{Error, Result};
use crate::position::{Position, PositionRange};

/// An axis-aligned rectangle of positions.
///
/// Ordered by the X range, then the Y range, which is the order every grid
/// walk follows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Region {
    x: PositionRange,
    y: PositionRange,
}

/// Where one region sits relative to another.
///
/// Vertical separation takes precedence over horizontal when a region is
/// separated on both axes without being strictly `Before` or `After`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Relation {
    /// Above and leading.
    Before,
    Above,
    Leads,
    Intersects,
    Trails,
    Below,
    /// Below and trailing.
    After,
}

impl Relation {
    /// Signed encoding from `-3` (before) to `3` (after).
    pub fn ordinal(self) -> i8 {
        match self {
            Relation::Before => -3,
            Relation::Above => -2,
            Relation::Leads => -1,
            Relation::Intersects => 0,
            Relation::Trails => 1,
            Relation::Below => 2,
            Relation::After => 3,
        }
    }

    pub fn is_ahead(self) -> bool {
        self.ordinal() < 0
    }

    pub fn is_behind(self) -> bool {
        self.ordinal() > 0
    }
}

impl Region {
    pub const fn new(x: PositionRange, y: PositionRange) -> Self {
        Self { x, y }
    }

    /// The one-by-one region at `(x, y)`.
    pub fn at(x: Position, y: Position) -> Result<Self> {
        Ok(Self::new(PositionRange::point(x)?, PositionRange::point(y)?))
    }

    /// The region `[x0, x1) x [y0, y1)`.
    pub fn spanning(x0: Position, x1: Position, y0: Position, y1: Position) -> Result<Self> {
        Ok(Self::new(PositionRange::new(x0, x1)?, PositionRange::new(y0, y1)?))
    }

    /// Parse `"<xspec>|<yspec>"`, each side in the `min[:max]` range grammar.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidSpec`] naming both the whole spec and the offending
    /// sub-spec when the segment count is wrong, a side is blank, or a side
    /// does not parse.
    pub fn of(spec: &str) -> Result<Self> {
        let invalid = |part: &str, reason: String| Error::InvalidSpec {
            spec: spec.to_string(),
            part: part.to_string(),
            reason,
        };

        let segments: Vec<&str> = spec.split('|').collect();
        let [x_spec, y_spec] = segments[..] else {
            return Err(invalid(
                spec,
                format!("expected 2 ranges separated by '|', found {}", segments.len()),
            ));
        };

        let parse = |part: &str| -> Result<PositionRange> {
            if part.trim().is_empty() {
                return Err(invalid(part, "blank range".to_string()));
            }
            part.parse().map_err(|e| match e {
                Error::InvalidSpec { reason, .. } => invalid(part, reason),
                other => invalid(part, other.to_string()),
            })
        };

        Ok(Self::new(parse(x_spec)?, parse(y_spec)?))
    }

    /// Smallest possible key whose X range starts at `x`.
    pub(crate) const fn column_probe(x: Position) -> Self {
        Self::new(PositionRange::empty_at(x), PositionRange::empty_at(Position::MIN))
    }

    #[inline]
    pub fn x(&self) -> &PositionRange {
        &self.x
    }

    #[inline]
    pub fn y(&self) -> &PositionRange {
        &self.y
    }

    /// The top-left corner `(x.min, y.min)`.
    pub fn origin(&self) -> Coord {
        Coord::new(self.x.start(), self.y.start())
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty() || self.y.is_empty()
    }

    pub fn area(&self) -> u128 {
        u128::from(self.x.len()) * u128::from(self.y.len())
    }

    /// A copy of this region moved by `offset`.
    pub fn translated(&self, offset: Coord) -> Result<Self> {
        Ok(Self::new(
            self.x.shifted(offset.x())?,
            self.y.shifted(offset.y())?,
        ))
    }

    // === Containment ===

    pub fn contains(&self, other: &Region) -> bool {
        self.x.contains(&other.x) && self.y.contains(&other.y)
    }

    pub fn contains_point(&self, x: Position, y: Position) -> bool {
        self.x.contains_position(x) && self.y.contains_position(y)
    }

    pub fn contains_coord(&self, coord: Coord) -> bool {
        self.contains_point(coord.x(), coord.y())
    }

    pub fn within(&self, other: &Region) -> bool {
        other.contains(self)
    }

    // === Overlap ===

    /// True iff both the X ranges and the Y ranges share a position.
    pub fn intersects(&self, other: &Region) -> bool {
        self.x.intersects(&other.x) && self.y.intersects(&other.y)
    }

    pub fn intersection(&self, other: &Region) -> Option<Region> {
        Some(Region::new(
            self.x.intersection(&other.x)?,
            self.y.intersection(&other.y)?,
        ))
    }

    /// True iff the X ranges overlap, whatever the Y ranges do.
    pub fn intercepts_x(&self, other: &Region) -> bool {
        self.x.intersects(&other.x)
    }

    /// True iff the Y ranges overlap, whatever the X ranges do.
    pub fn intercepts_y(&self, other: &Region) -> bool {
        self.y.intersects(&other.y)
    }

    // === Relative position ===

    /// Every Y position of this region follows every Y position of `other`.
    pub fn above(&self, other: &Region) -> bool {
        self.y.start() >= other.y.end()
    }

    pub fn below(&self, other: &Region) -> bool {
        self.y.end() <= other.y.start()
    }

    /// Every X position of this region precedes every X position of `other`.
    pub fn leads(&self, other: &Region) -> bool {
        self.x.end() <= other.x.start()
    }

    pub fn trails(&self, other: &Region) -> bool {
        self.x.start() >= other.x.end()
    }

    pub fn before(&self, other: &Region) -> bool {
        self.above(other) && self.leads(other)
    }

    pub fn after(&self, other: &Region) -> bool {
        self.below(other) && self.trails(other)
    }

    pub fn ahead(&self, other: &Region) -> bool {
        self.above(other) || self.leads(other)
    }

    pub fn behind(&self, other: &Region) -> bool {
        self.below(other) || self.trails(other)
    }

    /// Classify this region against `other` into exactly one [`Relation`].
    ///
    /// For non-empty regions `Relation::Intersects` is returned iff the two
    /// regions intersect, and swapping the operands negates the ordinal.
    pub fn relative_to(&self, other: &Region) -> Relation {
        match (
            self.leads(other),
            self.trails(other),
            self.above(other),
            self.below(other),
        ) {
            (true, _, true, _) => Relation::Before,
            (_, true, _, true) => Relation::After,
            (_, _, true, _) => Relation::Above,
            (_, _, _, true) => Relation::Below,
            (true, ..) => Relation::Leads,
            (_, true, ..) => Relation::Trails,
            _ => Relation::Intersects,
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}|{}", self.x, self.y)
    }
}

impl FromStr for Region {
    type Err = Error;

    fn from_str(spec: &str) -> Result<Self> {
        Region::of(spec)
    }
}
