//! Relationships a grid query can ask for.
//!
//! Each [`Condition`] knows three things: whether a candidate key satisfies it
//! ([`Condition::matches`]), where a search for it begins ([`Condition::plan`]),
//! and when a walk in one direction can stop ([`Condition::prune`]). The grid
//! runs the same search loop for every condition.
//!
//! Pruning for `Contains` and `Intersects` relies on stored keys never
//! intersecting each other. Walking toward lower keys, every remaining key
//! starts at or before the query's first column, so any that still reaches the
//! query must occupy that *pivot column*. The cursor accrues, along Y, the
//! parts of the pivot column already owned by keys seen so far; once the whole
//! column is owned no unseen key can reach the query.

use std::fmt;
use std::str::FromStr;

use crate::cursor::SearchCursor;
use crate::error::{Error, Result};
use crate::region::Region;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Condition {
    /// The stored key equals the query.
    Match,
    /// The stored key lies within the query.
    Within,
    /// The stored key contains the query.
    Contains,
    Intersects,
    /// The stored key's X range overlaps the query's.
    XIntercepts,
    /// The stored key's Y range overlaps the query's.
    YIntercepts,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Lower,
    Higher,
}

/// Where the ascending walk of a search begins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Start {
    /// At the query itself, inclusive.
    Query,
    /// At the first key sharing the query's starting column.
    Column,
    /// At the lowest key.
    Lowest,
}

/// How a search for a condition walks the key order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Plan {
    pub start: Start,
    /// Whether keys strictly below the query are walked after the ascending walk.
    pub walk_lower: bool,
}

impl Condition {
    pub const ALL: [Condition; 6] = [
        Condition::Match,
        Condition::Within,
        Condition::Contains,
        Condition::Intersects,
        Condition::XIntercepts,
        Condition::YIntercepts,
    ];

    /// True iff `candidate` stands in this relationship to `query`.
    pub fn matches(self, query: &Region, candidate: &Region) -> bool {
        match self {
            Condition::Match => candidate == query,
            Condition::Within => candidate.within(query),
            Condition::Contains => candidate.contains(query),
            Condition::Intersects => candidate.intersects(query),
            Condition::XIntercepts => candidate.intercepts_x(query),
            Condition::YIntercepts => candidate.intercepts_y(query),
        }
    }

    pub fn plan(self) -> Plan {
        match self {
            Condition::Match => Plan {
                start: Start::Query,
                walk_lower: false,
            },
            Condition::Within => Plan {
                start: Start::Column,
                walk_lower: false,
            },
            Condition::Contains | Condition::Intersects => Plan {
                start: Start::Query,
                walk_lower: true,
            },
            Condition::XIntercepts | Condition::YIntercepts => Plan {
                start: Start::Lowest,
                walk_lower: false,
            },
        }
    }

    /// True once no key beyond `candidate` in `direction` can match.
    ///
    /// Called on every visited key before it is tested with [`matches`](Self::matches);
    /// `candidate` itself is still collected when it matches.
    pub fn prune(self, cursor: &mut SearchCursor, candidate: &Region, direction: Direction) -> bool {
        let query = *cursor.query();
        let pivot = query.x().start();
        let on_pivot = |c: &Region| c.x().contains_position(pivot);

        match (self, direction) {
            (Condition::Match, Direction::Higher) => candidate != &query,
            (Condition::Within, Direction::Higher) => candidate.x().start() > query.x().end(),
            (Condition::Contains, Direction::Higher) => {
                cursor.accrue_y_where(candidate, on_pivot);
                candidate.x().start() > pivot
            }
            (Condition::Contains, Direction::Lower) => {
                if query.is_empty() {
                    return false;
                }
                cursor.accrue_y_where(candidate, on_pivot);
                candidate.contains(&query) || cursor.covered_y()
            }
            (Condition::Intersects, Direction::Higher) => {
                cursor.accrue_y_where(candidate, on_pivot);
                candidate.x().start() >= query.x().end()
            }
            (Condition::Intersects, Direction::Lower) => {
                if query.is_empty() {
                    return true;
                }
                cursor.accrue_y_where(candidate, on_pivot);
                cursor.covered_y()
            }
            (Condition::XIntercepts | Condition::YIntercepts, Direction::Higher) => false,
            (_, Direction::Lower) => true,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Condition::Match => "match",
            Condition::Within => "within",
            Condition::Contains => "contains",
            Condition::Intersects => "intersects",
            Condition::XIntercepts => "x_intercepts",
            Condition::YIntercepts => "y_intercepts",
        }
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Condition {
    type Err = Error;

    /// Case-insensitive; `-` and `_` are interchangeable.
    fn from_str(name: &str) -> Result<Self> {
        let normalized = name.trim().to_ascii_lowercase().replace('-', "_");
        Condition::ALL
            .into_iter()
            .find(|c| c.as_str() == normalized)
            .ok_or_else(|| Error::UnknownCondition(name.to_string()))
    }
}
