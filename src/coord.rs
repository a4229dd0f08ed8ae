use std::fmt;

use crate::error::{Error, Result};
use crate::position::Position;

/// An immutable `(x, y)` position pair, ordered by `x` then `y`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Coord {
    x: Position,
    y: Position,
}

impl Coord {
    pub const ORIGIN: Coord = Coord { x: 0, y: 0 };

    pub const fn new(x: Position, y: Position) -> Self {
        Self { x, y }
    }

    #[inline]
    pub fn x(&self) -> Position {
        self.x
    }

    #[inline]
    pub fn y(&self) -> Position {
        self.y
    }

    /// # Errors
    ///
    /// [`Error::PositionOverflow`] with the axis value that overflowed.
    pub fn plus(&self, other: Coord) -> Result<Coord> {
        let x = self.x.checked_add(other.x).ok_or(Error::PositionOverflow(self.x))?;
        let y = self.y.checked_add(other.y).ok_or(Error::PositionOverflow(self.y))?;
        Ok(Coord::new(x, y))
    }

    pub fn minus(&self, other: Coord) -> Result<Coord> {
        let x = self.x.checked_sub(other.x).ok_or(Error::PositionOverflow(self.x))?;
        let y = self.y.checked_sub(other.y).ok_or(Error::PositionOverflow(self.y))?;
        Ok(Coord::new(x, y))
    }
}

impl From<(Position, Position)> for Coord {
    fn from((x, y): (Position, Position)) -> Self {
        Coord::new(x, y)
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}
