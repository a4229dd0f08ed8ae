//! Error types for range parsing and store operations.
//!
//! Nothing in this crate performs I/O, so every variant here is an argument or
//! invariant error raised at the API boundary before any mutation is applied.

use thiserror::Error;

use crate::position::Position;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// A range whose minimum exceeds its maximum.
    #[error("invalid range: min {min} exceeds max {max}")]
    InvalidRange { min: Position, max: Position },

    /// Arithmetic on this position left the `i64` domain.
    #[error("position {0} overflows the position domain")]
    PositionOverflow(Position),

    /// A malformed textual range or region.
    #[error("invalid region spec '{spec}' at '{part}': {reason}")]
    InvalidSpec {
        spec: String,
        part: String,
        reason: String,
    },

    #[error("index {index} out of range for store of length {len}")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("unknown condition '{0}'")]
    UnknownCondition(String),

    /// Two keys offered to a grid intersect each other.
    #[error("regions {first} and {second} intersect")]
    OverlappingRegions { first: String, second: String },
}

impl Error {
    /// Check if this error came from malformed range or region input
    pub fn is_spec_error(&self) -> bool {
        matches!(
            self,
            Error::InvalidRange { .. } | Error::PositionOverflow(_) | Error::InvalidSpec { .. }
        )
    }

    /// Check if this error reports a violated store invariant
    pub fn is_invariant_error(&self) -> bool {
        matches!(self, Error::OverlappingRegions { .. })
    }
}
