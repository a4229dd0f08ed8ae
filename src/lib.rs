//! # sparse-grid
//!
//! Sparse, concurrent, ordered stores keyed by rectangular regions.
//!
//! A [`Region`] is a half-open X range crossed with a half-open Y range, for
//! example a merged spreadsheet cell or a box on a canvas. [`SparseGrid`] maps
//! regions to values and keeps them from overlapping: putting a region evicts
//! every stored region it intersects. Queries ask which stored regions match,
//! lie within, contain, intersect or share a column or row span with a probe
//! region, and walk only the part of the ordered map that can hold answers.
//!
//! The same ordered foundation, [`SparseMap`], backs the plain keyed stores
//! [`SparseStore`], [`SparseSet`] and [`SparseMapSet`].
//!
//! ## Example
//!
//! ```rust
//! use sparse_grid::{Region, SparseGrid};
//!
//! let grid: SparseGrid<Region, &str> = SparseGrid::new();
//! grid.put(Region::of("0:2|0:2").unwrap(), "A");
//!
//! let evicted = grid.put(Region::of("1:3|1:3").unwrap(), "B");
//! assert_eq!(evicted, vec![(Region::of("0:2|0:2").unwrap(), "A")]);
//!
//! assert_eq!(grid.get(&Region::of("0:2|0:2").unwrap()), None);
//! assert_eq!(grid.get(&Region::of("1:3|1:3").unwrap()), Some("B"));
//! assert_eq!(grid.get_intersecting(&Region::at(2, 2).unwrap()).len(), 1);
//! ```

#![forbid(unsafe_code)]

pub mod condition;
pub mod config;
pub mod coord;
pub mod cursor;
pub mod error;
pub mod grid;
pub mod map;
pub mod map_set;
pub mod position;
pub mod region;
pub mod set;
pub mod store;

pub use condition::{Condition, Direction, Plan, Start};
pub use config::Config;
pub use coord::Coord;
pub use cursor::SearchCursor;
pub use error::{Error, Result};
pub use grid::SparseGrid;
pub use map::{SparseMap, Walk};
pub use map_set::SparseMapSet;
pub use position::{Position, PositionBits, PositionRange};
pub use region::{Region, Relation};
pub use set::SparseSet;
pub use store::SparseStore;

#[cfg(test)]
mod proptests;
