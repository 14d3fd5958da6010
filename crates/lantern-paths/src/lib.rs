//! Pathfinding for grid-based roguelikes.
//!
//! Two engines over one movement-cost model:
//!
//! - [`AStar`] — point-to-point shortest paths with incremental walking,
//!   in-place reversal, and on-demand re-planning when the terrain changes.
//! - [`DistanceField`] — a Dijkstra flood fill from a root cell to every
//!   reachable cell, with greedy gradient-descent path extraction.
//!
//! Costs come from a [`Mover`]: either a [`lantern_core::GridMap`] (walkable
//! cells cost 1) or any `Fn(Point, Point) -> f32` closure. Zero or negative
//! costs mean impassable.
//!
//! ```
//! use lantern_core::{GridMap, Point};
//! use lantern_paths::AStar;
//!
//! let mut map = GridMap::new(8, 8)?;
//! map.clear(true, true);
//! map.set_properties(Point::new(3, 3), true, false);
//!
//! let mut path = AStar::for_map(&map, 1.0);
//! path.compute(&map, Point::new(0, 0), Point::new(7, 7))?;
//! while let Some(step) = path.walk(&map, false) {
//!     assert!(map.is_walkable(step));
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use std::fmt;

use lantern_core::Point;

mod astar;
mod dijkstra;
mod heap;
mod traits;

pub use astar::AStar;
pub use dijkstra::DistanceField;
pub use traits::Mover;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors from pathfinder construction and queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathError {
    /// Width or height was zero or negative.
    InvalidSize { width: i32, height: i32 },
    /// An endpoint lies outside the pathfinder's grid.
    OutOfBounds { pos: Point, width: i32, height: i32 },
    /// No route exists between the two cells.
    Unreachable { from: Point, to: Point },
}

impl fmt::Display for PathError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidSize { width, height } => {
                write!(f, "path grid size must be positive, got {width}x{height}")
            }
            Self::OutOfBounds { pos, width, height } => {
                write!(f, "cell {pos} is outside the {width}x{height} path grid")
            }
            Self::Unreachable { from, to } => {
                write!(f, "no route from {from} to {to}")
            }
        }
    }
}

impl std::error::Error for PathError {}

// ---------------------------------------------------------------------------
// Test fixtures
// ---------------------------------------------------------------------------
