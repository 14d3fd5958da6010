//! **lantern-core** — grid map and geometry primitives for roguelike games.
//!
//! This crate provides the foundational types shared across the *lantern*
//! workspace: integer geometry ([`Point`], [`Direction`]), the flag-carrying
//! [`GridMap`] that the field-of-view and pathfinding crates operate on, and
//! stateful Bresenham [`line`] stepping.

pub mod geom;
pub mod line;
pub mod map;

pub use geom::{Direction, Point};
pub use line::{LineStepper, line};
pub use map::{Cell, GridMap, MapError};
