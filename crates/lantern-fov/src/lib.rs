//! Field of view computation over [`GridMap`]s.
//!
//! Five algorithms sit behind the single entry point [`compute_fov`]; all
//! of them replace the map's previous field of view with the set of cells
//! visible from an origin.
//!
//! - [`FovAlgorithm::Basic`]: circular Bresenham raycasting. Fast, with
//!   the usual raycasting artefacts.
//! - [`FovAlgorithm::Diamond`]: diamond raycasting, propagating rays
//!   cell-to-cell with obscurity cones.
//! - [`FovAlgorithm::Shadow`]: recursive shadowcasting over eight
//!   octants.
//! - [`FovAlgorithm::Permissive`]: precise permissive view with a
//!   configurable source square, the most generous of the five.
//! - [`FovAlgorithm::Restrictive`]: Marczuk's precise angle
//!   shadowcasting, the most conservative.
//!
//! A `max_radius` of zero (or less) means unlimited range. `Basic`,
//! `Diamond` and `Shadow` limit by Euclidean distance; `Permissive` and
//! `Restrictive` clip their scans per axis, so their limited regions are
//! squares. `light_walls` controls whether opaque cells facing the origin
//! are lit.
//!
//! ```
//! use lantern_core::{GridMap, Point};
//! use lantern_fov::{FovAlgorithm, compute_fov};
//!
//! let mut map = GridMap::new(9, 9)?;
//! map.set_properties(Point::new(4, 2), false, false);
//! compute_fov(&mut map, Point::new(4, 4), 0, true, FovAlgorithm::Shadow)?;
//! assert!(map.is_in_fov(Point::new(4, 3)));
//! assert!(!map.is_in_fov(Point::new(4, 0)));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use std::fmt;

use lantern_core::{GridMap, Point};

mod diamond;
mod permissive;
mod raycast;
mod restrictive;
mod shadow;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors reported by [`compute_fov`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FovError {
    /// Permissiveness outside the accepted `0..=8` range.
    Permissiveness(u8),
    /// The origin does not lie on the map.
    OriginOutOfBounds {
        origin: Point,
        width: i32,
        height: i32,
    },
}

impl fmt::Display for FovError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FovError::Permissiveness(p) => {
                write!(f, "bad permissiveness {p}, accepted range is [0, 8]")
            }
            FovError::OriginOutOfBounds {
                origin,
                width,
                height,
            } => {
                write!(f, "fov origin {origin} outside the {width}x{height} map")
            }
        }
    }
}

impl std::error::Error for FovError {}

// ---------------------------------------------------------------------------
// Algorithm selection
// ---------------------------------------------------------------------------

/// Field of view algorithm to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FovAlgorithm {
    /// Circular Bresenham raycasting.
    #[default]
    Basic,
    /// Diamond raycasting.
    Diamond,
    /// Recursive shadowcasting.
    Shadow,
    /// Precise permissive view. The parameter sets the permissiveness,
    /// from `0` (source is a point) to `8` (source is the full cell).
    Permissive(u8),
    /// Restrictive precise angle shadowcasting.
    Restrictive,
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

/// Computes the set of cells visible from `origin` and stores it in the
/// map's field of view, replacing the previous one.
///
/// `max_radius` limits the view range when positive; zero or negative
/// means unlimited. With `light_walls` unset, opaque cells are left out
/// of the result. The origin cell is always visible, even when opaque.
pub fn compute_fov(
    map: &mut GridMap,
    origin: Point,
    max_radius: i32,
    light_walls: bool,
    algorithm: FovAlgorithm,
) -> Result<(), FovError> {
    if let FovAlgorithm::Permissive(p) = algorithm {
        if p > 8 {
            return Err(FovError::Permissiveness(p));
        }
    }
    if !map.contains(origin) {
        return Err(FovError::OriginOutOfBounds {
            origin,
            width: map.width(),
            height: map.height(),
        });
    }
    let max_radius = max_radius.max(0);
    match algorithm {
        FovAlgorithm::Basic => raycast::compute(map, origin, max_radius, light_walls),
        FovAlgorithm::Diamond => diamond::compute(map, origin, max_radius, light_walls),
        FovAlgorithm::Shadow => shadow::compute(map, origin, max_radius, light_walls),
        FovAlgorithm::Permissive(p) => {
            permissive::compute(map, origin, max_radius, light_walls, p);
        }
        FovAlgorithm::Restrictive => restrictive::compute(map, origin, max_radius, light_walls),
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Test fixtures
// ---------------------------------------------------------------------------

#[cfg(test)]
pub(crate) mod fixtures {
    use lantern_core::{GridMap, Point};

    /// Builds a map from rows of `.` (open floor) and `#` (solid wall).
    pub(crate) fn map_from(rows: &[&str]) -> GridMap {
        let height = rows.len() as i32;
        let width = rows[0].len() as i32;
        let mut map = GridMap::new(width, height).unwrap();
        for (y, row) in rows.iter().enumerate() {
            assert_eq!(row.len() as i32, width, "ragged fixture row {y}");
            for (x, ch) in row.chars().enumerate() {
                let open = ch == '.';
                map.set_properties(Point::new(x as i32, y as i32), open, open);
            }
        }
        map
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::{RngExt, SeedableRng};

    use super::*;
    use crate::fixtures::map_from;

    const ALL_ALGORITHMS: [FovAlgorithm; 6] = [
        FovAlgorithm::Basic,
        FovAlgorithm::Diamond,
        FovAlgorithm::Shadow,
        FovAlgorithm::Permissive(0),
        FovAlgorithm::Permissive(8),
        FovAlgorithm::Restrictive,
    ];

    // ---------------------------------------------------------------------
    // Shared behavior across algorithms
    // ---------------------------------------------------------------------

    #[test]
    fn origin_always_visible_even_when_opaque() {
        for algorithm in ALL_ALGORITHMS {
            let mut map = map_from(&[
                ".....",
                ".....",
                "..#..",
                ".....",
                ".....",
            ]);
            let origin = Point::new(2, 2);
            compute_fov(&mut map, origin, 0, false, algorithm).unwrap();
            assert!(map.is_in_fov(origin), "{algorithm:?}");
        }
    }

    #[test]
    fn open_map_fully_visible_without_radius() {
        for algorithm in ALL_ALGORITHMS {
            let mut map = map_from(&[".........."; 10]);
            compute_fov(&mut map, Point::new(4, 4), 0, true, algorithm).unwrap();
            for y in 0..10 {
                for x in 0..10 {
                    assert!(
                        map.is_in_fov(Point::new(x, y)),
                        "{algorithm:?} cell ({x}, {y})"
                    );
                }
            }
        }
    }

    #[test]
    fn wall_blocks_cells_behind_it() {
        for algorithm in ALL_ALGORITHMS {
            for light_walls in [true, false] {
                let mut map = map_from(&[
                    ".........",
                    "....#....",
                    ".........",
                ]);
                let origin = Point::new(0, 1);
                compute_fov(&mut map, origin, 0, light_walls, algorithm).unwrap();
                assert!(map.is_in_fov(Point::new(3, 1)), "{algorithm:?}");
                assert_eq!(
                    map.is_in_fov(Point::new(4, 1)),
                    light_walls,
                    "{algorithm:?} wall, light_walls={light_walls}"
                );
                assert!(!map.is_in_fov(Point::new(5, 1)), "{algorithm:?}");
                assert!(!map.is_in_fov(Point::new(8, 1)), "{algorithm:?}");
            }
        }
    }

    #[test]
    fn negative_radius_means_unlimited() {
        for algorithm in ALL_ALGORITHMS {
            let mut map = map_from(&["......."; 7]);
            compute_fov(&mut map, Point::new(3, 3), -5, true, algorithm).unwrap();
            for y in 0..7 {
                for x in 0..7 {
                    assert!(
                        map.is_in_fov(Point::new(x, y)),
                        "{algorithm:?} cell ({x}, {y})"
                    );
                }
            }
        }
    }

    #[test]
    fn recompute_replaces_previous_fov() {
        for algorithm in ALL_ALGORITHMS {
            let mut map = map_from(&["........."; 9]);
            compute_fov(&mut map, Point::new(1, 1), 2, true, algorithm).unwrap();
            assert!(map.is_in_fov(Point::new(1, 2)));
            compute_fov(&mut map, Point::new(7, 7), 2, true, algorithm).unwrap();
            assert!(
                !map.is_in_fov(Point::new(1, 2)),
                "{algorithm:?} kept stale fov"
            );
            assert!(map.is_in_fov(Point::new(7, 6)), "{algorithm:?}");
        }
    }

    #[test]
    fn invariants_hold_on_random_maps() {
        let mut rng = StdRng::seed_from_u64(0xf0f);
        for _ in 0..8 {
            let mut layout = GridMap::new(12, 12).unwrap();
            for y in 0..12 {
                for x in 0..12 {
                    let open = !rng.random_bool(0.3);
                    layout.set_properties(Point::new(x, y), open, open);
                }
            }
            let origin = Point::new(rng.random_range(0..12), rng.random_range(0..12));
            let radius = rng.random_range(0..6);
            for algorithm in ALL_ALGORITHMS {
                let mut dark = layout.clone();
                compute_fov(&mut dark, origin, radius, false, algorithm).unwrap();
                let mut lit = layout.clone();
                compute_fov(&mut lit, origin, radius, true, algorithm).unwrap();
                assert!(dark.is_in_fov(origin), "{algorithm:?} origin {origin}");
                assert!(lit.is_in_fov(origin), "{algorithm:?} origin {origin}");
                for y in 0..12 {
                    for x in 0..12 {
                        let p = Point::new(x, y);
                        if dark.is_in_fov(p) && p != origin {
                            assert!(
                                dark.is_transparent(p),
                                "{algorithm:?} lit the wall {p} from {origin}"
                            );
                        }
                        if dark.is_in_fov(p) {
                            assert!(
                                lit.is_in_fov(p),
                                "{algorithm:?} lost {p} from {origin} with lit walls"
                            );
                        }
                        if radius > 0 && lit.is_in_fov(p) {
                            let reach = (p.x - origin.x).abs().max((p.y - origin.y).abs());
                            assert!(
                                reach <= radius,
                                "{algorithm:?} reached {p} from {origin} at radius {radius}"
                            );
                        }
                    }
                }
            }
        }
    }

    // ---------------------------------------------------------------------
    // Radius shapes
    // ---------------------------------------------------------------------

    #[test]
    fn shadow_radius_is_a_circle() {
        let mut map = map_from(&[".........."; 10]);
        let origin = Point::new(5, 5);
        compute_fov(&mut map, origin, 3, true, FovAlgorithm::Shadow).unwrap();
        for y in 0..10 {
            for x in 0..10 {
                let p = Point::new(x, y);
                assert_eq!(
                    map.is_in_fov(p),
                    origin.dist_squared(p) <= 9,
                    "cell ({x}, {y})"
                );
            }
        }
    }

    // ---------------------------------------------------------------------
    // Validation
    // ---------------------------------------------------------------------

    #[test]
    fn permissiveness_out_of_range_is_rejected() {
        let mut map = map_from(&["...", "...", "..."]);
        map.set_in_fov(Point::new(2, 2), true);
        let err = compute_fov(
            &mut map,
            Point::new(1, 1),
            0,
            true,
            FovAlgorithm::Permissive(9),
        )
        .unwrap_err();
        assert_eq!(err, FovError::Permissiveness(9));
        // The map is untouched on validation failure.
        assert!(map.is_in_fov(Point::new(2, 2)));
    }

    #[test]
    fn origin_out_of_bounds_is_rejected() {
        for algorithm in ALL_ALGORITHMS {
            for origin in [Point::new(5, 5), Point::new(-1, 0), Point::new(0, 3)] {
                let mut map = map_from(&["...", "...", "..."]);
                let err = compute_fov(&mut map, origin, 0, true, algorithm).unwrap_err();
                assert_eq!(
                    err,
                    FovError::OriginOutOfBounds {
                        origin,
                        width: 3,
                        height: 3
                    },
                    "{algorithm:?}"
                );
            }
        }
    }

    #[test]
    fn error_display() {
        assert_eq!(
            FovError::Permissiveness(9).to_string(),
            "bad permissiveness 9, accepted range is [0, 8]"
        );
        assert_eq!(
            FovError::OriginOutOfBounds {
                origin: Point::new(4, -1),
                width: 3,
                height: 3
            }
            .to_string(),
            "fov origin (4, -1) outside the 3x3 map"
        );
    }

    #[test]
    fn default_algorithm_is_basic() {
        assert_eq!(FovAlgorithm::default(), FovAlgorithm::Basic);
    }
}
