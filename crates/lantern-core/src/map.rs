//! Grid map: per-cell transparency, walkability, and visibility flags.
//!
//! [`GridMap`] is the shared substrate of the field-of-view and pathfinding
//! crates. What the flags mean is the caller's business; the map only stores
//! them. Accessors follow the tolerant contract of the classic roguelike
//! libraries: reads outside the map return `false` and writes are dropped.
//! [`GridMap::cell`] / [`GridMap::cell_mut`] are the checked alternative for
//! callers that want misses surfaced.

use std::fmt;

use crate::geom::Point;

// ---------------------------------------------------------------------------
// Cell
// ---------------------------------------------------------------------------

/// Per-cell flags. All three are independent; `visible` belongs to the
/// field-of-view computations and is rewritten wholesale by each of them.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Cell {
    pub transparent: bool,
    pub walkable: bool,
    pub visible: bool,
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors from map construction and map-to-map copies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MapError {
    /// Width or height was zero or negative.
    InvalidSize { width: i32, height: i32 },
    /// Source and destination dimensions differ.
    SizeMismatch { src: Point, dest: Point },
}

impl fmt::Display for MapError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidSize { width, height } => {
                write!(f, "map size must be positive, got {width}x{height}")
            }
            Self::SizeMismatch { src, dest } => {
                write!(
                    f,
                    "map size mismatch: source is {src}, destination is {dest}"
                )
            }
        }
    }
}

impl std::error::Error for MapError {}

// ---------------------------------------------------------------------------
// GridMap
// ---------------------------------------------------------------------------

/// A rectangular grid of [`Cell`]s, row-major, fixed size after construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridMap {
    width: i32,
    height: i32,
    cells: Vec<Cell>,
}

impl GridMap {
    /// Create a map with every cell opaque, unwalkable, and not visible.
    ///
    /// Fails when either dimension is zero or negative.
    pub fn new(width: i32, height: i32) -> Result<Self, MapError> {
        if width <= 0 || height <= 0 {
            return Err(MapError::InvalidSize { width, height });
        }
        Ok(Self {
            width,
            height,
            cells: vec![Cell::default(); (width * height) as usize],
        })
    }

    /// Map width in cells.
    #[inline]
    pub const fn width(&self) -> i32 {
        self.width
    }

    /// Map height in cells.
    #[inline]
    pub const fn height(&self) -> i32 {
        self.height
    }

    /// Total number of cells.
    #[inline]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Always `false` for a constructed map; present for completeness.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Whether `p` lies inside the map.
    #[inline]
    pub const fn contains(&self, p: Point) -> bool {
        p.x >= 0 && p.x < self.width && p.y >= 0 && p.y < self.height
    }

    #[inline]
    fn idx(&self, p: Point) -> usize {
        (p.y * self.width + p.x) as usize
    }

    /// Checked cell read. `None` outside the map.
    #[inline]
    pub fn cell(&self, p: Point) -> Option<Cell> {
        if self.contains(p) {
            Some(self.cells[self.idx(p)])
        } else {
            None
        }
    }

    /// Checked cell access. `None` outside the map.
    #[inline]
    pub fn cell_mut(&mut self, p: Point) -> Option<&mut Cell> {
        if self.contains(p) {
            let i = self.idx(p);
            Some(&mut self.cells[i])
        } else {
            None
        }
    }

    /// Set transparency and walkability of one cell. Out-of-range writes are
    /// dropped.
    #[inline]
    pub fn set_properties(&mut self, p: Point, transparent: bool, walkable: bool) {
        if let Some(c) = self.cell_mut(p) {
            c.transparent = transparent;
            c.walkable = walkable;
        }
    }

    /// Whether the cell lets light through. `false` outside the map.
    #[inline]
    pub fn is_transparent(&self, p: Point) -> bool {
        self.cell(p).is_some_and(|c| c.transparent)
    }

    /// Whether the cell can be walked on. `false` outside the map.
    #[inline]
    pub fn is_walkable(&self, p: Point) -> bool {
        self.cell(p).is_some_and(|c| c.walkable)
    }

    /// Whether the cell was lit by the last field-of-view computation.
    /// `false` outside the map.
    #[inline]
    pub fn is_in_fov(&self, p: Point) -> bool {
        self.cell(p).is_some_and(|c| c.visible)
    }

    /// Mark or unmark one cell as visible. Out-of-range writes are dropped.
    #[inline]
    pub fn set_in_fov(&mut self, p: Point, visible: bool) {
        if let Some(c) = self.cell_mut(p) {
            c.visible = visible;
        }
    }

    /// Reset every cell to the given flags and clear visibility.
    pub fn clear(&mut self, transparent: bool, walkable: bool) {
        self.cells.fill(Cell {
            transparent,
            walkable,
            visible: false,
        });
    }

    /// Clear only the visibility flags.
    pub fn clear_fov(&mut self) {
        for c in &mut self.cells {
            c.visible = false;
        }
    }

    /// Copy every cell from `source`, which must have the same dimensions.
    pub fn copy_from(&mut self, source: &GridMap) -> Result<(), MapError> {
        if self.width != source.width || self.height != source.height {
            return Err(MapError::SizeMismatch {
                src: Point::new(source.width, source.height),
                dest: Point::new(self.width, self.height),
            });
        }
        self.cells.copy_from_slice(&source.cells);
        Ok(())
    }
}


#[cfg(all(test, feature = "serde"))]
mod serde_tests {
    use super::*;

    #[test]
    fn cell_roundtrip() {
        let c = Cell {
            transparent: true,
            walkable: false,
            visible: true,
        };
        let json = serde_json::to_string(&c).unwrap();
        let back: Cell = serde_json::from_str(&json).unwrap();
        assert_eq!(c, back);
    }
}
