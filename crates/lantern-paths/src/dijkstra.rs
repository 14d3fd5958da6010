//! Dijkstra distance fields: flood-fill distances from a root cell.
//!
//! Distances are fixed-point centi-units (`u32`, orthogonal step = 100) so
//! the flood fill compares integers instead of accumulating float error
//! across a large map. [`DistanceField::distance`] converts back to float at
//! the API boundary. Paths are read out of the finished field by gradient
//! descent rather than stored per cell, so one `compute` serves any number
//! of targets.

use lantern_core::{Direction, GridMap, Point};

use crate::PathError;
use crate::heap::SlotHeap;
use crate::traits::Mover;

/// Distance of a cell the flood fill never entered.
const UNREACHED: u32 = u32::MAX;

/// Neighbor order for relaxation and for the path descent. Earlier
/// directions win ties during descent.
const SCAN_ORDER: [Direction; 8] = [
    Direction::West,
    Direction::North,
    Direction::East,
    Direction::South,
    Direction::NorthWest,
    Direction::NorthEast,
    Direction::SouthEast,
    Direction::SouthWest,
];

// ---------------------------------------------------------------------------
// DistanceField
// ---------------------------------------------------------------------------

/// Dijkstra distance field over a grid, with greedy path extraction.
pub struct DistanceField {
    width: i32,
    height: i32,
    /// Diagonal step cost in centi-units; 0 disables diagonal movement.
    diagonal_cost: u32,
    root: Point,
    distances: Vec<u32>,
    /// Selected path, target first; walking pops from the back.
    path: Vec<Point>,
    heap: SlotHeap<u32>,
}

impl DistanceField {
    /// Create a distance field for a `width` x `height` grid.
    ///
    /// `diagonal_cost` is the relative price of a diagonal step; 0 restricts
    /// movement to the four orthogonal neighbors. Fails when either
    /// dimension is zero or negative.
    pub fn new(width: i32, height: i32, diagonal_cost: f32) -> Result<Self, PathError> {
        if width <= 0 || height <= 0 {
            return Err(PathError::InvalidSize { width, height });
        }
        Ok(Self::sized(width, height, diagonal_cost))
    }

    /// Create a distance field sized to `map`.
    pub fn for_map(map: &GridMap, diagonal_cost: f32) -> Self {
        Self::sized(map.width(), map.height(), diagonal_cost)
    }

    fn sized(width: i32, height: i32, diagonal_cost: f32) -> Self {
        let len = width as usize * height as usize;
        Self {
            width,
            height,
            // The +0.1 rides float error so 1.41 scales to 141, not 140.
            diagonal_cost: (diagonal_cost * 100.0 + 0.1) as u32,
            root: Point::ZERO,
            distances: vec![UNREACHED; len],
            path: Vec::new(),
            heap: SlotHeap::new(len),
        }
    }

    /// Flood-fill distances from `root` to every reachable cell.
    pub fn compute<M: Mover>(&mut self, mover: &M, root: Point) -> Result<(), PathError> {
        if !self.contains(root) {
            return Err(self.out_of_bounds(root));
        }
        self.root = root;
        self.distances.fill(UNREACHED);
        self.heap.clear();

        let start = self.offset(root);
        self.distances[start] = 0;
        self.heap.push(start as u32, 0);

        let neighbors = if self.diagonal_cost == 0 { 4 } else { 8 };
        while let Some(popped) = self.heap.pop() {
            let cur = self.point(popped as usize);
            let here = self.distances[popped as usize];
            for dir in &SCAN_ORDER[..neighbors] {
                let next = cur + dir.delta();
                if !self.contains(next) {
                    continue;
                }
                let cost = mover.cost(cur, next);
                if cost <= 0.0 {
                    continue;
                }
                let base = if dir.is_diagonal() { self.diagonal_cost } else { 100 };
                let total = here.saturating_add((cost * base as f32) as u32);
                let idx = self.offset(next);
                if total < self.distances[idx] {
                    self.distances[idx] = total;
                    if self.heap.contains(idx as u32) {
                        self.heap.decrease(idx as u32, total);
                    } else {
                        self.heap.push(idx as u32, total);
                    }
                }
            }
        }
        Ok(())
    }

    /// Distance from the root to `p` in base-step units.
    ///
    /// `None` when `p` lies outside the grid or the last
    /// [`compute`](Self::compute) did not reach it.
    pub fn distance(&self, p: Point) -> Option<f32> {
        if !self.contains(p) {
            return None;
        }
        match self.distances[self.offset(p)] {
            UNREACHED => None,
            centi => Some(centi as f32 * 0.01),
        }
    }

    /// Select the path from the root to `target`, replacing any stored path.
    ///
    /// The stored path excludes the root and ends at `target`; failures
    /// leave it empty. Fails when `target` lies outside the grid or the
    /// last flood fill did not reach it.
    pub fn path_set(&mut self, target: Point) -> Result<(), PathError> {
        self.path.clear();
        if !self.contains(target) {
            return Err(self.out_of_bounds(target));
        }
        if self.distances[self.offset(target)] == UNREACHED {
            return Err(PathError::Unreachable {
                from: self.root,
                to: target,
            });
        }

        let neighbors = if self.diagonal_cost == 0 { 4 } else { 8 };
        let mut cur = target;
        loop {
            self.path.push(cur);
            let mut best = self.distances[self.offset(cur)];
            let mut step = None;
            for dir in &SCAN_ORDER[..neighbors] {
                let next = cur + dir.delta();
                if !self.contains(next) {
                    continue;
                }
                let d = self.distances[self.offset(next)];
                if d < best {
                    best = d;
                    step = Some(*dir);
                }
            }
            match step {
                Some(dir) => cur = cur + dir.delta(),
                None => break,
            }
        }
        // The descent bottoms out on the root itself; the path excludes it.
        self.path.pop();
        Ok(())
    }

    /// Pop the next cell along the selected path, root side first.
    pub fn walk(&mut self) -> Option<Point> {
        self.path.pop()
    }

    /// Reverse the stored path in place.
    pub fn reverse(&mut self) {
        self.path.reverse();
    }

    /// Number of cells in the stored path.
    pub fn len(&self) -> usize {
        self.path.len()
    }

    /// Whether the stored path is empty.
    pub fn is_empty(&self) -> bool {
        self.path.is_empty()
    }

    /// The `index`-th cell of the stored path, counting from the root side.
    pub fn get(&self, index: usize) -> Option<Point> {
        let i = self.path.len().checked_sub(index + 1)?;
        self.path.get(i).copied()
    }

    fn contains(&self, p: Point) -> bool {
        p.x >= 0 && p.x < self.width && p.y >= 0 && p.y < self.height
    }

    fn offset(&self, p: Point) -> usize {
        (p.y * self.width + p.x) as usize
    }

    fn point(&self, offset: usize) -> Point {
        let width = self.width as usize;
        Point::new((offset % width) as i32, (offset / width) as i32)
    }

    fn out_of_bounds(&self, pos: Point) -> PathError {
        PathError::OutOfBounds {
            pos,
            width: self.width,
            height: self.height,
        }
    }
}
