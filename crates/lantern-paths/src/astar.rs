//! A* point-to-point pathfinding.
//!
//! [`AStar`] owns its search grids and the computed step list, so one object
//! can serve many `compute`/`walk` cycles without reallocating. Paths are
//! stored as [`Direction`]s with the destination-side step first; walking
//! pops origin-side steps off the back and carries the origin forward, which
//! is what lets a path be re-planned mid-walk when the terrain changes.

use lantern_core::{Direction, GridMap, Point};

use crate::PathError;
use crate::heap::SlotHeap;
use crate::traits::Mover;

/// Neighbor relaxation order, orthogonals first. Earlier directions win
/// cost ties in the came-from grid.
const RELAX_ORDER: [Direction; 8] = [
    Direction::North,
    Direction::West,
    Direction::East,
    Direction::South,
    Direction::NorthWest,
    Direction::NorthEast,
    Direction::SouthWest,
    Direction::SouthEast,
];

/// Euclidean estimate of the remaining distance.
fn estimate(from: Point, to: Point) -> f32 {
    f64::from(from.dist_squared(to)).sqrt() as f32
}

// ---------------------------------------------------------------------------
// AStar
// ---------------------------------------------------------------------------

/// A* pathfinder with incremental walking and on-demand re-planning.
///
/// The cost source is handed to [`compute`](Self::compute) and
/// [`walk`](Self::walk) per call; see [`Mover`].
pub struct AStar {
    width: i32,
    height: i32,
    diagonal_cost: f32,
    origin: Point,
    destination: Point,
    /// Cheapest cost found so far from the origin; `INFINITY` = unvisited.
    covered: Vec<f32>,
    /// Covered cost plus the Euclidean estimate to the destination.
    score: Vec<f32>,
    /// Direction of the step that entered each cell on the best route.
    came_from: Vec<Option<Direction>>,
    /// Destination-side step first; walking pops from the back.
    steps: Vec<Direction>,
    heap: SlotHeap<f32>,
}

impl AStar {
    /// Create a pathfinder for a `width` x `height` grid.
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

    /// Create a pathfinder sized to `map`.
    pub fn for_map(map: &GridMap, diagonal_cost: f32) -> Self {
        Self::sized(map.width(), map.height(), diagonal_cost)
    }

    fn sized(width: i32, height: i32, diagonal_cost: f32) -> Self {
        let len = width as usize * height as usize;
        Self {
            width,
            height,
            diagonal_cost,
            origin: Point::ZERO,
            destination: Point::ZERO,
            covered: vec![f32::INFINITY; len],
            score: vec![0.0; len],
            came_from: vec![None; len],
            steps: Vec::new(),
            heap: SlotHeap::new(len),
        }
    }

    /// Compute a path from `from` to `to`, replacing any stored path.
    ///
    /// `from == to` succeeds trivially. Fails when an endpoint is outside
    /// the grid or no route exists; the stored path is empty either way.
    pub fn compute<M: Mover>(&mut self, mover: &M, from: Point, to: Point) -> Result<(), PathError> {
        self.origin = from;
        self.destination = to;
        self.steps.clear();
        if from == to {
            return Ok(());
        }
        if !self.contains(from) {
            return Err(self.out_of_bounds(from));
        }
        if !self.contains(to) {
            return Err(self.out_of_bounds(to));
        }

        self.covered.fill(f32::INFINITY);
        self.came_from.fill(None);
        self.heap.clear();

        let start = self.offset(from);
        self.covered[start] = 0.0;
        self.score[start] = estimate(from, to);
        self.heap.push(start as u32, self.score[start]);

        let goal = self.offset(to);
        let neighbors = if self.diagonal_cost == 0.0 { 4 } else { 8 };
        while let Some(popped) = self.heap.pop() {
            if popped as usize == goal {
                break;
            }
            let cur = self.point(popped as usize);
            let covered_here = self.covered[popped as usize];
            for dir in &RELAX_ORDER[..neighbors] {
                let next = cur + dir.delta();
                if !self.contains(next) {
                    continue;
                }
                let walk_cost = mover.cost(cur, next);
                if walk_cost <= 0.0 {
                    continue;
                }
                let step = if dir.is_diagonal() { self.diagonal_cost } else { 1.0 };
                let covered = covered_here + walk_cost * step;
                let idx = self.offset(next);
                let previous = self.covered[idx];
                if covered < previous {
                    self.covered[idx] = covered;
                    self.came_from[idx] = Some(*dir);
                    if previous.is_infinite() {
                        self.score[idx] = covered + estimate(next, to);
                        self.heap.push(idx as u32, self.score[idx]);
                    } else {
                        // Cells already expanded stay out of the queue; the
                        // grids still record the cheaper route.
                        self.score[idx] -= previous - covered;
                        self.heap.decrease(idx as u32, self.score[idx]);
                    }
                }
            }
        }

        if self.covered[goal].is_infinite() {
            return Err(PathError::Unreachable { from, to });
        }

        // Rebuild the step list by following the came-from grid back from
        // the destination, so the origin-side step ends up on top.
        let mut cur = to;
        while cur != from {
            let Some(dir) = self.came_from[self.offset(cur)] else {
                break;
            };
            self.steps.push(dir);
            cur = cur - dir.delta();
        }
        Ok(())
    }

    /// Advance one step along the stored path.
    ///
    /// Returns the new origin, or `None` when the path is exhausted or the
    /// next step has become impassable. A blocked step is consumed either
    /// way; with `recalculate` set, the path is first recomputed from the
    /// current origin and walking resumes on the fresh route.
    pub fn walk<M: Mover>(&mut self, mover: &M, recalculate: bool) -> Option<Point> {
        let dir = self.steps.pop()?;
        let next = self.origin + dir.delta();
        if mover.cost(self.origin, next) <= 0.0 {
            if !recalculate {
                return None;
            }
            log::debug!("path step onto {next} blocked, re-planning from {}", self.origin);
            let (from, to) = (self.origin, self.destination);
            if self.compute(mover, from, to).is_err() {
                return None;
            }
            return self.walk(mover, recalculate);
        }
        self.origin = next;
        Some(next)
    }

    /// Swap origin and destination and invert every stored step in place.
    ///
    /// Applying it twice restores the original path exactly.
    pub fn reverse(&mut self) {
        std::mem::swap(&mut self.origin, &mut self.destination);
        for dir in &mut self.steps {
            *dir = dir.opposite();
        }
    }

    /// Current path origin. Walking moves it forward.
    pub fn origin(&self) -> Point {
        self.origin
    }

    /// Path destination.
    pub fn destination(&self) -> Point {
        self.destination
    }

    /// Number of steps left to walk.
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Whether no steps are left.
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// The cell reached after `index + 1` steps from the current origin,
    /// or `None` past the end of the path. Costs O(`index`).
    pub fn get(&self, index: usize) -> Option<Point> {
        if index >= self.steps.len() {
            return None;
        }
        let mut pos = self.origin;
        for dir in self.steps.iter().rev().take(index + 1) {
            pos = pos + dir.delta();
        }
        Some(pos)
    }

    /// Iterate over the remaining cells, origin side first, ending at the
    /// destination.
    pub fn iter(&self) -> impl Iterator<Item = Point> + '_ {
        self.steps.iter().rev().scan(self.origin, |pos, dir| {
            *pos = *pos + dir.delta();
            Some(*pos)
        })
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
