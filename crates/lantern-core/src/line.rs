//! Bresenham line stepping over grid cells.
//!
//! [`LineStepper`] owns its complete state, so any number of lines can be
//! stepped concurrently or interleaved. The cell sequence matches the
//! classic integer Bresenham with doubled deltas; the raycasting
//! field-of-view algorithms depend on it cell for cell.

use crate::geom::Point;

/// Incremental Bresenham walk from one cell to another.
///
/// [`step`](Self::step) yields every cell after the origin, destination
/// included. The origin itself is not yielded; callers that want it visit it
/// first (or use [`line`]).
#[derive(Copy, Clone, Debug)]
pub struct LineStepper {
    cur: Point,
    dest: Point,
    delta: Point,
    step: Point,
    err: i32,
}

impl LineStepper {
    /// Set up a walk from `from` to `to`.
    pub fn new(from: Point, to: Point) -> Self {
        let delta = to - from;
        let step = Point::new(delta.x.signum(), delta.y.signum());
        // Error term starts at the dominant axis magnitude; deltas are
        // doubled so the half-cell threshold stays integral.
        let err = if step.x * delta.x > step.y * delta.y {
            step.x * delta.x
        } else {
            step.y * delta.y
        };
        Self {
            cur: from,
            dest: to,
            delta: delta * 2,
            step,
            err,
        }
    }

    /// Advance one cell. `None` once the destination has been reached.
    pub fn step(&mut self) -> Option<Point> {
        if self.step.x * self.delta.x > self.step.y * self.delta.y {
            if self.cur.x == self.dest.x {
                return None;
            }
            self.cur.x += self.step.x;
            self.err -= self.step.y * self.delta.y;
            if self.err < 0 {
                self.cur.y += self.step.y;
                self.err += self.step.x * self.delta.x;
            }
        } else {
            if self.cur.y == self.dest.y {
                return None;
            }
            self.cur.y += self.step.y;
            self.err -= self.step.x * self.delta.x;
            if self.err < 0 {
                self.cur.x += self.step.x;
                self.err += self.step.y * self.delta.y;
            }
        }
        Some(self.cur)
    }
}

impl Iterator for LineStepper {
    type Item = Point;

    #[inline]
    fn next(&mut self) -> Option<Point> {
        self.step()
    }
}

/// Visit every cell from `from` to `to` in order, origin first.
///
/// Stops early and returns `false` as soon as `listener` does.
pub fn line(from: Point, to: Point, mut listener: impl FnMut(Point) -> bool) -> bool {
    if !listener(from) {
        return false;
    }
    let mut stepper = LineStepper::new(from, to);
    while let Some(p) = stepper.step() {
        if !listener(p) {
            return false;
        }
    }
    true
}
