//! Precise permissive field of view, after Jonathon Duerig's algorithm.
//!
//! Geometry is done in fixed-point units of one sixteenth of a cell. Each
//! quadrant sweeps its cells in anti-diagonal order while keeping a list
//! of open views sorted from shallow to steep, every view bounded by two
//! lines anchored on the source square. An opaque cell narrows, splits or
//! removes the views it intersects; bump chains remember the corners the
//! lines were pulled across so they can be re-tightened. The
//! permissiveness setting scales the source square from a point (0) to
//! the full cell (8).

use lantern_core::{GridMap, Point};

const STEP_SIZE: i32 = 16;

#[derive(Copy, Clone, Debug)]
struct Line {
    xi: i32,
    yi: i32,
    xf: i32,
    yf: i32,
}

impl Line {
    const fn new(xi: i32, yi: i32, xf: i32, yf: i32) -> Self {
        Self { xi, yi, xf, yf }
    }

    /// Cross product of the line direction with the direction to `(x, y)`,
    /// widened so large maps cannot overflow it.
    fn relative_slope(&self, x: i32, y: i32) -> i64 {
        i64::from(self.yf - self.yi) * i64::from(self.xf - x)
            - i64::from(self.xf - self.xi) * i64::from(self.yf - y)
    }

    fn below(&self, x: i32, y: i32) -> bool {
        self.relative_slope(x, y) > 0
    }

    fn below_or_colinear(&self, x: i32, y: i32) -> bool {
        self.relative_slope(x, y) >= 0
    }

    fn above(&self, x: i32, y: i32) -> bool {
        self.relative_slope(x, y) < 0
    }

    fn above_or_colinear(&self, x: i32, y: i32) -> bool {
        self.relative_slope(x, y) <= 0
    }

    fn colinear(&self, x: i32, y: i32) -> bool {
        self.relative_slope(x, y) == 0
    }

    fn colinear_line(&self, other: &Line) -> bool {
        self.colinear(other.xi, other.yi) && self.colinear(other.xf, other.yf)
    }
}

/// Corner a view line was pulled across, chained to the bumps before it.
#[derive(Copy, Clone, Debug)]
struct Bump {
    x: i32,
    y: i32,
    parent: Option<u32>,
}

#[derive(Copy, Clone, Debug)]
struct View {
    shallow: Line,
    steep: Line,
    shallow_bump: Option<u32>,
    steep_bump: Option<u32>,
}

/// Scan state for one quadrant. `views` and `bumps` are arenas indexed by
/// the `u32` handles stored in `active` and in the bump chains; `active`
/// keeps the open views ordered from shallow to steep and `cursor` is the
/// position the sweep is currently testing.
struct Quadrant<'a> {
    map: &'a mut GridMap,
    origin: Point,
    dx: i32,
    dy: i32,
    offset: i32,
    limit: i32,
    light_walls: bool,
    views: Vec<View>,
    bumps: Vec<Bump>,
    active: Vec<u32>,
    cursor: usize,
}

impl Quadrant<'_> {
    /// Marks the cell at quadrant coordinates `(x, y)` if visible and
    /// reports whether it blocks the view.
    fn is_blocked(&mut self, x: i32, y: i32) -> bool {
        let pos = Point::new(
            x / STEP_SIZE * self.dx + self.origin.x,
            y / STEP_SIZE * self.dy + self.origin.y,
        );
        let blocked = !self.map.is_transparent(pos);
        if !blocked || self.light_walls {
            self.map.set_in_fov(pos, true);
        }
        blocked
    }

    fn add_shallow_bump(&mut self, x: i32, y: i32, vi: usize) {
        let parent = self.views[vi].shallow_bump;
        self.bumps.push(Bump { x, y, parent });
        let view = &mut self.views[vi];
        view.shallow_bump = Some((self.bumps.len() - 1) as u32);
        view.shallow.xf = x;
        view.shallow.yf = y;
        let mut shallow = view.shallow;
        let mut cur = view.steep_bump;
        while let Some(bi) = cur {
            let bump = self.bumps[bi as usize];
            if shallow.above(bump.x, bump.y) {
                shallow.xi = bump.x;
                shallow.yi = bump.y;
            }
            cur = bump.parent;
        }
        self.views[vi].shallow = shallow;
    }

    fn add_steep_bump(&mut self, x: i32, y: i32, vi: usize) {
        let parent = self.views[vi].steep_bump;
        self.bumps.push(Bump { x, y, parent });
        let view = &mut self.views[vi];
        view.steep_bump = Some((self.bumps.len() - 1) as u32);
        view.steep.xf = x;
        view.steep.yf = y;
        let mut steep = view.steep;
        let mut cur = view.shallow_bump;
        while let Some(bi) = cur {
            let bump = self.bumps[bi as usize];
            if steep.below(bump.x, bump.y) {
                steep.xi = bump.x;
                steep.yi = bump.y;
            }
            cur = bump.parent;
        }
        self.views[vi].steep = steep;
    }

    /// Drops the view at `it` when its lines collapsed onto a single
    /// corner of the source square. Returns false when removed.
    fn check_view(&mut self, it: usize) -> bool {
        let view = &self.views[self.active[it] as usize];
        if view.shallow.colinear_line(&view.steep)
            && (view.shallow.colinear(self.offset, self.limit)
                || view.shallow.colinear(self.limit, self.offset))
        {
            self.active.remove(it);
            return false;
        }
        true
    }

    fn visit_coords(&mut self, x: i32, y: i32) {
        let (tlx, tly) = (x, y + STEP_SIZE);
        let (brx, bry) = (x + STEP_SIZE, y);
        while self.cursor < self.active.len() {
            let vi = self.active[self.cursor] as usize;
            if !self.views[vi].steep.below_or_colinear(brx, bry) {
                break;
            }
            self.cursor += 1;
        }
        if self.cursor == self.active.len() {
            return;
        }
        let vi = self.active[self.cursor] as usize;
        if self.views[vi].shallow.above_or_colinear(tlx, tly) {
            return;
        }
        if !self.is_blocked(x, y) {
            return;
        }
        let shallow_above = self.views[vi].shallow.above(brx, bry);
        let steep_below = self.views[vi].steep.below(tlx, tly);
        if shallow_above && steep_below {
            // The cell fills the view.
            self.active.remove(self.cursor);
        } else if shallow_above {
            self.add_shallow_bump(tlx, tly, vi);
            self.check_view(self.cursor);
        } else if steep_below {
            self.add_steep_bump(brx, bry, vi);
            self.check_view(self.cursor);
        } else {
            // The cell is interior to the view, which splits around it.
            let view_index = self.cursor;
            let clone = self.views[vi];
            self.views.push(clone);
            let shallower = self.views.len() - 1;
            self.active.insert(view_index, shallower as u32);
            let mut steeper_it = view_index + 1;
            self.cursor = view_index;
            self.add_steep_bump(brx, bry, shallower);
            if !self.check_view(view_index) {
                steeper_it -= 1;
            }
            let steeper_vi = self.active[steeper_it] as usize;
            self.add_shallow_bump(tlx, tly, steeper_vi);
            self.check_view(steeper_it);
            if view_index > self.active.len() {
                self.cursor = self.active.len();
            }
        }
    }

    /// Sweeps the quadrant cells in anti-diagonal order out to the given
    /// extents, seeding a single view spanning the whole quadrant.
    fn sweep(&mut self, extent_x: i32, extent_y: i32) {
        self.views.push(View {
            shallow: Line::new(self.offset, self.limit, extent_x * STEP_SIZE, 0),
            steep: Line::new(self.limit, self.offset, 0, extent_y * STEP_SIZE),
            shallow_bump: None,
            steep_bump: None,
        });
        self.active.push(0);
        self.cursor = 0;
        let max_i = extent_x + extent_y;
        let mut i = 1;
        while i != max_i + 1 && !self.active.is_empty() {
            let start_j = (i - extent_x).max(0);
            let max_j = i.min(extent_y);
            let mut j = start_j;
            while j != max_j + 1 && !self.active.is_empty() && self.cursor != self.active.len() {
                self.visit_coords((i - j) * STEP_SIZE, j * STEP_SIZE);
                j += 1;
            }
            i += 1;
            self.cursor = 0;
        }
    }
}

/// Marks every cell visible from `origin`, replacing the map's previous
/// field of view. `permissiveness` must already be validated to `0..=8`.
pub(crate) fn compute(
    map: &mut GridMap,
    origin: Point,
    max_radius: i32,
    light_walls: bool,
    permissiveness: u8,
) {
    let offset = 8 - i32::from(permissiveness);
    let limit = 8 + i32::from(permissiveness);
    map.clear_fov();
    map.set_in_fov(origin, true);
    // Per-side extents, clipped by the radius when one is set.
    let (minx, maxx, miny, maxy) = if max_radius > 0 {
        (
            origin.x.min(max_radius),
            (map.width() - origin.x - 1).min(max_radius),
            origin.y.min(max_radius),
            (map.height() - origin.y - 1).min(max_radius),
        )
    } else {
        (
            origin.x,
            map.width() - origin.x - 1,
            origin.y,
            map.height() - origin.y - 1,
        )
    };
    for (dx, dy, extent_x, extent_y) in [
        (1, 1, maxx, maxy),
        (1, -1, maxx, miny),
        (-1, -1, minx, miny),
        (-1, 1, minx, maxy),
    ] {
        let mut quadrant = Quadrant {
            map: &mut *map,
            origin,
            dx,
            dy,
            offset,
            limit,
            light_walls,
            views: Vec::new(),
            bumps: Vec::new(),
            active: Vec::new(),
            cursor: 0,
        };
        quadrant.sweep(extent_x, extent_y);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::map_from;

    #[test]
    fn pillar_blocks_its_row() {
        let rows = [
            ".......",
            ".......",
            "..#....",
            ".......",
            ".......",
        ];
        for permissiveness in [0, 4, 8] {
            let mut map = map_from(&rows);
            compute(&mut map, Point::new(0, 2), 0, true, permissiveness);
            assert!(map.is_in_fov(Point::new(1, 2)), "p={permissiveness}");
            assert!(map.is_in_fov(Point::new(2, 2)), "p={permissiveness}");
            assert!(!map.is_in_fov(Point::new(3, 2)), "p={permissiveness}");
            assert!(!map.is_in_fov(Point::new(4, 2)), "p={permissiveness}");
        }
    }

    #[test]
    fn light_walls_toggles_wall_visibility() {
        let rows = [
            ".....",
            ".....",
            "..#..",
        ];
        let mut map = map_from(&rows);
        compute(&mut map, Point::new(2, 0), 0, true, 8);
        assert!(map.is_in_fov(Point::new(2, 2)));

        let mut map = map_from(&rows);
        compute(&mut map, Point::new(2, 0), 0, false, 8);
        assert!(!map.is_in_fov(Point::new(2, 2)));
    }

    #[test]
    fn radius_bounds_visibility_to_a_square() {
        let mut map = map_from(&["........."; 9]);
        let origin = Point::new(4, 4);
        compute(&mut map, origin, 2, true, 8);
        for y in 0..9 {
            for x in 0..9 {
                let p = Point::new(x, y);
                let chebyshev = (p.x - origin.x).abs().max((p.y - origin.y).abs());
                assert_eq!(map.is_in_fov(p), chebyshev <= 2, "cell ({x}, {y})");
            }
        }
    }
}
