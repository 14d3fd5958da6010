//! Circular raycasting field of view.
//!
//! Casts a Bresenham ray from the source to every cell on the perimeter of
//! the radius-clipped bounding box and marks cells until a ray leaves the
//! radius, leaves the map, or passes through an opaque cell. Fast and
//! simple, but rays to adjacent perimeter cells overlap, so it both
//! over-scans and misses some corner cases that the other algorithms
//! handle. When `light_walls` is set, a post-pass lights the opaque cells
//! bordering lit transparent ones in each quadrant.

use lantern_core::{GridMap, LineStepper, Point};

/// Marks every cell visible from `origin`, replacing the map's previous
/// field of view.
pub(crate) fn compute(map: &mut GridMap, origin: Point, max_radius: i32, light_walls: bool) {
    let mut xmin = 0;
    let mut ymin = 0;
    let mut xmax = map.width();
    let mut ymax = map.height();
    if max_radius > 0 {
        xmin = (origin.x - max_radius).max(0);
        ymin = (origin.y - max_radius).max(0);
        xmax = (origin.x + max_radius + 1).min(map.width());
        ymax = (origin.y + max_radius + 1).min(map.height());
    }
    map.clear_fov();
    let radius_sq = if max_radius > 0 { max_radius * max_radius } else { 0 };

    // One ray per cell of the clip box perimeter, walked clockwise. The
    // bottom row runs all the way to column 0 and the left column stops
    // above row 0; rays aimed outside the box die on the radius check.
    for xo in xmin..xmax {
        cast_ray(map, origin, Point::new(xo, ymin), radius_sq, light_walls);
    }
    for yo in (ymin + 1)..ymax {
        cast_ray(map, origin, Point::new(xmax - 1, yo), radius_sq, light_walls);
    }
    for xo in (0..=xmax - 2).rev() {
        cast_ray(map, origin, Point::new(xo, ymax - 1), radius_sq, light_walls);
    }
    for yo in (1..=ymax - 2).rev() {
        cast_ray(map, origin, Point::new(xmin, yo), radius_sq, light_walls);
    }

    if light_walls {
        postproc(map, xmin, ymin, origin.x, origin.y, -1, -1);
        postproc(map, origin.x, ymin, xmax - 1, origin.y, 1, -1);
        postproc(map, xmin, origin.y, origin.x, ymax - 1, -1, 1);
        postproc(map, origin.x, origin.y, xmax - 1, ymax - 1, 1, 1);
    }
}

/// Walks one ray from `origin` to `dest`, marking cells as visible until
/// the ray is stopped. A zero `radius_sq` means no distance limit.
fn cast_ray(map: &mut GridMap, origin: Point, dest: Point, radius_sq: i32, light_walls: bool) {
    let mut blocked = false;
    map.set_in_fov(origin, true);
    let mut stepper = LineStepper::new(origin, dest);
    while let Some(cur) = stepper.step() {
        if radius_sq > 0 && origin.dist_squared(cur) > radius_sq {
            return;
        }
        if !map.contains(cur) {
            return;
        }
        if !blocked && !map.is_transparent(cur) {
            blocked = true;
        } else if blocked {
            return;
        }
        if light_walls || !blocked {
            map.set_in_fov(cur, true);
        }
    }
}

/// Lights opaque cells adjacent to a lit transparent cell, looking in the
/// `(dx, dy)` direction within the `(x0, y0)..=(x1, y1)` rectangle. Run
/// once per quadrant so walls are lit from the side facing the source.
pub(crate) fn postproc(map: &mut GridMap, x0: i32, y0: i32, x1: i32, y1: i32, dx: i32, dy: i32) {
    for cx in x0..=x1 {
        for cy in y0..=y1 {
            let cur = Point::new(cx, cy);
            if !map.is_in_fov(cur) || !map.is_transparent(cur) {
                continue;
            }
            let x2 = cx + dx;
            let y2 = cy + dy;
            if x2 >= x0 && x2 <= x1 {
                let side = Point::new(x2, cy);
                if !map.is_transparent(side) {
                    map.set_in_fov(side, true);
                }
            }
            if y2 >= y0 && y2 <= y1 {
                let side = Point::new(cx, y2);
                if !map.is_transparent(side) {
                    map.set_in_fov(side, true);
                }
            }
            if x2 >= x0 && x2 <= x1 && y2 >= y0 && y2 <= y1 {
                let diag = Point::new(x2, y2);
                if !map.is_transparent(diag) {
                    map.set_in_fov(diag, true);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::map_from;

    #[test]
    fn pillar_casts_shadow() {
        let mut map = map_from(&[
            ".......",
            ".......",
            "..#....",
            ".......",
            ".......",
        ]);
        compute(&mut map, Point::new(0, 2), 0, true);
        assert!(map.is_in_fov(Point::new(2, 2)));
        assert!(!map.is_in_fov(Point::new(4, 2)));
        assert!(!map.is_in_fov(Point::new(6, 2)));
    }

    #[test]
    fn radius_clips_open_map() {
        let mut map = map_from(&["........."; 9]);
        let origin = Point::new(4, 4);
        compute(&mut map, origin, 2, true);
        assert!(map.is_in_fov(Point::new(4, 2)));
        assert!(!map.is_in_fov(Point::new(4, 1)));
        assert!(!map.is_in_fov(Point::new(8, 8)));
    }

    #[test]
    fn light_walls_toggles_wall_visibility() {
        let rows = [
            ".....",
            ".....",
            "...#.",
            ".....",
            ".....",
        ];
        let wall = Point::new(3, 2);

        let mut map = map_from(&rows);
        compute(&mut map, Point::new(0, 2), 0, true);
        assert!(map.is_in_fov(wall));

        let mut map = map_from(&rows);
        compute(&mut map, Point::new(0, 2), 0, false);
        assert!(!map.is_in_fov(wall));
    }

    #[test]
    fn postproc_lights_wall_beside_lit_floor() {
        let mut map = map_from(&[
            ".....",
            ".###.",
            ".....",
        ]);
        compute(&mut map, Point::new(2, 2), 0, true);
        assert!(map.is_in_fov(Point::new(1, 1)));
        assert!(map.is_in_fov(Point::new(2, 1)));
        assert!(map.is_in_fov(Point::new(3, 1)));
    }
}
