//! Recursive shadowcasting field of view, after Björn Bergström.
//!
//! The map is divided into eight octants around the source. Each octant is
//! scanned row by row while tracking the angular window still lit; an
//! opaque cell narrows the window and recurses on the part of the octant
//! that stays visible past it. Cells are tested against the slopes of
//! their near and far corners, so shadows have clean edges and the scan
//! touches each cell at most a few times.

use lantern_core::{GridMap, Point};

/// Octant transform applied to the scan-local `(dx, dy)` offsets.
#[derive(Copy, Clone, Debug)]
struct Octant {
    xx: i32,
    xy: i32,
    yx: i32,
    yy: i32,
}

#[rustfmt::skip]
const OCTANTS: [Octant; 8] = [
    Octant { xx:  1, xy:  0, yx:  0, yy:  1 },
    Octant { xx:  0, xy:  1, yx:  1, yy:  0 },
    Octant { xx:  0, xy: -1, yx:  1, yy:  0 },
    Octant { xx: -1, xy:  0, yx:  0, yy:  1 },
    Octant { xx: -1, xy:  0, yx:  0, yy: -1 },
    Octant { xx:  0, xy: -1, yx: -1, yy:  0 },
    Octant { xx:  0, xy:  1, yx: -1, yy:  0 },
    Octant { xx:  1, xy:  0, yx:  0, yy: -1 },
];

struct Scan<'a> {
    map: &'a mut GridMap,
    origin: Point,
    radius: i32,
    radius_sq: i32,
    light_walls: bool,
}

impl Scan<'_> {
    /// Scans one octant from `row` outward, keeping the cells whose slope
    /// lies within `[end, start]` lit (slopes shrink toward `end`).
    fn cast_light(&mut self, octant: Octant, row: i32, mut start: f32, end: f32) {
        if start < end {
            return;
        }
        let mut new_start = 0.0f32;
        for j in row..=self.radius {
            let dy = -j;
            let mut dx = -j - 1;
            let mut blocked = false;
            while dx <= 0 {
                dx += 1;
                let cur = Point::new(
                    self.origin.x + dx * octant.xx + dy * octant.xy,
                    self.origin.y + dx * octant.yx + dy * octant.yy,
                );
                // Cells outside the map still advance the scan but take no
                // part in the slope bookkeeping.
                if !self.map.contains(cur) {
                    continue;
                }
                let l_slope = (dx as f32 - 0.5) / (dy as f32 + 0.5);
                let r_slope = (dx as f32 + 0.5) / (dy as f32 - 0.5);
                if start < r_slope {
                    continue;
                } else if end > l_slope {
                    break;
                }
                if dx * dx + dy * dy <= self.radius_sq
                    && (self.light_walls || self.map.is_transparent(cur))
                {
                    self.map.set_in_fov(cur, true);
                }
                if blocked {
                    if !self.map.is_transparent(cur) {
                        new_start = r_slope;
                        continue;
                    }
                    blocked = false;
                    start = new_start;
                } else if !self.map.is_transparent(cur) && j < self.radius {
                    blocked = true;
                    self.cast_light(octant, j + 1, start, l_slope);
                    new_start = r_slope;
                }
            }
            if blocked {
                break;
            }
        }
    }
}

/// Marks every cell visible from `origin`, replacing the map's previous
/// field of view.
pub(crate) fn compute(map: &mut GridMap, origin: Point, max_radius: i32, light_walls: bool) {
    map.clear_fov();
    let radius = if max_radius == 0 {
        // Unlimited: use a radius that covers the whole map from `origin`.
        let rx = (map.width() - origin.x).max(origin.x);
        let ry = (map.height() - origin.y).max(origin.y);
        f64::from(rx * rx + ry * ry).sqrt() as i32 + 1
    } else {
        max_radius
    };
    let mut scan = Scan {
        map,
        origin,
        radius,
        radius_sq: radius * radius,
        light_walls,
    };
    for octant in OCTANTS {
        scan.cast_light(octant, 1, 1.0, 0.0);
    }
    scan.map.set_in_fov(origin, true);
}
