//! Restrictive precise angle shadowcasting, after Dominik Marczuk's MRPAS.
//!
//! Each quadrant is split into two octants scanned line by line away from
//! the source. Cell visibility is decided on the angle its near, centre
//! and far slopes make with the source: opaque cells accumulate blocked
//! angle intervals that later lines are tested against, and a blocked
//! interval reaching the scan edge raises the minimum angle so whole line
//! prefixes are skipped. The radius limit caps the number of scanned
//! lines, so the lit region of an open map is a square.

use lantern_core::{GridMap, Point};

/// Blocked angle range left behind by an opaque cell.
#[derive(Copy, Clone, Debug)]
struct Interval {
    start: f64,
    end: f64,
}

/// Scans one octant, marking visible cells. `major` steps between lines,
/// `minor` steps within a line; both are unit axis vectors.
fn scan_octant(
    map: &mut GridMap,
    origin: Point,
    max_radius: i32,
    light_walls: bool,
    intervals: &mut Vec<Interval>,
    major: Point,
    minor: Point,
) {
    intervals.clear();
    let mut in_last_line = 0usize;
    let mut min_angle = 0.0f64;
    let mut iteration = 1i32;
    let mut line = origin + major;
    let mut done = !map.contains(line);
    while !done {
        let slopes_per_cell = 1.0 / f64::from(iteration);
        let half_slopes = slopes_per_cell * 0.5;
        let mut processed_cell = ((min_angle + half_slopes) / slopes_per_cell) as i32;
        let mut pos = line + minor * processed_cell;
        done = true;
        while processed_cell <= iteration && map.contains(pos) {
            let mut visible = true;
            let mut extended = false;
            let centre_slope = f64::from(processed_cell) * slopes_per_cell;
            let start_slope = centre_slope - half_slopes;
            let end_slope = centre_slope + half_slopes;
            if in_last_line > 0 && !map.is_in_fov(pos) {
                let straight = pos - major;
                let diagonal = straight - minor;
                if (!map.is_in_fov(straight) || !map.is_transparent(straight))
                    && map.contains(diagonal)
                    && (!map.is_in_fov(diagonal) || !map.is_transparent(diagonal))
                {
                    // Both parents blocked, no need to scan the intervals.
                    visible = false;
                } else {
                    let mut idx = 0;
                    while visible && idx < in_last_line {
                        let ob = intervals[idx];
                        if ob.start > end_slope || ob.end < start_slope {
                            idx += 1;
                            continue;
                        }
                        if map.is_transparent(pos) {
                            if centre_slope > ob.start && centre_slope < ob.end {
                                visible = false;
                            }
                        } else if start_slope >= ob.start && end_slope <= ob.end {
                            visible = false;
                        } else {
                            let ob = &mut intervals[idx];
                            ob.start = ob.start.min(start_slope);
                            ob.end = ob.end.max(end_slope);
                            extended = true;
                        }
                        idx += 1;
                    }
                }
            }
            if visible {
                map.set_in_fov(pos, true);
                done = false;
                if !map.is_transparent(pos) {
                    if min_angle >= start_slope {
                        min_angle = end_slope;
                        // A minimum angle hitting the scan edge blocks the
                        // rest of the octant.
                        if processed_cell == iteration {
                            done = true;
                        }
                    } else if !extended {
                        intervals.push(Interval {
                            start: start_slope,
                            end: end_slope,
                        });
                    }
                    if !light_walls {
                        map.set_in_fov(pos, false);
                    }
                }
            }
            processed_cell += 1;
            pos = pos + minor;
        }
        if iteration == max_radius {
            done = true;
        }
        iteration += 1;
        in_last_line = intervals.len();
        line = line + major;
        if !map.contains(line) {
            done = true;
        }
    }
}

fn scan_quadrant(
    map: &mut GridMap,
    origin: Point,
    max_radius: i32,
    light_walls: bool,
    intervals: &mut Vec<Interval>,
    dx: i32,
    dy: i32,
) {
    let vertical = Point::new(0, dy);
    let horizontal = Point::new(dx, 0);
    scan_octant(map, origin, max_radius, light_walls, intervals, vertical, horizontal);
    scan_octant(map, origin, max_radius, light_walls, intervals, horizontal, vertical);
}

/// Marks every cell visible from `origin`, replacing the map's previous
/// field of view.
pub(crate) fn compute(map: &mut GridMap, origin: Point, max_radius: i32, light_walls: bool) {
    map.clear_fov();
    // Obstacle estimate borrowed from the map size; dense maps may push
    // past it and grow the buffer.
    let estimate = map.len() / 7;
    let mut intervals = Vec::with_capacity(estimate);
    map.set_in_fov(origin, true);
    for (dx, dy) in [(1, 1), (1, -1), (-1, 1), (-1, -1)] {
        scan_quadrant(map, origin, max_radius, light_walls, &mut intervals, dx, dy);
    }
    if intervals.capacity() > estimate {
        log::debug!(
            "fov obstacle buffer grew past its {estimate}-slot estimate to {}",
            intervals.capacity()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::map_from;

    #[test]
    fn boxed_in_source_sees_its_walls() {
        let rows = [
            "###",
            "#.#",
            "###",
        ];
        let mut map = map_from(&rows);
        compute(&mut map, Point::new(1, 1), 0, true);
        for y in 0..3 {
            for x in 0..3 {
                assert!(map.is_in_fov(Point::new(x, y)), "cell ({x}, {y})");
            }
        }

        let mut map = map_from(&rows);
        compute(&mut map, Point::new(1, 1), 0, false);
        assert!(map.is_in_fov(Point::new(1, 1)));
        assert!(!map.is_in_fov(Point::new(0, 0)));
        assert!(!map.is_in_fov(Point::new(1, 0)));
    }

    #[test]
    fn corridor_blocked_by_wall() {
        let mut map = map_from(&["..#...."]);
        compute(&mut map, Point::new(0, 0), 0, true);
        assert!(map.is_in_fov(Point::new(1, 0)));
        assert!(map.is_in_fov(Point::new(2, 0)));
        for x in 3..7 {
            assert!(!map.is_in_fov(Point::new(x, 0)), "cell ({x}, 0)");
        }
    }

    #[test]
    fn radius_bounds_visibility_to_a_square() {
        let mut map = map_from(&["........."; 9]);
        let origin = Point::new(4, 4);
        compute(&mut map, origin, 2, true);
        for y in 0..9 {
            for x in 0..9 {
                let p = Point::new(x, y);
                let chebyshev = (p.x - origin.x).abs().max((p.y - origin.y).abs());
                assert_eq!(map.is_in_fov(p), chebyshev <= 2, "cell ({x}, {y})");
            }
        }
    }
}
