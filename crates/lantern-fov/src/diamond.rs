//! Diamond raycasting field of view.
//!
//! Rays spread outward from the source in a breadth-first diamond, each
//! cell receiving its state from the one or two rays pointing back toward
//! the source (its x and y inputs). A ray that crosses an opaque cell
//! carries an obscurity vector, a Bresenham-style error pair describing
//! the shadow cone behind the wall; merging inputs propagates and narrows
//! these cones. The final visibility of every cell is read off its ray in
//! one pass, which also clears the cells no ray reached.

use lantern_core::{GridMap, Point};

use crate::raycast::postproc;

#[derive(Copy, Clone, Debug, Default)]
struct Ray {
    xloc: i32,
    yloc: i32,
    /// Obscurity vector, zero while the ray is unobstructed.
    xob: i32,
    yob: i32,
    /// Error terms stepped along the obscurity cone.
    xerr: i32,
    yerr: i32,
    /// Arena offsets of the rays this one merges from.
    xinput: Option<u32>,
    yinput: Option<u32>,
    added: bool,
    ignore: bool,
}

fn is_obscure(r: &Ray) -> bool {
    (r.xerr > 0 && r.xerr <= r.xob) || (r.yerr > 0 && r.yerr <= r.yob)
}

fn process_x_input(ray: &mut Ray, xi: Ray) {
    if xi.xob == 0 && xi.yob == 0 {
        return;
    }
    if xi.xerr > 0 && ray.xob == 0 {
        ray.xerr = xi.xerr - xi.yob;
        ray.yerr = xi.yerr + xi.yob;
        ray.xob = xi.xob;
        ray.yob = xi.yob;
    }
    if xi.yerr <= 0 && xi.yob > 0 && xi.xerr > 0 {
        ray.yerr = xi.yerr + xi.yob;
        ray.xerr = xi.xerr - xi.yob;
        ray.xob = xi.xob;
        ray.yob = xi.yob;
    }
}

fn process_y_input(ray: &mut Ray, yi: Ray) {
    if yi.xob == 0 && yi.yob == 0 {
        return;
    }
    if yi.yerr > 0 && ray.yob == 0 {
        ray.yerr = yi.yerr - yi.xob;
        ray.xerr = yi.xerr + yi.xob;
        ray.xob = yi.xob;
        ray.yob = yi.yob;
    }
    if yi.xerr <= 0 && yi.xob > 0 && yi.yerr > 0 {
        ray.yerr = yi.yerr - yi.xob;
        ray.xerr = yi.xerr + yi.xob;
        ray.xob = yi.xob;
        ray.yob = yi.yob;
    }
}

/// One ray slot per map cell, indexed by the cell's row-major offset, plus
/// the FIFO of rays waiting to be merged and expanded.
struct DiamondScan<'a> {
    map: &'a mut GridMap,
    origin: Point,
    rays: Vec<Ray>,
    perimeter: Vec<u32>,
}

impl DiamondScan<'_> {
    /// Claims the ray slot for the cell at `(xloc, yloc)` relative to the
    /// source, or `None` when that cell is off the map.
    fn new_ray(&mut self, xloc: i32, yloc: i32) -> Option<u32> {
        let cur = self.origin.shift(xloc, yloc);
        if !self.map.contains(cur) {
            return None;
        }
        let idx = (cur.x + cur.y * self.map.width()) as u32;
        let ray = &mut self.rays[idx as usize];
        ray.xloc = xloc;
        ray.yloc = yloc;
        Some(idx)
    }

    /// Wires `input` as the target ray's x or y input and queues the target
    /// the first time it is reached.
    fn process_ray(&mut self, target: Option<u32>, input: u32) {
        let Some(idx) = target else { return };
        let input_yloc = self.rays[input as usize].yloc;
        let ray = &mut self.rays[idx as usize];
        if ray.yloc == input_yloc {
            ray.xinput = Some(input);
        } else {
            ray.yinput = Some(input);
        }
        if !ray.added {
            ray.added = true;
            self.perimeter.push(idx);
        }
    }

    /// Expands to the up-to-four neighbors leading away from the source.
    fn expand_perimeter(&mut self, from: u32) {
        let (xloc, yloc) = {
            let r = &self.rays[from as usize];
            (r.xloc, r.yloc)
        };
        if xloc >= 0 {
            let target = self.new_ray(xloc + 1, yloc);
            self.process_ray(target, from);
        }
        if xloc <= 0 {
            let target = self.new_ray(xloc - 1, yloc);
            self.process_ray(target, from);
        }
        if yloc >= 0 {
            let target = self.new_ray(xloc, yloc + 1);
            self.process_ray(target, from);
        }
        if yloc <= 0 {
            let target = self.new_ray(xloc, yloc - 1);
            self.process_ray(target, from);
        }
    }

    /// Folds the input rays' obscurity into this ray, drops it when both
    /// inputs agree it is hidden, and starts a new cone if it sits on an
    /// opaque cell.
    fn merge_input(&mut self, idx: u32) {
        let mut ray = self.rays[idx as usize];
        let xi = ray.xinput.map(|i| self.rays[i as usize]);
        let yi = ray.yinput.map(|i| self.rays[i as usize]);
        if let Some(xi) = xi {
            process_x_input(&mut ray, xi);
        }
        if let Some(yi) = yi {
            process_y_input(&mut ray, yi);
        }
        ray.ignore = match (xi, yi) {
            (None, Some(yi)) => is_obscure(&yi),
            (Some(xi), None) => is_obscure(&xi),
            (Some(xi), Some(yi)) => is_obscure(&xi) && is_obscure(&yi),
            (None, None) => false,
        };
        if !ray.ignore {
            let cur = self.origin.shift(ray.xloc, ray.yloc);
            if !self.map.is_transparent(cur) {
                ray.xerr = ray.xloc.abs();
                ray.xob = ray.xloc.abs();
                ray.yerr = ray.yloc.abs();
                ray.yob = ray.yloc.abs();
            }
        }
        self.rays[idx as usize] = ray;
    }
}

/// Marks every cell visible from `origin`, replacing the map's previous
/// field of view.
pub(crate) fn compute(map: &mut GridMap, origin: Point, max_radius: i32, light_walls: bool) {
    let ncells = map.len();
    let radius_sq = max_radius * max_radius;
    let mut scan = DiamondScan {
        map,
        origin,
        rays: vec![Ray::default(); ncells],
        perimeter: Vec::with_capacity(ncells),
    };
    if let Some(seed) = scan.new_ray(0, 0) {
        scan.expand_perimeter(seed);
    }
    let mut cursor = 0;
    while cursor < scan.perimeter.len() {
        let idx = scan.perimeter[cursor];
        cursor += 1;
        let distance = if radius_sq > 0 {
            let r = &scan.rays[idx as usize];
            r.xloc * r.xloc + r.yloc * r.yloc
        } else {
            0
        };
        if distance <= radius_sq {
            scan.merge_input(idx);
            if !scan.rays[idx as usize].ignore {
                scan.expand_perimeter(idx);
            }
        } else {
            scan.rays[idx as usize].ignore = true;
        }
    }

    // Every cell's visibility comes off its ray, so no prior clear is
    // needed; untouched slots read as not visible.
    let DiamondScan { map, rays, .. } = scan;
    let mut i = 0;
    for y in 0..map.height() {
        for x in 0..map.width() {
            let ray = &rays[i];
            let visible = ray.added && !ray.ignore && !is_obscure(ray);
            map.set_in_fov(Point::new(x, y), visible);
            i += 1;
        }
    }
    map.set_in_fov(origin, true);

    if light_walls {
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
        postproc(map, xmin, ymin, origin.x, origin.y, -1, -1);
        postproc(map, origin.x, ymin, xmax - 1, origin.y, 1, -1);
        postproc(map, xmin, origin.y, origin.x, ymax - 1, -1, 1);
        postproc(map, origin.x, origin.y, xmax - 1, ymax - 1, 1, 1);
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
        assert!(!map.is_in_fov(Point::new(3, 2)));
        assert!(!map.is_in_fov(Point::new(6, 2)));
    }

    #[test]
    fn walls_lit_by_post_pass_only() {
        let rows = [
            ".....",
            ".....",
            "..#..",
            ".....",
            ".....",
        ];
        let mut map = map_from(&rows);
        compute(&mut map, Point::new(2, 0), 0, true);
        assert!(map.is_in_fov(Point::new(2, 2)));

        let mut map = map_from(&rows);
        compute(&mut map, Point::new(2, 0), 0, false);
        assert!(!map.is_in_fov(Point::new(2, 2)));
    }

    #[test]
    fn radius_bounds_visibility_to_a_circle() {
        let mut map = map_from(&["........."; 9]);
        let origin = Point::new(4, 4);
        compute(&mut map, origin, 2, true);
        for y in 0..9 {
            for x in 0..9 {
                let p = Point::new(x, y);
                assert_eq!(
                    map.is_in_fov(p),
                    origin.dist_squared(p) <= 4,
                    "cell ({x}, {y})"
                );
            }
        }
    }
}
