//! Movement-cost sources for the pathfinders.

use lantern_core::{GridMap, Point};

/// A source of movement costs between adjacent cells.
///
/// The returned value multiplies the base step cost (1 for orthogonal moves,
/// the pathfinder's `diagonal_cost` for diagonal ones). Zero or negative
/// means the step is not allowed.
///
/// Movers are passed to each [`compute`](crate::AStar::compute) and
/// [`walk`](crate::AStar::walk) call rather than stored, so re-planning sees
/// whatever the terrain looks like now.
pub trait Mover {
    /// Cost of moving from `from` onto the adjacent cell `to`.
    fn cost(&self, from: Point, to: Point) -> f32;
}

/// Walkable cells cost 1, everything else is impassable.
impl Mover for GridMap {
    fn cost(&self, _from: Point, to: Point) -> f32 {
        if self.is_walkable(to) { 1.0 } else { 0.0 }
    }
}

impl<F> Mover for F
where
    F: Fn(Point, Point) -> f32,
{
    fn cost(&self, from: Point, to: Point) -> f32 {
        self(from, to)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn map_mover_follows_walkability() {
        let mut map = GridMap::new(3, 3).unwrap();
        map.clear(true, true);
        map.set_properties(Point::new(1, 1), true, false);
        assert_eq!(map.cost(Point::new(0, 1), Point::new(0, 0)), 1.0);
        assert_eq!(map.cost(Point::new(0, 1), Point::new(1, 1)), 0.0);
        // out of bounds reads as unwalkable
        assert_eq!(map.cost(Point::new(0, 0), Point::new(-1, 0)), 0.0);
    }

    #[test]
    fn closure_mover_sees_both_endpoints() {
        let swamp = Point::new(2, 2);
        let mover = |from: Point, to: Point| {
            if from == swamp || to == swamp {
                3.0
            } else {
                1.0
            }
        };
        assert_eq!(mover.cost(Point::new(1, 2), swamp), 3.0);
        assert_eq!(mover.cost(swamp, Point::new(3, 2)), 3.0);
        assert_eq!(mover.cost(Point::new(0, 0), Point::new(1, 0)), 1.0);
    }
}
