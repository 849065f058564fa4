use crate::math::{Point2d, Vector2d};
use std::f64::consts::{FRAC_PI_2, PI};

/// A cardinal direction.
///
/// World coordinates have +x pointing east and +y pointing south.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Direction {
    North,
    East,
    South,
    West,
}

use Direction::*;

const OPPOSITE: [Direction; 4] = [South, West, North, East];
const LEFT: [Direction; 4] = [West, North, East, South];
const RIGHT: [Direction; 4] = [East, South, West, North];
const RAD: [f64; 4] = [FRAC_PI_2, 0.0, 3.0 * FRAC_PI_2, PI];
const UNIT: [(f64, f64); 4] = [(0.0, -1.0), (1.0, 0.0), (0.0, 1.0), (-1.0, 0.0)];

impl Direction {
    /// All four directions, in the order of [Direction::index].
    pub const ALL: [Direction; 4] = [North, East, South, West];

    /// The ordinal used to index direction lookup tables.
    pub const fn index(self) -> usize {
        self as usize
    }

    /// The direction facing the other way.
    pub fn opposite(self) -> Direction {
        OPPOSITE[self.index()]
    }

    /// The direction 90° anticlockwise of this one.
    pub fn left(self) -> Direction {
        LEFT[self.index()]
    }

    /// The direction 90° clockwise of this one.
    pub fn right(self) -> Direction {
        RIGHT[self.index()]
    }

    /// The heading of this direction in radians, anticlockwise from east.
    pub fn rad(self) -> f64 {
        RAD[self.index()]
    }

    /// A unit vector pointing in this direction.
    pub fn unit(self) -> Vector2d {
        let (x, y) = UNIT[self.index()];
        Vector2d::new(x, y)
    }

    /// Moves `point` by `distance` along this direction.
    pub fn offset(self, point: Point2d, distance: f64) -> Point2d {
        match self {
            North => Point2d::new(point.x, point.y - distance),
            South => Point2d::new(point.x, point.y + distance),
            East => Point2d::new(point.x + distance, point.y),
            West => Point2d::new(point.x - distance, point.y),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::math::heading_of;
    use assert_approx_eq::assert_approx_eq;

    #[test]
    fn rotations_form_a_group() {
        for d in Direction::ALL {
            assert_eq!(d.opposite().opposite(), d);
            assert_eq!(d.left().right(), d);
            assert_eq!(d.right().left(), d);
            assert_eq!(d.left().left(), d.opposite());
            assert_eq!(d.right().right(), d.opposite());
            assert_eq!(d.right().right().right().right(), d);
            assert_ne!(d.left(), d.right());
        }
    }

    #[test]
    fn indices_match_table_order() {
        for (i, d) in Direction::ALL.into_iter().enumerate() {
            assert_eq!(d.index(), i);
        }
    }

    #[test]
    fn offset_moves_along_one_axis() {
        let p = Point2d::new(10.0, 20.0);
        assert_eq!(North.offset(p, 5.0), Point2d::new(10.0, 15.0));
        assert_eq!(South.offset(p, 5.0), Point2d::new(10.0, 25.0));
        assert_eq!(East.offset(p, 5.0), Point2d::new(15.0, 20.0));
        assert_eq!(West.offset(p, 5.0), Point2d::new(5.0, 20.0));
        for d in Direction::ALL {
            assert_eq!(d.opposite().offset(d.offset(p, 3.5), 3.5), p);
            assert_eq!(d.offset(p, 2.0), p + 2.0 * d.unit());
        }
    }

    #[test]
    fn headings_match_unit_vectors() {
        for d in Direction::ALL {
            assert_approx_eq!(heading_of(d.unit()), d.rad());
        }
        assert_approx_eq!(West.rad(), PI);
        assert_approx_eq!(North.rad() - East.rad(), FRAC_PI_2);
    }
}
