use super::{Point2d, Vector2d};
use super::curve::ParametricCurve2d;
use crate::util::Interval;
use cgmath::prelude::*;

/// A straight line segment, parameterised by the distance from its start.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LineSegment2d {
    start: Point2d,
    end: Point2d,
    length: f64,
}

impl LineSegment2d {
    /// Creates a line segment between two points.
    pub fn from_ends(start: Point2d, end: Point2d) -> Self {
        Self {
            start,
            end,
            length: start.distance(end),
        }
    }

    /// The start point of the segment.
    pub fn start(&self) -> Point2d {
        self.start
    }

    /// The end point of the segment.
    pub fn end(&self) -> Point2d {
        self.end
    }

    /// The length of the segment.
    pub fn length(&self) -> f64 {
        self.length
    }
}

impl ParametricCurve2d for LineSegment2d {
    fn sample(&self, t: f64) -> Point2d {
        if self.length == 0.0 {
            return self.start;
        }
        self.start + (self.end - self.start) * (t / self.length)
    }

    fn bounds(&self) -> Interval<f64> {
        Interval::new(0.0, self.length)
    }

    fn sample_dt(&self, _t: f64) -> Vector2d {
        if self.length == 0.0 {
            return Vector2d::zero();
        }
        (self.end - self.start) / self.length
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use assert_approx_eq::assert_approx_eq;

    #[test]
    fn samples_by_distance() {
        let line = LineSegment2d::from_ends(Point2d::new(20.0, 70.0), Point2d::new(80.0, 70.0));
        assert_eq!(line.length(), 60.0);
        let p = line.sample(15.0);
        assert_approx_eq!(p.x, 35.0);
        assert_approx_eq!(p.y, 70.0);
        assert_approx_eq!(line.heading(30.0), 0.0);
        assert_approx_eq!(line.sample_dt(0.0).magnitude(), 1.0);
    }
}
