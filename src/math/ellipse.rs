use super::curve::ParametricCurve2d;
use super::{project_local, Point2d, Vector2d};
use crate::util::Interval;
use std::f64::consts::{FRAC_PI_2, PI};

/// Approximates the perimeter of a quarter ellipse with semi-axes `a` and `b`
/// using Ramanujan's formula. Reduces to `π·a/2` for a circle.
pub fn arclength(a: f64, b: f64) -> f64 {
    let (a, b) = (a.abs(), b.abs());
    if a == b {
        return FRAC_PI_2 * a;
    }
    0.25 * PI * (3.0 * (a + b) - ((3.0 * a + b) * (a + 3.0 * b)).sqrt())
}

/// A quarter of an ellipse joining two perpendicular headings,
/// parameterised by the distance travelled along it.
///
/// The curve leaves `start` tangent to `start_dir` and arrives at the end
/// point tangent to `end_dir`, turning through exactly 90°. With
/// `p` and `q` the longitudinal and lateral offsets of the end point,
///
/// ```text
/// P(θ) = start + p·sin(θ)·start_dir + q·(1 - cos(θ))·end_dir,  θ ∈ [0, π/2]
/// ```
///
/// which is a circular arc when `|p| == |q|`. The parameter maps linearly
/// from distance to `θ`, so the heading changes monotonically.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct QuarterEllipse2d {
    start: Point2d,
    start_dir: Vector2d,
    end_dir: Vector2d,
    long: f64,
    lat: f64,
    length: f64,
}

impl QuarterEllipse2d {
    /// Creates the quarter ellipse from `start` (heading along `start_dir`)
    /// to `end` (heading along `end_dir`).
    ///
    /// The directions must be perpendicular unit vectors, and the end point must
    /// lie strictly ahead of the start along both `start_dir` and `end_dir`,
    /// otherwise the curve would not meet the given tangents.
    pub fn between(start: Point2d, start_dir: Vector2d, end: Point2d, end_dir: Vector2d) -> Self {
        let offsets = project_local(end, start, start_dir, end_dir);
        let (long, lat) = (offsets.x, offsets.y);
        debug_assert!(long > 0.0 && lat > 0.0, "End point is not ahead along both headings");
        Self {
            start,
            start_dir,
            end_dir,
            long,
            lat,
            length: arclength(long, lat),
        }
    }

    /// The offset of the end point along the starting heading.
    pub fn longitudinal_offset(&self) -> f64 {
        self.long
    }

    /// The offset of the end point along the final heading.
    pub fn lateral_offset(&self) -> f64 {
        self.lat
    }

    /// Whether the curve is a circular arc.
    pub fn is_circular(&self) -> bool {
        self.long.abs() == self.lat.abs()
    }

    /// The length of the curve.
    pub fn length(&self) -> f64 {
        self.length
    }

    fn angle(&self, t: f64) -> f64 {
        (FRAC_PI_2 * t / self.length).clamp(0.0, FRAC_PI_2)
    }
}

impl ParametricCurve2d for QuarterEllipse2d {
    fn sample(&self, t: f64) -> Point2d {
        let (sin, cos) = self.angle(t).sin_cos();
        self.start + self.start_dir * (self.long * sin) + self.end_dir * (self.lat * (1.0 - cos))
    }

    fn bounds(&self) -> Interval<f64> {
        Interval::new(0.0, self.length)
    }

    fn sample_dt(&self, t: f64) -> Vector2d {
        let (sin, cos) = self.angle(t).sin_cos();
        let dtheta = FRAC_PI_2 / self.length;
        (self.start_dir * (self.long * cos) + self.end_dir * (self.lat * sin)) * dtheta
    }
}
