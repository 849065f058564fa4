use super::{heading_of, Point2d, Vector2d};
use crate::util::Interval;

/// A parametric curve in 2D space.
pub trait ParametricCurve2d {
    /// Samples the parametric curve.
    fn sample(&self, t: f64) -> Point2d;

    /// Returns the minimum and maximum t-values that define the bounds of the curve.
    fn bounds(&self) -> Interval<f64>;

    /// Samples the derivative of the parametric curve.
    fn sample_dt(&self, t: f64) -> Vector2d;

    /// The heading of the curve's tangent at `t`, in radians.
    fn heading(&self, t: f64) -> f64 {
        heading_of(self.sample_dt(t))
    }
}
