use super::{Point2d, Vector2d};
use cgmath::prelude::*;
use std::f64::consts::TAU;

/// Tolerance used when deciding whether a geometric offset is zero, in m.
pub const GEOMETRY_EPSILON: f64 = 1e-9;

/// Projects a point onto a local coordinate system.
///
/// # Parameters
/// * `point` - The point to project
/// * `origin` - The origin of the coordinate system
/// * `x_axis` - The basis vector pointing in the positive x-axis.
/// * `y_axis` - The basis vector pointing in the positive y-axis.
pub fn project_local(
    point: Point2d,
    origin: Point2d,
    x_axis: Vector2d,
    y_axis: Vector2d,
) -> Point2d {
    let point = point - origin;
    Point2d::new(point.dot(x_axis), point.dot(y_axis))
}

/// Computes the heading of a vector in radians, in the range `[0, 2π)`.
///
/// World coordinates have +y pointing south, so east is `0`, north is `π/2`,
/// west is `π` and south is `3π/2`.
pub fn heading_of(vec: Vector2d) -> f64 {
    let angle = f64::atan2(-vec.y, vec.x).rem_euclid(TAU);
    // `rem_euclid` can round up to exactly TAU for tiny negative angles
    if angle >= TAU {
        0.0
    } else {
        angle
    }
}

/// The signed difference `b - a` between two headings, wrapped into `(-π, π]`.
pub fn heading_difference(a: f64, b: f64) -> f64 {
    use std::f64::consts::PI;
    let diff = (b - a).rem_euclid(TAU);
    if diff > PI {
        diff - TAU
    } else {
        diff
    }
}

/// Returns true if `value` is within [GEOMETRY_EPSILON] of zero.
pub fn is_negligible(value: f64) -> bool {
    value.abs() <= GEOMETRY_EPSILON
}

#[cfg(test)]
mod test {
    use super::*;
    use assert_approx_eq::assert_approx_eq;
    use std::f64::consts::PI;

    #[test]
    fn cardinal_headings() {
        assert_approx_eq!(heading_of(Vector2d::new(1.0, 0.0)), 0.0);
        assert_approx_eq!(heading_of(Vector2d::new(0.0, -1.0)), 0.5 * PI);
        assert_approx_eq!(heading_of(Vector2d::new(-1.0, 0.0)), PI);
        assert_approx_eq!(heading_of(Vector2d::new(0.0, 1.0)), 1.5 * PI);
        assert!(heading_of(Vector2d::new(1.0, 1e-300)) < TAU);
    }

    #[test]
    fn wrapped_difference() {
        assert_approx_eq!(heading_difference(0.1, TAU - 0.1), -0.2);
        assert_approx_eq!(heading_difference(TAU - 0.1, 0.1), 0.2);
        assert_approx_eq!(heading_difference(0.5 * PI, PI), 0.5 * PI);
    }

    #[test]
    fn local_projection() {
        let p = project_local(
            Point2d::new(3.0, 4.0),
            Point2d::new(1.0, 1.0),
            Vector2d::new(0.0, 1.0),
            Vector2d::new(-1.0, 0.0),
        );
        assert_approx_eq!(p.x, 3.0);
        assert_approx_eq!(p.y, -2.0);
    }
}
