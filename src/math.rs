//! Mathematical structs and functions.

use cgmath::{Point2, Vector2};
pub use curve::ParametricCurve2d;
pub use ellipse::{arclength, QuarterEllipse2d};
pub use line::LineSegment2d;
pub use util::*;
pub use viewport::Viewport;

mod curve;
mod ellipse;
mod line;
mod util;
mod viewport;

/// A 2D point
pub type Point2d = Point2<f64>;

/// A 2D vector
pub type Vector2d = Vector2<f64>;
