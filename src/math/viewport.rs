use super::Point2d;

/// The extents of a 2D coordinate space, with the origin at the top left.
///
/// Viewports only describe how to rescale coordinates between spaces,
/// such as from world metres to screen pixels. They never affect the simulation.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    /// Creates a new viewport.
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// The top left corner.
    pub fn top_left(&self) -> Point2d {
        Point2d::new(0.0, 0.0)
    }

    /// The middle of the top edge.
    pub fn top_middle(&self) -> Point2d {
        Point2d::new(0.5 * self.width, 0.0)
    }

    /// The top right corner.
    pub fn top_right(&self) -> Point2d {
        Point2d::new(self.width, 0.0)
    }

    /// The middle of the left edge.
    pub fn horizon_left(&self) -> Point2d {
        Point2d::new(0.0, 0.5 * self.height)
    }

    /// The middle of the right edge.
    pub fn horizon_right(&self) -> Point2d {
        Point2d::new(self.width, 0.5 * self.height)
    }

    /// The bottom left corner.
    pub fn bottom_left(&self) -> Point2d {
        Point2d::new(0.0, self.height)
    }

    /// The middle of the bottom edge.
    pub fn bottom_middle(&self) -> Point2d {
        Point2d::new(0.5 * self.width, self.height)
    }

    /// The bottom right corner.
    pub fn bottom_right(&self) -> Point2d {
        Point2d::new(self.width, self.height)
    }

    /// The centre of the viewport.
    pub fn center(&self) -> Point2d {
        Point2d::new(0.5 * self.width, 0.5 * self.height)
    }

    /// The horizontal scale factor from this viewport to `other`.
    pub fn scale_x(&self, other: &Viewport) -> f64 {
        other.width / self.width
    }

    /// The vertical scale factor from this viewport to `other`.
    pub fn scale_y(&self, other: &Viewport) -> f64 {
        other.height / self.height
    }

    /// Maps a point in this viewport to the equivalent point in `other`.
    pub fn map_to(&self, other: &Viewport, point: Point2d) -> Point2d {
        if self == other {
            return point;
        }
        Point2d::new(point.x * self.scale_x(other), point.y * self.scale_y(other))
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use assert_approx_eq::assert_approx_eq;

    #[test]
    fn identity_mapping() {
        let world = Viewport::new(100.0, 100.0);
        let p = Point2d::new(12.345, 67.89);
        assert_eq!(world.map_to(&world, p), p);
    }

    #[test]
    fn rescales_each_axis() {
        let world = Viewport::new(100.0, 100.0);
        let screen = Viewport::new(1280.0, 720.0);
        let p = world.map_to(&screen, world.center());
        assert_approx_eq!(p.x, 640.0);
        assert_approx_eq!(p.y, 360.0);

        let back = screen.map_to(&world, world.map_to(&screen, Point2d::new(20.0, 70.0)));
        assert_approx_eq!(back.x, 20.0);
        assert_approx_eq!(back.y, 70.0);
        let corner = world.map_to(&screen, world.bottom_right());
        assert_approx_eq!(corner.x, screen.width);
        assert_approx_eq!(corner.y, screen.height);
    }
}
