use crate::math::Point2d;
use crate::Direction;

/// The width of a single lane in m.
pub const LANE_WIDTH: f64 = 10.0;

/// A straight, one-way road made up of one or more parallel lanes.
///
/// Lane 0 runs along the road's `start` point; each further lane is offset
/// another [LANE_WIDTH] towards the driver's right.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Road {
    /// The direction of travel.
    direction: Direction,
    /// The length of the road in m.
    length: f64,
    /// The start of the centre line of lane 0.
    start: Point2d,
    /// The number of lanes.
    lanes: usize,
}

/// A single lane of a [Road].
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Lane {
    road: Road,
    index: usize,
}

impl Road {
    /// Creates a new road.
    pub fn new(direction: Direction, length: f64, start: Point2d, lanes: usize) -> Self {
        assert!(lanes > 0, "A road must have at least one lane");
        Self {
            direction,
            length,
            start,
            lanes,
        }
    }

    /// The direction of travel along the road.
    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// The length of the road in m.
    pub fn length(&self) -> f64 {
        self.length
    }

    /// The number of lanes on the road.
    pub fn lanes(&self) -> usize {
        self.lanes
    }

    /// The start of the centre line of lane 0.
    pub fn start(&self) -> Point2d {
        self.start
    }

    /// The end of the centre line of lane 0.
    pub fn end(&self) -> Point2d {
        self.direction.offset(self.start, self.length)
    }

    /// The start of the centre line of the given lane.
    pub fn start_at(&self, lane: usize) -> Point2d {
        self.direction.right().offset(self.start, LANE_WIDTH * lane as f64)
    }

    /// The end of the centre line of the given lane.
    pub fn end_at(&self, lane: usize) -> Point2d {
        self.direction.right().offset(self.end(), LANE_WIDTH * lane as f64)
    }

    /// Gets one of the road's lanes.
    ///
    /// # Panics
    /// Panics if the road has no lane with the given index.
    pub fn lane(&self, index: usize) -> Lane {
        assert!(
            index < self.lanes,
            "Lane {} does not exist on a road with {} lanes",
            index,
            self.lanes
        );
        Lane { road: *self, index }
    }

    /// The right-most lane of the road.
    pub fn last_lane(&self) -> Lane {
        self.lane(self.lanes - 1)
    }
}

impl Lane {
    /// The road the lane belongs to.
    pub fn road(&self) -> &Road {
        &self.road
    }

    /// The index of the lane within its road.
    pub fn index(&self) -> usize {
        self.index
    }

    /// The direction of travel along the lane.
    pub fn direction(&self) -> Direction {
        self.road.direction
    }

    /// The length of the lane in m.
    pub fn length(&self) -> f64 {
        self.road.length
    }

    /// The start of the lane's centre line.
    pub fn start(&self) -> Point2d {
        self.road.start_at(self.index)
    }

    /// The end of the lane's centre line.
    pub fn end(&self) -> Point2d {
        self.road.end_at(self.index)
    }

    /// The point `distance` m along the lane's centre line.
    pub fn point_at(&self, distance: f64) -> Point2d {
        self.road.direction.offset(self.start(), distance)
    }
}
