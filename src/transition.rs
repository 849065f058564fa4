//! Paths through the interior of the junction.

use crate::math::{
    heading_of, is_negligible, project_local, LineSegment2d, ParametricCurve2d, Point2d,
    QuarterEllipse2d, GEOMETRY_EPSILON,
};
use crate::road::Lane;
use crate::Direction;
use cgmath::prelude::*;
use thiserror::Error;

/// The position and heading of a vehicle in world space.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Pose {
    /// The position of the vehicle in m.
    pub position: Point2d,
    /// The heading of the vehicle in radians, anticlockwise from east.
    pub heading: f64,
}

/// Errors raised when joining two lanes with a transition.
#[derive(Debug, Error, Clone, Copy, PartialEq)]
pub enum TransitionError {
    #[error("cannot perform a U-turn from {from:?} to {to:?}")]
    UTurn { from: Direction, to: Direction },
    #[error("lanes meet at the same point, leaving nothing to traverse")]
    Degenerate,
    #[error("destination lane starts behind or beside the end of the approach lane")]
    Unreachable,
}

/// The geometry of a transition.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TransitionPath {
    /// A straight path travelled at a constant heading.
    Straight { line: LineSegment2d, heading: f64 },
    /// A 90° turn.
    Turn(QuarterEllipse2d),
}

/// A path through the junction from the end of one lane to the start of another.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Transition {
    from: Lane,
    to: Lane,
    path: TransitionPath,
}

impl Transition {
    /// Joins the end of the `from` lane to the start of the `to` lane.
    pub fn new(from: Lane, to: Lane) -> Result<Self, TransitionError> {
        let (a, b) = (from.end(), to.start());
        let (u, v) = (from.direction(), to.direction());

        if v == u.opposite() {
            return Err(TransitionError::UTurn { from: u, to: v });
        }
        if is_negligible(a.distance(b)) {
            return Err(TransitionError::Degenerate);
        }

        let path = if u == v {
            TransitionPath::Straight {
                line: LineSegment2d::from_ends(a, b),
                heading: u.rad(),
            }
        } else {
            let offsets = project_local(b, a, u.unit(), v.unit());
            // A 90° turn can only move forwards along both headings
            if offsets.x < -GEOMETRY_EPSILON || offsets.y < -GEOMETRY_EPSILON {
                return Err(TransitionError::Unreachable);
            }
            if is_negligible(offsets.x) || is_negligible(offsets.y) {
                // Purely lateral or purely longitudinal, so there is no curve to follow
                TransitionPath::Straight {
                    line: LineSegment2d::from_ends(a, b),
                    heading: heading_of(b - a),
                }
            } else {
                TransitionPath::Turn(QuarterEllipse2d::between(a, u.unit(), b, v.unit()))
            }
        };

        Ok(Self { from, to, path })
    }

    /// The lane the transition leaves.
    pub fn from(&self) -> &Lane {
        &self.from
    }

    /// The lane the transition joins.
    pub fn to(&self) -> &Lane {
        &self.to
    }

    /// The geometry of the transition.
    pub fn path(&self) -> &TransitionPath {
        &self.path
    }

    /// Whether the transition curves through 90°.
    pub fn is_turn(&self) -> bool {
        matches!(self.path, TransitionPath::Turn(_))
    }

    /// Whether both transitions join the same pair of lanes.
    pub fn same_route(&self, other: &Transition) -> bool {
        self.from == other.from && self.to == other.to
    }

    /// The length of the transition in m.
    pub fn max_distance(&self) -> f64 {
        match &self.path {
            TransitionPath::Straight { line, .. } => line.length(),
            TransitionPath::Turn(curve) => curve.length(),
        }
    }

    /// The pose of a vehicle `distance` m along the transition.
    pub fn pose(&self, distance: f64) -> Pose {
        match &self.path {
            TransitionPath::Straight { line, heading } => Pose {
                position: line.sample(line.bounds().clamp(distance)),
                heading: *heading,
            },
            TransitionPath::Turn(curve) => {
                let t = curve.bounds().clamp(distance);
                Pose {
                    position: curve.sample(t),
                    heading: curve.heading(t),
                }
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::math::heading_difference;
    use crate::network::Network;
    use crate::road::Road;
    use crate::CarIntention;
    use assert_approx_eq::assert_approx_eq;
    use itertools::iproduct;
    use std::f64::consts::{FRAC_PI_2, PI};
    use Direction::*;

    fn assert_pose_eq(a: Pose, b: Pose) {
        assert!(
            a.position.distance(b.position) < 1e-6,
            "{:?} != {:?}",
            a.position,
            b.position
        );
        assert!(heading_difference(a.heading, b.heading).abs() < 1e-6);
    }

    fn lane_end_pose(lane: &Lane) -> Pose {
        Pose {
            position: lane.end(),
            heading: lane.direction().rad(),
        }
    }

    fn lane_start_pose(lane: &Lane) -> Pose {
        Pose {
            position: lane.start(),
            heading: lane.direction().rad(),
        }
    }

    /// The path through the junction for a vehicle arriving from `side`.
    fn junction_path(side: Direction, intention: CarIntention) -> Transition {
        let net = Network::get();
        let entry = net.entry_lane(side, intention);
        Transition::new(entry, net.exit_lane(&entry, intention)).unwrap()
    }

    /// Checks the transition meets both lanes with matching position and heading,
    /// moves continuously, and turns monotonically through the expected angle.
    fn check_continuity(transition: &Transition, total_turn: f64) {
        let length = transition.max_distance();
        assert_pose_eq(transition.pose(0.0), lane_end_pose(transition.from()));
        assert_pose_eq(transition.pose(length), lane_start_pose(transition.to()));

        let steps = 1000;
        let ds = length / steps as f64;
        let mut last = transition.pose(0.0);
        let mut turned = 0.0;
        for i in 1..=steps {
            let pose = transition.pose(i as f64 * ds);
            assert!(pose.position.distance(last.position) <= ds * 1.6 + 1e-9);
            let delta = heading_difference(last.heading, pose.heading);
            assert!(delta * total_turn.signum() >= -1e-12);
            assert!(delta.abs() < 0.01);
            turned += delta;
            last = pose;
        }
        assert_approx_eq!(turned, total_turn, 1e-6);
    }

    #[test]
    fn every_junction_movement_is_smooth() {
        for (side, intention) in iproduct!(Direction::ALL, CarIntention::ALL) {
            let transition = junction_path(side, intention);
            let total_turn = match intention {
                CarIntention::Continue => 0.0,
                CarIntention::TurnLeft => FRAC_PI_2,
                CarIntention::TurnRight => -FRAC_PI_2,
            };
            assert_eq!(transition.is_turn(), intention != CarIntention::Continue);
            check_continuity(&transition, total_turn);
        }
    }

    #[test]
    fn junction_turns_are_circular() {
        let transition = junction_path(West, CarIntention::TurnLeft);
        assert_approx_eq!(transition.max_distance(), 0.5 * PI * 40.0);

        let transition = junction_path(West, CarIntention::TurnRight);
        assert_approx_eq!(transition.max_distance(), 0.5 * PI * 10.0);
        match transition.path() {
            TransitionPath::Turn(curve) => assert!(curve.is_circular()),
            path => panic!("Expected a turn, got {:?}", path),
        }
    }

    #[test]
    fn straight_through_keeps_heading() {
        let transition = junction_path(West, CarIntention::Continue);
        assert_eq!(transition.max_distance(), 60.0);
        for i in 0..=60 {
            let pose = transition.pose(i as f64);
            assert_eq!(pose.heading, East.rad());
            assert_approx_eq!(pose.position.x, 20.0 + i as f64);
            assert_eq!(pose.position.y, 70.0);
        }
    }

    #[test]
    fn elliptical_turns_are_smooth() {
        // Right turn with a long run-in and a short lateral offset.
        let from = Road::new(East, 20.0, Point2d::new(0.0, 60.0), 1).lane(0);
        let to = Road::new(South, 20.0, Point2d::new(55.0, 68.0), 1).lane(0);
        let transition = Transition::new(from, to).unwrap();
        match transition.path() {
            TransitionPath::Turn(curve) => {
                assert!(!curve.is_circular());
                assert_approx_eq!(curve.longitudinal_offset(), 35.0);
                assert_approx_eq!(curve.lateral_offset(), 8.0);
            }
            path => panic!("Expected a turn, got {:?}", path),
        }
        check_continuity(&transition, -FRAC_PI_2);

        // Left turn with a short run-in and a long lateral offset.
        let from = Road::new(South, 20.0, Point2d::new(40.0, 0.0), 1).lane(0);
        let to = Road::new(East, 20.0, Point2d::new(52.0, 70.0), 1).lane(0);
        check_continuity(&Transition::new(from, to).unwrap(), FRAC_PI_2);
    }

    #[test]
    fn lane_realignment_is_straight() {
        let from = Road::new(East, 20.0, Point2d::new(0.0, 60.0), 2).lane(0);
        let to = Road::new(East, 20.0, Point2d::new(80.0, 60.0), 2).lane(1);
        let transition = Transition::new(from, to).unwrap();
        assert!(!transition.is_turn());
        assert_approx_eq!(transition.max_distance(), 3700f64.sqrt());
        let mid = transition.pose(0.5 * transition.max_distance());
        assert_eq!(mid.heading, East.rad());
        assert_approx_eq!(mid.position.x, 50.0);
        assert_approx_eq!(mid.position.y, 65.0);
    }

    #[test]
    fn degenerate_perpendicular_offsets() {
        // The destination starts directly ahead of the approach, with no lateral offset.
        let from = Road::new(East, 20.0, Point2d::new(0.0, 60.0), 1).lane(0);
        let to = Road::new(North, 20.0, Point2d::new(30.0, 60.0), 1).lane(0);
        let transition = Transition::new(from, to).unwrap();
        assert!(!transition.is_turn());
        assert_eq!(transition.max_distance(), 10.0);
        let pose = transition.pose(5.0);
        assert!(pose.heading.is_finite());
        assert_approx_eq!(pose.position.x, 25.0);
    }

    #[test]
    fn rejects_u_turns() {
        let net = Network::get();
        let from = net.approach_road(West).lane(0);
        let to = net.destination_road(West).lane(0);
        assert_eq!(
            Transition::new(from, to),
            Err(TransitionError::UTurn { from: East, to: West })
        );
    }

    #[test]
    fn pose_is_clamped_to_the_path() {
        for intention in CarIntention::ALL {
            let transition = junction_path(South, intention);
            let length = transition.max_distance();
            assert_pose_eq(transition.pose(-5.0), transition.pose(0.0));
            assert_pose_eq(transition.pose(length + 5.0), lane_start_pose(transition.to()));
        }
    }

    #[test]
    fn rejects_backward_turns() {
        let from = Road::new(East, 20.0, Point2d::new(0.0, 60.0), 1).lane(0);

        // Starts behind the end of the approach
        let to = Road::new(North, 20.0, Point2d::new(10.0, 40.0), 1).lane(0);
        assert_eq!(Transition::new(from, to), Err(TransitionError::Unreachable));

        // Starts on the wrong side, so the turn would have to swing backwards
        let to = Road::new(North, 20.0, Point2d::new(30.0, 70.0), 1).lane(0);
        assert_eq!(Transition::new(from, to), Err(TransitionError::Unreachable));

        let to = Road::new(South, 20.0, Point2d::new(10.0, 70.0), 1).lane(0);
        assert_eq!(Transition::new(from, to), Err(TransitionError::Unreachable));

        // Turning right onto a lane ahead and to the right is fine
        let to = Road::new(South, 20.0, Point2d::new(30.0, 70.0), 1).lane(0);
        let transition = Transition::new(from, to).unwrap();
        assert_pose_eq(transition.pose(0.0), lane_end_pose(&from));
    }

    #[test]
    fn rejects_coincident_lanes() {
        let from = Road::new(East, 20.0, Point2d::new(0.0, 60.0), 1).lane(0);
        let to = Road::new(East, 20.0, Point2d::new(20.0, 60.0), 1).lane(0);
        assert_eq!(Transition::new(from, to), Err(TransitionError::Degenerate));
    }
}
