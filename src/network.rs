//! The road layout of the four-way junction.

use crate::math::Viewport;
use crate::road::{Lane, Road, LANE_WIDTH};
use crate::{CarIntention, Direction};
use once_cell::sync::Lazy;

/// The extents of the simulated world in m, with the junction at its centre.
pub const WORLD_VIEWPORT: Viewport = Viewport::new(100.0, 100.0);

/// The gap between the centre of the junction and the ends of every road, in m.
pub const JUNCTION_BUFFER: f64 = 3.0 * LANE_WIDTH;

/// The number of lanes on every road.
pub const LANES_PER_ROAD: usize = 2;

static NETWORK: Lazy<Network> = Lazy::new(|| Network::new(WORLD_VIEWPORT));

use Direction::*;

/// The heading a vehicle leaves the junction with, by intention and arrival heading.
const EXIT_HEADING: [[Direction; 4]; 3] = [
    [North, East, South, West],
    [West, North, East, South],
    [East, South, West, North],
];

/// The eight roads meeting at the junction.
///
/// Every leg of the junction has the same geometry, rotated through 90°
/// about the centre, so turns are identical whichever leg a vehicle uses.
#[derive(Clone, Debug)]
pub struct Network {
    viewport: Viewport,
    /// Approach roads, indexed by the side vehicles arrive from.
    approach: [Road; 4],
    /// Destination roads, indexed by the direction vehicles leave towards.
    destination: [Road; 4],
}

impl Network {
    /// The shared junction used by every simulation.
    pub fn get() -> &'static Network {
        &NETWORK
    }

    /// Lays out a junction at the centre of `viewport`.
    pub fn new(viewport: Viewport) -> Self {
        let centre = viewport.center();
        let approach = Direction::ALL.map(|side| {
            let heading = side.opposite();
            let half_span = Self::half_span(&viewport, heading);
            let start = heading.right().offset(side.offset(centre, half_span), LANE_WIDTH);
            Road::new(heading, half_span - JUNCTION_BUFFER, start, LANES_PER_ROAD)
        });
        let destination = Direction::ALL.map(|heading| {
            let half_span = Self::half_span(&viewport, heading);
            let start = heading.right().offset(heading.offset(centre, JUNCTION_BUFFER), LANE_WIDTH);
            Road::new(heading, half_span - JUNCTION_BUFFER, start, LANES_PER_ROAD)
        });
        Self {
            viewport,
            approach,
            destination,
        }
    }

    /// The distance from the centre to the edge of the viewport along `heading`.
    fn half_span(viewport: &Viewport, heading: Direction) -> f64 {
        match heading {
            East | West => 0.5 * viewport.width,
            North | South => 0.5 * viewport.height,
        }
    }

    /// The coordinate space the network is laid out in.
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// The road carrying vehicles that arrive from the given side of the junction.
    pub fn approach_road(&self, side: Direction) -> &Road {
        &self.approach[side.index()]
    }

    /// The road carrying vehicles that leave the junction towards `heading`.
    pub fn destination_road(&self, heading: Direction) -> &Road {
        &self.destination[heading.index()]
    }

    /// Whether the road leads into the junction.
    pub fn is_approach(&self, road: &Road) -> bool {
        self.approach_road(road.direction().opposite()) == road
    }

    /// Returns an iterator over all eight roads.
    pub fn iter_roads(&self) -> impl Iterator<Item = &Road> {
        self.approach.iter().chain(self.destination.iter())
    }

    /// The lane a vehicle arriving from `side` joins, given where it will turn.
    pub fn entry_lane(&self, side: Direction, intention: CarIntention) -> Lane {
        let road = self.approach_road(side);
        match intention {
            CarIntention::Continue => road.lane(1.min(road.lanes() - 1)),
            CarIntention::TurnLeft => road.lane(0),
            CarIntention::TurnRight => road.last_lane(),
        }
    }

    /// The lane a vehicle leaving `approach` joins on the far side of the junction.
    pub fn exit_lane(&self, approach: &Lane, intention: CarIntention) -> Lane {
        let heading = EXIT_HEADING[intention.index()][approach.direction().index()];
        let road = self.destination_road(heading);
        match intention {
            CarIntention::Continue => road.lane(approach.index().min(road.lanes() - 1)),
            CarIntention::TurnLeft => road.lane(0),
            CarIntention::TurnRight => road.last_lane(),
        }
    }
}
