use self::acceleration::AccelerationModel;
pub use self::acceleration::{MAX_ACCELERATION, MAX_DECELERATION};
use crate::network::Network;
use crate::obstacle::Obstacle;
use crate::road::{Lane, Road};
use crate::transition::{Pose, Transition};
use crate::util::clamp;
use crate::VehicleId;

mod acceleration;

/// The emissions produced per unit of kinetic energy gained, per kg.
pub const EMISSION_FACTOR: f64 = 0.5;

/// Where a vehicle intends to go once it reaches the junction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CarIntention {
    Continue,
    TurnLeft,
    TurnRight,
}

impl CarIntention {
    /// All intentions, in the order of [CarIntention::index].
    pub const ALL: [CarIntention; 3] = [
        CarIntention::Continue,
        CarIntention::TurnLeft,
        CarIntention::TurnRight,
    ];

    /// The ordinal used to index intention lookup tables.
    pub const fn index(self) -> usize {
        self as usize
    }
}

/// The longitudinal state of a vehicle, independent of where it is.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Car {
    /// The velocity in m/s.
    pub speed: f64,
    /// The velocity the car travels at when unobstructed, in m/s.
    pub target_speed: f64,
    /// Where the car is going.
    pub intention: CarIntention,
}

/// The outcome of a single [Car::step].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CarStep {
    /// The velocity before the step in m/s.
    pub speed_before: f64,
    /// The velocity after the step in m/s.
    pub speed: f64,
    /// The distance travelled during the step in m.
    pub distance: f64,
}

impl CarStep {
    /// The emissions caused by the step, which are non-zero only when the car sped up.
    pub fn emissions(&self) -> f64 {
        if self.speed > self.speed_before {
            EMISSION_FACTOR * (self.speed.powi(2) - self.speed_before.powi(2))
        } else {
            0.0
        }
    }
}

impl Car {
    /// Creates a new car.
    pub fn new(speed: f64, target_speed: f64, intention: CarIntention) -> Self {
        Self {
            speed,
            target_speed,
            intention,
        }
    }

    /// Updates the car's velocity over `dt` seconds, then returns the distance travelled.
    ///
    /// The distance is integrated from the updated velocity,
    /// which is always kept within `[0, target_speed]`.
    ///
    /// # Parameters
    /// * `obstacle` - The nearest obstacle ahead, if any
    /// * `dt` - The time step in seconds
    pub fn step(&mut self, obstacle: Option<Obstacle>, dt: f64) -> CarStep {
        let model = AccelerationModel::default();
        let speed_before = self.speed;

        let speed = match obstacle {
            None => self.speed + dt * model.free_flow(self.speed, self.target_speed),
            Some(obstacle) => {
                let acc = model.follow(obstacle.gap, self.speed, obstacle.vel);
                let speed = self.speed + dt * acc;
                if acc > 0.0 {
                    f64::min(speed, model.safe_velocity(obstacle.gap, obstacle.vel, dt))
                } else {
                    speed
                }
            }
        };

        self.speed = clamp(speed, 0.0, self.target_speed);
        CarStep {
            speed_before,
            speed: self.speed,
            distance: self.speed * dt,
        }
    }
}

/// Where a vehicle is in the network.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Location {
    /// Travelling along a lane.
    OnLane(Lane),
    /// Crossing the junction between two lanes.
    InTransition(Transition),
}

impl Location {
    /// The length of the current segment in m.
    pub fn max_distance(&self) -> f64 {
        match self {
            Location::OnLane(lane) => lane.length(),
            Location::InTransition(transition) => transition.max_distance(),
        }
    }

    /// Whether both locations are the same lane, or the same path through the junction.
    pub fn same_segment(&self, other: &Location) -> bool {
        match (self, other) {
            (Location::OnLane(a), Location::OnLane(b)) => a == b,
            (Location::InTransition(a), Location::InTransition(b)) => a.same_route(b),
            _ => false,
        }
    }
}

/// The result of [Vehicle::advance].
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Advance {
    /// The vehicle is still within its segment.
    Stayed,
    /// The vehicle left its approach lane and entered the junction.
    Entered,
    /// The vehicle crossed the junction and joined its destination lane.
    Joined,
    /// The vehicle reached the end of its destination lane and left the network.
    Exited,
}

/// A simulated vehicle.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Vehicle {
    /// The vehicle's ID
    id: VehicleId,
    /// The order in which the vehicle was spawned.
    seq: usize,
    /// The vehicle's dynamics.
    car: Car,
    /// The longitudinal position along the current segment, in m.
    distance: f64,
    /// The vehicle's location in the network.
    location: Location,
    /// The emissions the vehicle has produced.
    emissions: f64,
}

impl Vehicle {
    /// Creates a new vehicle at the start of the given lane.
    pub(crate) fn new(id: VehicleId, seq: usize, car: Car, lane: Lane) -> Self {
        Self {
            id,
            seq,
            car,
            distance: 0.0,
            location: Location::OnLane(lane),
            emissions: 0.0,
        }
    }

    /// Gets the vehicle's ID.
    pub fn id(&self) -> VehicleId {
        self.id
    }

    /// The order in which the vehicle was spawned.
    pub fn seq(&self) -> usize {
        self.seq
    }

    /// The vehicle's dynamics.
    pub fn car(&self) -> &Car {
        &self.car
    }

    /// The vehicle's velocity in m/s.
    pub fn speed(&self) -> f64 {
        self.car.speed
    }

    /// Where the vehicle is going.
    pub fn intention(&self) -> CarIntention {
        self.car.intention
    }

    /// The distance travelled along the current segment in m.
    pub fn distance(&self) -> f64 {
        self.distance
    }

    /// The vehicle's location in the network.
    pub fn location(&self) -> &Location {
        &self.location
    }

    /// The lane the vehicle is on, if it isn't crossing the junction.
    pub fn lane(&self) -> Option<&Lane> {
        match &self.location {
            Location::OnLane(lane) => Some(lane),
            Location::InTransition(_) => None,
        }
    }

    /// The path the vehicle is following through the junction, if it is crossing it.
    pub fn transition(&self) -> Option<&Transition> {
        match &self.location {
            Location::OnLane(_) => None,
            Location::InTransition(transition) => Some(transition),
        }
    }

    /// The road the vehicle is on, if it isn't crossing the junction.
    pub fn road(&self) -> Option<&Road> {
        self.lane().map(|lane| lane.road())
    }

    /// The length of the vehicle's current segment in m.
    pub fn max_distance(&self) -> f64 {
        self.location.max_distance()
    }

    /// Whether the vehicle has travelled past the end of its current segment.
    pub fn is_out_of_bounds(&self) -> bool {
        self.distance > self.max_distance()
    }

    /// The emissions the vehicle has produced so far.
    pub fn emissions(&self) -> f64 {
        self.emissions
    }

    /// The vehicle's position and heading in world space.
    pub fn pose(&self) -> Pose {
        match &self.location {
            Location::OnLane(lane) => Pose {
                position: lane.point_at(self.distance),
                heading: lane.direction().rad(),
            },
            Location::InTransition(transition) => transition.pose(self.distance),
        }
    }

    /// Moves the vehicle forward over `dt` seconds.
    ///
    /// # Parameters
    /// * `obstacle` - The nearest obstacle ahead, if any
    /// * `dt` - The time step in seconds
    pub(crate) fn integrate(&mut self, obstacle: Option<Obstacle>, dt: f64) -> CarStep {
        let step = self.car.step(obstacle, dt);
        self.distance += step.distance;
        self.emissions += step.emissions();
        step
    }

    /// Checks whether the vehicle has travelled past the end of its current segment,
    /// and if so moves it onto the next one.
    ///
    /// At most one segment is advanced per call; any distance left over
    /// is wrapped into the length of the new segment.
    pub(crate) fn advance(&mut self, network: &Network) -> Advance {
        if !self.is_out_of_bounds() {
            return Advance::Stayed;
        }
        let overshoot = self.distance - self.max_distance();

        let (location, advance) = match self.location {
            Location::OnLane(lane) if network.is_approach(lane.road()) => {
                let exit = network.exit_lane(&lane, self.car.intention);
                let transition =
                    Transition::new(lane, exit).expect("Junction lanes never require a U-turn");
                (Location::InTransition(transition), Advance::Entered)
            }
            Location::OnLane(_) => return Advance::Exited,
            Location::InTransition(transition) => {
                (Location::OnLane(*transition.to()), Advance::Joined)
            }
        };

        self.distance = overshoot % location.max_distance();
        self.location = location;
        advance
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use assert_approx_eq::assert_approx_eq;
    use rand::{Rng, SeedableRng};

    #[test]
    fn accelerates_to_target_speed() {
        let mut car = Car::new(0.0, 10.0, CarIntention::Continue);
        for i in 1..=10 {
            let step = car.step(None, 0.1);
            assert_approx_eq!(step.speed, i as f64);
            assert_approx_eq!(step.distance, 0.1 * i as f64);
        }
        for _ in 0..10 {
            let step = car.step(None, 0.1);
            assert_eq!(step.speed, 10.0);
            assert_eq!(step.emissions(), 0.0);
        }
    }

    #[test]
    fn never_exceeds_target_speed() {
        let mut car = Car::new(0.0, 7.5, CarIntention::TurnLeft);
        let mut speeds = vec![];
        for _ in 0..20 {
            speeds.push(car.step(None, 0.1).speed);
        }
        assert!(speeds.iter().all(|s| *s <= 7.5));
        assert_eq!(*speeds.last().unwrap(), 7.5);
    }

    #[test]
    fn slows_down_when_over_target_speed() {
        let mut car = Car::new(10.0, 10.0, CarIntention::Continue);
        car.target_speed = 5.0;
        let step = car.step(None, 0.1);
        assert_eq!(step.speed, 5.0);
        assert_eq!(step.emissions(), 0.0);
    }

    #[test]
    fn brakes_for_contact() {
        let mut car = Car::new(8.0, 10.0, CarIntention::Continue);
        let step = car.step(Some(Obstacle::new(0.0, 20.0)), 0.1);
        assert_approx_eq!(step.speed, 7.0);
        assert_approx_eq!(step.distance, 0.7);
    }

    #[test]
    fn brakes_to_match_obstacle() {
        let mut car = Car::new(10.0, 10.0, CarIntention::Continue);
        let step = car.step(Some(Obstacle::stop_line(20.0)), 0.1);
        assert_approx_eq!(step.speed, 10.0 - 0.25);
    }

    #[test]
    fn accelerates_when_not_closing() {
        let mut car = Car::new(4.0, 10.0, CarIntention::Continue);
        let step = car.step(Some(Obstacle::new(50.0, 6.0)), 0.1);
        assert_approx_eq!(step.speed, 5.0);
        assert_approx_eq!(step.emissions(), EMISSION_FACTOR * 9.0);
    }

    #[test]
    fn creeps_but_never_reaches_stop_line() {
        let mut car = Car::new(0.0, 10.0, CarIntention::Continue);
        let (line, mut pos) = (20.0, 19.95);
        for _ in 0..100 {
            let step = car.step(Some(Obstacle::stop_line(line - pos)), 0.1);
            pos += step.distance;
            assert!(pos <= line);
        }
        assert!(pos > 19.95);
    }

    /// A faster car following a slower one at a safe distance never catches it.
    #[test]
    fn follower_never_passes_leader() {
        let mut rng = rand::rngs::StdRng::from_seed(*b"Two cars, one lane, zero dents..");
        let dt = 0.1;
        for _ in 0..200 {
            let leader_speed = rng.gen_range(0.0..15.0);
            let mut leader = Car::new(leader_speed, leader_speed, CarIntention::Continue);
            let follower_speed = rng.gen_range(leader_speed..20.0);
            let mut follower = Car::new(follower_speed, 20.0, CarIntention::Continue);

            let braking =
                (follower_speed.powi(2) - leader_speed.powi(2)) / (2.0 * -MAX_DECELERATION);
            let mut leader_pos = braking + rng.gen_range(0.01..20.0);
            let mut follower_pos = 0.0;

            for _ in 0..500 {
                let obstacle = Obstacle::new(leader_pos - follower_pos, leader.speed);
                let lead = leader.step(None, dt);
                let follow = follower.step(Some(obstacle), dt);
                leader_pos += lead.distance;
                follower_pos += follow.distance;
                assert!(follower_pos <= leader_pos);
            }
        }
    }
}
