#[cfg(feature = "debug")]
use crate::debug::{debug_event, take_debug_frame};
use crate::light::{LightState, TrafficSignal, TrafficSignalPhase};
use crate::network::Network;
use crate::obstacle::Obstacle;
use crate::vehicle::{Advance, Car, CarIntention, Vehicle};
use crate::{Direction, VehicleId, VehicleSet};
use log::{debug, trace, warn};
use smallvec::SmallVec;

/// A simulation of vehicles crossing a single signalised four-way junction.
///
/// Each call to [Simulation::step] reads every vehicle's surroundings from
/// the state at the start of the tick before any vehicle moves, so the
/// outcome does not depend on the order vehicles are stored in.
#[derive(Default)]
pub struct Simulation {
    /// The vehicles being simulated.
    vehicles: VehicleSet,
    /// The active signal phase.
    phase: TrafficSignalPhase,
    /// The emissions produced by every vehicle, including those that have left.
    emissions: f64,
    /// The current frame of simulation.
    frame: usize,
    /// The next sequence number.
    seq: usize,
    /// Debugging information from the previously simulated frame.
    #[cfg(feature = "debug")]
    debug: serde_json::Value,
}

impl Simulation {
    /// Creates a new simulation.
    pub fn new() -> Self {
        Default::default()
    }

    /// The junction the vehicles drive through.
    pub fn network(&self) -> &'static Network {
        Network::get()
    }

    /// Adds a vehicle at the start of the approach road on the given side of the junction.
    ///
    /// The lane is chosen by the car's intention: the leftmost lane to turn left,
    /// the rightmost to turn right, and the second lane to go straight on.
    pub fn spawn_car(&mut self, car: Car, side: Direction) -> VehicleId {
        let lane = self.network().entry_lane(side, car.intention);
        let seq = self.seq;
        self.seq += 1;
        let vehicle_id = self
            .vehicles
            .insert_with_key(|id| Vehicle::new(id, seq, car, lane));
        debug!(
            "Spawned {:?} from {:?} in lane {} intending to {:?}",
            vehicle_id,
            side,
            lane.index(),
            car.intention
        );
        vehicle_id
    }

    /// Advances the simulation by `dt` seconds.
    ///
    /// Vehicles move onto at most one new segment per step, so `dt`
    /// should be kept to around 0.1 or less.
    pub fn step(&mut self, dt: f64) {
        if !(dt.is_finite() && dt > 0.0) {
            warn!("Ignoring step with invalid time delta {}", dt);
            return;
        }

        let obstacles = self.find_obstacles();
        self.integrate(dt, obstacles);
        self.advance_vehicles();
        self.frame += 1;
        trace!(
            "Frame {}: {} vehicles, {:.3} emissions",
            self.frame,
            self.vehicles.len(),
            self.emissions
        );

        #[cfg(feature = "debug")]
        {
            self.debug = take_debug_frame();
        }
    }

    /// Gets the active signal phase.
    pub fn phase(&self) -> TrafficSignalPhase {
        self.phase
    }

    /// Sets the active signal phase, which takes effect from the next step.
    pub fn set_phase(&mut self, phase: TrafficSignalPhase) {
        if phase != self.phase {
            debug!("Phase changed from {:?} to {:?}", self.phase, phase);
        }
        self.phase = phase;
    }

    /// The signal shown to vehicles arriving from `side`.
    pub fn signal_at(&self, side: Direction) -> TrafficSignal {
        self.phase.signal_at(side)
    }

    /// The colour of the lights facing vehicles arriving from `side`.
    pub fn light_state(&self, side: Direction) -> LightState {
        LightState::of(self.phase, side)
    }

    /// Whether a vehicle arriving from `side` may enter the junction to follow `intention`.
    ///
    /// Turning left crosses oncoming traffic, so it is only allowed on a protected signal.
    pub fn is_entry_possible(&self, intention: CarIntention, side: Direction) -> bool {
        match (intention, self.signal_at(side)) {
            (_, TrafficSignal::Halt) => false,
            (CarIntention::TurnLeft, TrafficSignal::Permitted) => false,
            _ => true,
        }
    }

    /// Gets the current simulation frame index.
    pub fn frame(&self) -> usize {
        self.frame
    }

    /// The total emissions produced since the simulation began.
    pub fn emissions(&self) -> f64 {
        self.emissions
    }

    /// Returns an iterator over all the vehicles in the simulation.
    pub fn iter_vehicles(&self) -> impl Iterator<Item = &Vehicle> {
        self.vehicles.values()
    }

    /// Gets a reference to the vehicle with the given ID,
    /// or `None` if it has left the junction.
    pub fn vehicle(&self, vehicle_id: VehicleId) -> Option<&Vehicle> {
        self.vehicles.get(vehicle_id)
    }

    /// Returns an iterator over the vehicles still on the approach road from `side`.
    pub fn vehicles_approaching(&self, side: Direction) -> impl Iterator<Item = &Vehicle> {
        let road = self.network().approach_road(side);
        self.vehicles
            .values()
            .filter(move |vehicle| vehicle.road() == Some(road))
    }

    /// The number of vehicles on the approach road from `side`
    /// travelling slower than `speed_threshold` m/s.
    pub fn queue_length(&self, side: Direction, speed_threshold: f64) -> usize {
        self.vehicles_approaching(side)
            .filter(|vehicle| vehicle.speed() < speed_threshold)
            .count()
    }

    /// Gets the debugging information for the previously simulated frame as JSON array.
    #[cfg(feature = "debug")]
    pub fn debug(&mut self) -> serde_json::Value {
        self.debug.clone()
    }

    /// Finds the vehicle immediately ahead of the given one on the same segment.
    ///
    /// Vehicles at the same distance are ordered by when they were spawned,
    /// with the earlier vehicle treated as being in front.
    fn leader_of(&self, vehicle: &Vehicle) -> Option<&Vehicle> {
        let is_ahead = |other: &&Vehicle| {
            other.distance() > vehicle.distance()
                || (other.distance() == vehicle.distance() && other.seq() < vehicle.seq())
        };
        self.vehicles
            .values()
            .filter(|other| other.id() != vehicle.id())
            .filter(|other| other.location().same_segment(vehicle.location()))
            .filter(is_ahead)
            .min_by(|a, b| {
                a.distance()
                    .total_cmp(&b.distance())
                    .then(b.seq().cmp(&a.seq()))
            })
    }

    /// Calculates the obstacle each vehicle must respond to, from the state
    /// of all the vehicles before any of them move.
    fn find_obstacles(&self) -> Vec<(VehicleId, Option<Obstacle>)> {
        let network = self.network();
        self.vehicles
            .values()
            .map(|vehicle| {
                let obstacle = match self.leader_of(vehicle) {
                    Some(leader) => Some(Obstacle::new(
                        leader.distance() - vehicle.distance(),
                        leader.speed(),
                    )),
                    None => vehicle
                        .road()
                        .filter(|road| network.is_approach(road))
                        .filter(|road| {
                            let side = road.direction().opposite();
                            !self.is_entry_possible(vehicle.intention(), side)
                        })
                        .map(|road| Obstacle::stop_line(road.length() - vehicle.distance())),
                };
                (vehicle.id(), obstacle)
            })
            .collect()
    }

    /// Integrates the velocities and positions of all vehicles,
    /// and accumulates their emissions.
    fn integrate(&mut self, dt: f64, obstacles: Vec<(VehicleId, Option<Obstacle>)>) {
        for (vehicle_id, obstacle) in obstacles {
            let step = self.vehicles[vehicle_id].integrate(obstacle, dt);
            self.emissions += step.emissions();
        }
    }

    /// Find vehicles that have advanced past the end of their segment and either
    /// move them onto the next one or remove them from the simulation.
    fn advance_vehicles(&mut self) {
        let network = self.network();
        let mut exited: SmallVec<[VehicleId; 4]> = SmallVec::new();

        for (vehicle_id, vehicle) in &mut self.vehicles {
            let advance = vehicle.advance(network);
            match advance {
                Advance::Stayed => continue,
                Advance::Entered | Advance::Joined => {
                    debug!("{:?} {:?} at {:?}", vehicle_id, advance, vehicle.location());
                }
                Advance::Exited => exited.push(vehicle_id),
            }
            #[cfg(feature = "debug")]
            debug_event(vehicle_id, advance, vehicle.pose());
        }

        for vehicle_id in exited {
            self.vehicles.remove(vehicle_id);
            debug!("Removed {:?}", vehicle_id);
        }
    }
}
