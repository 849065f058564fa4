pub use cgmath;
pub use direction::Direction;
pub use light::{LightState, TrafficSignal, TrafficSignalPhase};
pub use network::{Network, JUNCTION_BUFFER, LANES_PER_ROAD, WORLD_VIEWPORT};
pub use obstacle::Obstacle;
pub use road::{Lane, Road, LANE_WIDTH};
pub use simulation::Simulation;
use slotmap::{new_key_type, SlotMap};
pub use slotmap::{Key, KeyData};
pub use transition::{Pose, Transition, TransitionError, TransitionPath};
pub use util::Interval;
pub use vehicle::{
    Car, CarIntention, CarStep, Location, Vehicle, EMISSION_FACTOR, MAX_ACCELERATION,
    MAX_DECELERATION,
};

#[cfg(feature = "debug")]
mod debug;
mod direction;
mod light;
pub mod math;
mod network;
mod obstacle;
mod road;
mod simulation;
mod transition;
mod util;
mod vehicle;

new_key_type! {
    /// Unique ID of a [Vehicle].
    pub struct VehicleId;
}

type VehicleSet = SlotMap<VehicleId, Vehicle>;
