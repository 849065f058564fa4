//! Traffic signal phases and the light colours they imply.

use crate::Direction;

/// The right of way given to vehicles arriving from one side of the junction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TrafficSignal {
    /// Vehicles may proceed, but must yield to oncoming traffic to turn across it.
    Permitted,
    /// Vehicles may proceed in any direction without opposing traffic.
    Protected,
    /// Vehicles must stop at the stop line.
    Halt,
}

/// One of the mutually exclusive signal phases of the junction.
///
/// Each axis (east-west and north-south) has one phase in which both
/// of its approaches are permitted, and one protected phase per approach.
/// The approaches of the other axis are always halted.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TrafficSignalPhase {
    EastWestPermitted,
    EastProtected,
    WestProtected,
    NorthSouthPermitted,
    NorthProtected,
    SouthProtected,
}

/// The colour shown by the lights facing one approach.
#[derive(PartialEq, Eq, Clone, Copy, Debug, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LightState {
    Red,
    Amber,
    Green,
    /// A green light with a protected turn indication.
    GreenArrow,
}

use TrafficSignal::*;

/// Signals by phase, then by approach side in [Direction::index] order (N, E, S, W).
const SIGNALS: [[TrafficSignal; 4]; 6] = [
    [Halt, Permitted, Halt, Permitted],
    [Halt, Protected, Halt, Halt],
    [Halt, Halt, Halt, Protected],
    [Permitted, Halt, Permitted, Halt],
    [Protected, Halt, Halt, Halt],
    [Halt, Halt, Protected, Halt],
];

impl TrafficSignalPhase {
    /// All phases, in the order of [TrafficSignalPhase::index].
    pub const ALL: [TrafficSignalPhase; 6] = [
        TrafficSignalPhase::EastWestPermitted,
        TrafficSignalPhase::EastProtected,
        TrafficSignalPhase::WestProtected,
        TrafficSignalPhase::NorthSouthPermitted,
        TrafficSignalPhase::NorthProtected,
        TrafficSignalPhase::SouthProtected,
    ];

    /// The ordinal of the phase, which doubles as a discrete control action.
    pub const fn index(self) -> usize {
        self as usize
    }

    /// The phase with the given ordinal, if there is one.
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// The signal shown to vehicles arriving from `side`.
    pub fn signal_at(self, side: Direction) -> TrafficSignal {
        SIGNALS[self.index()][side.index()]
    }
}

impl Default for TrafficSignalPhase {
    fn default() -> Self {
        TrafficSignalPhase::EastWestPermitted
    }
}

impl LightState {
    /// The colour of a steady signal.
    pub fn from_signal(signal: TrafficSignal) -> Self {
        match signal {
            Halt => LightState::Red,
            Permitted => LightState::Green,
            Protected => LightState::GreenArrow,
        }
    }

    /// The colour shown to vehicles arriving from `side` while `phase` is active.
    pub fn of(phase: TrafficSignalPhase, side: Direction) -> Self {
        Self::from_signal(phase.signal_at(side))
    }

    /// The colour shown to vehicles arriving from `side` during the
    /// clearance interval between two phases.
    ///
    /// Approaches that lose their right of way show amber;
    /// every other approach keeps the colour of the outgoing phase.
    pub fn during_change(
        from: TrafficSignalPhase,
        to: TrafficSignalPhase,
        side: Direction,
    ) -> Self {
        match (from.signal_at(side), to.signal_at(side)) {
            (Permitted | Protected, Halt) => LightState::Amber,
            (signal, _) => Self::from_signal(signal),
        }
    }
}
