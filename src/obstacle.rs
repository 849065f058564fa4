/// Represents a vehicle, stop line or other object
/// a vehicle may need to follow or stop before reaching.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Obstacle {
    /// The distance ahead of the vehicle to the obstacle in m.
    pub gap: f64,
    /// The velocity of the obstacle in m/s.
    pub vel: f64,
}

impl Obstacle {
    /// Creates a new obstacle.
    pub const fn new(gap: f64, vel: f64) -> Self {
        Self { gap, vel }
    }

    /// A stationary obstacle, such as a stop line.
    pub const fn stop_line(gap: f64) -> Self {
        Self { gap, vel: 0.0 }
    }
}
