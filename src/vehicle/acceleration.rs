/// The maximum acceleration of all vehicles in ms<sup>-2</sup>.
pub const MAX_ACCELERATION: f64 = 10.0; // m/s^2

/// The maximum deceleration of all vehicles in ms<sup>-2</sup>.
pub const MAX_DECELERATION: f64 = -10.0; // m/s^2

/// The acceleration model of a vehicle.
///
/// Vehicles cruise at their target speed, and brake just hard enough to match
/// the speed of an obstacle ahead at the moment they would reach it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AccelerationModel {
    max_acc: f64,
    max_dec: f64,
}

impl Default for AccelerationModel {
    fn default() -> Self {
        Self {
            max_acc: MAX_ACCELERATION,
            max_dec: MAX_DECELERATION,
        }
    }
}

impl AccelerationModel {
    /// Calculates the acceleration needed to reach and hold the target speed.
    ///
    /// # Arguments
    /// * `vel` - The velocity of the simulated vehicle (m/s).
    /// * `target_vel` - The velocity the vehicle wants to travel at (m/s).
    pub fn free_flow(&self, vel: f64, target_vel: f64) -> f64 {
        if vel < target_vel {
            self.max_acc
        } else if vel > target_vel {
            self.max_dec
        } else {
            0.0
        }
    }

    /// Calculates the acceleration needed to follow an obstacle.
    ///
    /// # Arguments
    /// * `net_dist` - The distance between this vehicle and the obstacle (m).
    /// * `my_vel` - The velocity of the simulated vehicle (m/s).
    /// * `their_vel` - The obstacle's velocity (m/s).
    pub fn follow(&self, net_dist: f64, my_vel: f64, their_vel: f64) -> f64 {
        if net_dist <= 0.0 {
            self.max_dec
        } else if my_vel > their_vel {
            let acc = (their_vel.powi(2) - my_vel.powi(2)) / (2.0 * net_dist);
            f64::max(acc, self.max_dec)
        } else {
            self.max_acc
        }
    }

    /// The highest velocity the vehicle may travel at over the next `dt` seconds
    /// and still slow to `their_vel` before closing a gap of `net_dist`.
    pub fn safe_velocity(&self, net_dist: f64, their_vel: f64, dt: f64) -> f64 {
        let dec = -self.max_dec;
        let reach = their_vel.powi(2) + 2.0 * dec * f64::max(net_dist, 0.0);
        // Rationalised to avoid cancellation when the gap is tiny
        reach / (((dec * dt).powi(2) + reach).sqrt() + dec * dt)
    }
}
