use std::f64::consts::PI;
use std::time::Duration;

use glam::DVec2;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Physics constants of a carryall.
///
/// Rates are per simulation tick; the integration factor scales position
/// updates and spin-up rates, not the frame's wall-clock time.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct VehicleTunables {
    pub body_rotation_limit: f64,
    pub body_rotation_speed: f64,
    /// Thrust-vector limit either side of its rest pose at -π/2.
    pub engine_rotation_limit: f64,
    pub engine_rotation_speed: f64,
    pub stability_power: f64,
    pub engine_power: f64,
    pub drag: f64,
    /// Component-wise velocity multiplier on ground contact.
    pub bounce_damping: DVec2,
    pub gravity: DVec2,
    pub integration_factor: f64,
    pub spin_up_rise: f64,
    pub spin_up_fall: f64,
    /// Level the sync key restarts the spin-up from.
    pub sync_preset: f64,
    pub ground_level: f64,
    /// Body tilt beyond which ground contact is a crash.
    pub upset_tilt: f64,
    pub shock_absorption: f64,
    pub crash_stress: f64,
    /// No overstress crash before this much run time has passed.
    pub crash_grace: Duration,
    /// Altitude where pressure starts to fall off.
    pub pressure_floor: f64,
    /// Altitude span over which pressure falls to zero.
    pub pressure_band: f64,
    pub average_velocity_ceiling: f64,
    pub average_window: Duration,
    pub average_capacity: usize,
}

impl Default for VehicleTunables {
    fn default() -> Self {
        let integration_factor = 0.02;
        Self {
            body_rotation_limit: PI / 1.5,
            body_rotation_speed: 0.25,
            engine_rotation_limit: PI / 1.5,
            engine_rotation_speed: 0.25,
            stability_power: 1.0,
            engine_power: 4.0,
            drag: 0.005,
            bounce_damping: DVec2::new(0.75, -0.5),
            gravity: DVec2::new(0.0, -0.15),
            integration_factor,
            spin_up_rise: 0.25 * integration_factor,
            spin_up_fall: 0.15 * integration_factor,
            sync_preset: 0.9,
            ground_level: 167.0,
            upset_tilt: PI / 8.0,
            shock_absorption: 15.0,
            crash_stress: 3.8,
            crash_grace: Duration::from_secs(3),
            pressure_floor: 1000.0,
            pressure_band: 2000.0,
            average_velocity_ceiling: 100.0,
            average_window: Duration::from_secs(1),
            average_capacity: 1000,
        }
    }
}

impl VehicleTunables {
    /// Combined thrust at full stability and main power.
    pub fn max_power(&self) -> f64 {
        self.stability_power + self.engine_power
    }

    /// Atmospheric pressure at `altitude`, in `[0.0, 1.0]`.
    pub fn pressure_at(&self, altitude: f64) -> f64 {
        if self.pressure_band <= 0.0 {
            return if altitude <= self.pressure_floor { 1.0 } else { 0.0 };
        }
        (1.0 - (altitude - self.pressure_floor) / self.pressure_band).clamp(0.0, 1.0)
    }
}
