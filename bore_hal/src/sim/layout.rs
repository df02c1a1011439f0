//! Simulated rig layout, loaded from the `[simulation]` TOML table.

use bore_common::consts::DEFAULT_GROUP_NAME;
use serde::{Deserialize, Serialize};

/// Shape and material model of the simulated rig.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimLayout {
    /// Block group every part belongs to.
    pub group_name: String,
    /// Vertical pistons extending upward (start fully extended).
    pub base_pistons: usize,
    /// Vertical pistons extending downward (start retracted).
    pub down_pistons: usize,
    /// Horizontal pistons extending forward (start retracted).
    pub forward_pistons: usize,
    /// Pistons mounted pointing backward; no role applies to them.
    pub backward_pistons: usize,
    /// Travel of every piston [m].
    pub piston_travel: f64,
    /// Whether the drill head rotor is present.
    pub rotor: bool,
    /// Drill units on the head.
    pub drills: usize,
    /// Containers connected to the drill head.
    pub cargo_containers: usize,
    /// Containers on the construct but not connected to the drill head.
    pub isolated_containers: usize,
    /// Capacity of each container [m³].
    pub cargo_volume: f64,
    /// Volume collected while drilling [m³/s].
    pub fill_rate: f64,
    /// Volume unloaded from storage by the outside world [m³/s].
    pub drain_rate: f64,
    /// Range sensors looking down at the bore.
    pub range_sensors: usize,
    /// Sensor height above the drill tips [m].
    pub sensor_offset: f64,
    /// Gap between drill tips and ground at startup [m].
    pub initial_clearance: f64,
}

impl Default for SimLayout {
    fn default() -> Self {
        Self {
            group_name: DEFAULT_GROUP_NAME.to_string(),
            base_pistons: 1,
            down_pistons: 2,
            forward_pistons: 2,
            backward_pistons: 0,
            piston_travel: 10.0,
            rotor: true,
            drills: 9,
            cargo_containers: 2,
            isolated_containers: 0,
            cargo_volume: 15.625,
            fill_rate: 0.05,
            drain_rate: 0.0,
            range_sensors: 0,
            sensor_offset: 2.5,
            initial_clearance: 0.0,
        }
    }
}

impl SimLayout {
    /// Bounds checks. Part counts may be zero.
    pub fn validate(&self) -> Result<(), String> {
        if !(self.piston_travel.is_finite() && self.piston_travel > 0.0) {
            return Err(format!("piston_travel must be positive, got {}", self.piston_travel));
        }
        for (name, value) in [
            ("cargo_volume", self.cargo_volume),
            ("fill_rate", self.fill_rate),
            ("drain_rate", self.drain_rate),
            ("sensor_offset", self.sensor_offset),
            ("initial_clearance", self.initial_clearance),
        ] {
            if !(value.is_finite() && value >= 0.0) {
                return Err(format!("{name} must be non-negative, got {value}"));
            }
        }
        Ok(())
    }
}
