//! Per-tick status snapshot handed to display collaborators.
//!
//! The snapshot is data only; formatting it as text is the consumer's job.

use serde::{Deserialize, Serialize};

use super::state::RigState;

/// Coarse operator alert derived from state and storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Alert {
    /// Digging or idle with enough space.
    #[default]
    Normal,
    /// Free space between the stop and start thresholds.
    LowSpace,
    /// Paused for lack of storage.
    Paused,
    /// Rig stopped.
    Stopped,
}

/// Actuator count per role, plus the ones no role was assigned to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RoleCounts {
    pub base: usize,
    pub down: usize,
    pub forward: usize,
    pub excluded: usize,
}

/// Status emitted after every tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusSnapshot {
    /// Tick counter since startup.
    pub cycle: u64,
    pub state: RigState,
    /// Group name, or empty for fixed-topology discovery.
    pub group_name: String,
    pub actuators: RoleCounts,
    pub drills: usize,
    pub rotor_present: bool,
    /// Forward advance per bore [m].
    pub forward_increment: f64,
    /// Free storage [%], 0–100.
    pub free_cargo_percent: f64,
    pub alert: Alert,
    /// Descent velocity commanded this tick [m/s], 0 outside `MovingDown`.
    pub descent_velocity: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alert_defaults_to_normal() {
        assert_eq!(Alert::default(), Alert::Normal);
    }
}
