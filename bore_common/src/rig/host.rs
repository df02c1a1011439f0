//! Host capability contract.
//!
//! The controller never enumerates blocks itself. The host environment
//! resolves every handle once at startup through [`RigDiscovery`] and hands
//! them over as boxed capability objects. All commands are fire-and-forget:
//! setters return nothing and success is assumed.
//!
//! # Lifecycle
//!
//! 1. `RigDiscovery::discover()` - once, before the first tick
//! 2. `Plant::advance()` - host physics between ticks (simulation only)
//! 3. `StatusSink::publish()` - once per tick with the status snapshot

use std::fmt;
use std::time::Duration;

use thiserror::Error;

use super::geometry::{ReferenceFrame, Vec3};
use super::status::StatusSnapshot;

/// Linear actuator handle.
pub trait Piston {
    /// Host-side display name, used in diagnostics only.
    fn name(&self) -> &str;

    /// Base-to-extended direction in world space. Need not be normalized.
    fn extension_vector(&self) -> Vec3;

    /// Current extension [m].
    fn current_position(&self) -> f64;

    /// Physical travel lower bound [m].
    fn lowest_position(&self) -> f64;

    /// Physical travel upper bound [m].
    fn highest_position(&self) -> f64;

    fn min_limit(&self) -> f64;
    fn max_limit(&self) -> f64;
    fn set_min_limit(&mut self, limit: f64);
    fn set_max_limit(&mut self, limit: f64);

    /// Commanded velocity [m/s]; positive extends.
    fn velocity(&self) -> f64;
    fn set_velocity(&mut self, velocity: f64);

    /// Maximum impulse along and across the actuator axis [N].
    fn set_impulse_limits(&mut self, axis: f64, non_axis: f64);

    /// Share the inertia tensor with the attached sub-grid.
    fn set_shared_inertia(&mut self, shared: bool);
}

/// Rotary joint that spins the drill head.
pub trait Rotor {
    fn target_rpm(&self) -> f64;
    fn set_target_rpm(&mut self, rpm: f64);
    fn set_shared_inertia(&mut self, shared: bool);
}

/// One drill unit of the drill head.
pub trait Drill {
    fn is_enabled(&self) -> bool;
    fn set_enabled(&mut self, enabled: bool);
}

/// Storage container that may receive drilled material.
pub trait CargoHold {
    fn has_inventory(&self) -> bool;
    fn is_functional(&self) -> bool;

    /// Directly or transitively connected to the drill head's inventory.
    fn is_connected_to_drill_head(&self) -> bool;

    /// Capacity [m³].
    fn max_volume(&self) -> f64;

    /// Occupied volume [m³].
    fn current_volume(&self) -> f64;
}

/// Ranging sensor mounted on the rig, casting along its own facing.
pub trait RangeSensor {
    /// Cast up to `range` metres; distance to the first hit, or `None`.
    fn raycast(&mut self, range: f64) -> Option<f64>;
}

/// Which blocks belong to this rig.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RigSelector {
    /// Every part is a member of the named block group.
    Group(String),
    /// Fixed topology: every part on the controller's own construct.
    Construct,
}

/// Discovery failed outright (as opposed to finding an incomplete rig).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DiscoveryError {
    #[error("could not find group with name: {0}")]
    GroupNotFound(String),

    #[error("host error: {0}")]
    Host(String),
}

/// Everything the controller needs from the host, resolved once.
pub struct RigHandles {
    /// Orientation of the controlling block.
    pub frame: ReferenceFrame,
    pub pistons: Vec<Box<dyn Piston>>,
    pub rotor: Option<Box<dyn Rotor>>,
    pub drills: Vec<Box<dyn Drill>>,
    pub cargo: Vec<Box<dyn CargoHold>>,
    pub range_sensors: Vec<Box<dyn RangeSensor>>,
}

impl RigHandles {
    /// Handles with no parts at all, oriented with the default frame.
    pub fn empty() -> Self {
        Self {
            frame: ReferenceFrame::default(),
            pistons: Vec::new(),
            rotor: None,
            drills: Vec::new(),
            cargo: Vec::new(),
            range_sensors: Vec::new(),
        }
    }
}

impl fmt::Debug for RigHandles {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RigHandles")
            .field("frame", &self.frame)
            .field("pistons", &self.pistons.len())
            .field("rotor", &self.rotor.is_some())
            .field("drills", &self.drills.len())
            .field("cargo", &self.cargo.len())
            .field("range_sensors", &self.range_sensors.len())
            .finish()
    }
}

/// Host discovery collaborator.
pub trait RigDiscovery {
    fn discover(&mut self, selector: &RigSelector) -> Result<RigHandles, DiscoveryError>;
}

/// Host physics, advanced between controller ticks.
///
/// A real host runs its own physics; only simulated hosts implement this.
pub trait Plant {
    fn advance(&mut self, dt: Duration);
}

/// Consumer of the per-tick status snapshot (a display, a log, a socket).
pub trait StatusSink {
    fn publish(&mut self, snapshot: &StatusSnapshot);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_handles_debug_shows_counts() {
        let handles = RigHandles::empty();
        let dbg = format!("{handles:?}");
        assert!(dbg.contains("pistons: 0"));
        assert!(dbg.contains("rotor: false"));
    }

    #[test]
    fn discovery_error_display() {
        let err = DiscoveryError::GroupNotFound("Autominer 1".to_string());
        assert_eq!(err.to_string(), "could not find group with name: Autominer 1");
    }
}
