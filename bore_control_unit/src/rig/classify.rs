//! Actuator role classification.
//!
//! Each actuator's extension vector is projected onto the rig frame's four
//! reference directions. The largest projection picks the role, with ties
//! resolved Up, Forward, Down. An actuator whose largest projection is
//! Backward (or whose vector is degenerate) gets no role and is reported.

use bore_common::rig::config::MotionConfig;
use bore_common::rig::geometry::{ReferenceFrame, Vec3};
use bore_common::rig::host::{
    CargoHold, DiscoveryError, Drill, RangeSensor, RigHandles, Rotor,
};
use bore_common::rig::state::ActuatorRole;
use thiserror::Error;
use tracing::{debug, error, info, warn};

use super::groups::{PistonHandle, RoleGroups};

/// Classification or discovery failure. The controller stays stopped.
#[derive(Debug, Error)]
pub enum ClassifyError {
    #[error("could not find a rotor in the rig")]
    MissingRotor,

    #[error("no actuators found in the rig")]
    NoActuators,

    #[error(transparent)]
    Discovery(#[from] DiscoveryError),
}

/// Role for a single extension vector, or `None` when Backward dominates or
/// the vector has no direction.
pub fn classify_direction(direction: Vec3, frame: &ReferenceFrame) -> Option<ActuatorRole> {
    let unit = direction.normalized()?;
    let up = unit.dot(frame.up);
    let down = unit.dot(frame.down);
    let forward = unit.dot(frame.forward);
    let backward = unit.dot(frame.backward);
    let max = up.max(down).max(forward).max(backward);

    if up == max {
        Some(ActuatorRole::Base)
    } else if forward == max {
        Some(ActuatorRole::Forward)
    } else if down == max {
        Some(ActuatorRole::Down)
    } else {
        None
    }
}

/// Result of partitioning the discovered actuators.
#[derive(Debug, Default)]
pub struct Classification {
    pub groups: RoleGroups,
    /// Names of actuators no role was assigned to.
    pub excluded: Vec<String>,
}

/// Everything the controller drives, resolved and configured.
pub struct RigSetup {
    pub groups: RoleGroups,
    pub excluded: Vec<String>,
    pub rotor: Box<dyn Rotor>,
    pub drills: Vec<Box<dyn Drill>>,
    pub cargo: Vec<Box<dyn CargoHold>>,
    pub range_sensors: Vec<Box<dyn RangeSensor>>,
}

impl std::fmt::Debug for RigSetup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RigSetup")
            .field("groups", &self.groups)
            .field("excluded", &self.excluded)
            .field("drills", &self.drills.len())
            .field("cargo", &self.cargo.len())
            .field("range_sensors", &self.range_sensors.len())
            .finish()
    }
}

/// Assigns roles and applies the static actuator configuration.
pub struct ActuatorClassifier<'a> {
    motion: &'a MotionConfig,
}

impl<'a> ActuatorClassifier<'a> {
    pub fn new(motion: &'a MotionConfig) -> Self {
        Self { motion }
    }

    /// Partition `pistons` by role.
    ///
    /// Every actuator is stopped first. Forward actuators hold their
    /// current extension as the max limit until commanded.
    pub fn partition(&self, frame: &ReferenceFrame, pistons: Vec<PistonHandle>) -> Classification {
        let mut result = Classification::default();

        for mut piston in pistons {
            piston.set_velocity(0.0);
            match classify_direction(piston.extension_vector(), frame) {
                Some(role) => {
                    if role == ActuatorRole::Forward {
                        let position = piston.current_position();
                        piston.set_max_limit(position);
                    }
                    debug!(piston = piston.name(), ?role, "Actuator classified");
                    result.groups.push(role, piston);
                }
                None => {
                    warn!(
                        piston = piston.name(),
                        "Actuator points backward or has no direction, excluded from all roles"
                    );
                    result.excluded.push(piston.name().to_string());
                }
            }
        }

        result
    }

    /// Limits, impulse caps and inertia sharing for every classified actuator.
    pub fn apply_static_limits(&self, groups: &mut RoleGroups) {
        let vertical = groups.vertical_count();
        let reservation = if vertical == 0 {
            0.0
        } else {
            self.motion.min_vertical_reservation / vertical as f64
        };

        for piston in groups.group_mut(ActuatorRole::Base) {
            let (lowest, highest) = (piston.lowest_position(), piston.highest_position());
            piston.set_min_limit(lowest);
            piston.set_max_limit(highest - reservation);
        }
        for piston in groups.group_mut(ActuatorRole::Down) {
            let highest = piston.highest_position();
            piston.set_min_limit(reservation);
            piston.set_max_limit(highest);
        }
        for piston in groups.group_mut(ActuatorRole::Forward) {
            let (lowest, highest) = (piston.lowest_position(), piston.highest_position());
            piston.set_min_limit(lowest);
            piston.set_max_limit(highest);
        }

        for role in [ActuatorRole::Base, ActuatorRole::Down, ActuatorRole::Forward] {
            for piston in groups.group_mut(role) {
                piston.set_impulse_limits(
                    self.motion.max_impulse_axis,
                    self.motion.max_impulse_non_axis,
                );
                piston.set_shared_inertia(self.motion.share_inertia);
            }
        }
    }

    /// Resolve discovered handles into a configured rig.
    pub fn setup(&self, handles: RigHandles) -> Result<RigSetup, ClassifyError> {
        let RigHandles {
            frame,
            pistons,
            rotor,
            drills,
            cargo,
            range_sensors,
        } = handles;

        let Some(mut rotor) = rotor else {
            error!("Could not find an advanced rotor");
            return Err(ClassifyError::MissingRotor);
        };
        if pistons.is_empty() {
            error!("No actuators found in the rig");
            return Err(ClassifyError::NoActuators);
        }
        info!(count = pistons.len(), "Detected actuators");

        let Classification { mut groups, excluded } = self.partition(&frame, pistons);
        self.apply_static_limits(&mut groups);
        rotor.set_shared_inertia(self.motion.share_inertia);

        info!(
            base = groups.len(ActuatorRole::Base),
            down = groups.len(ActuatorRole::Down),
            forward = groups.len(ActuatorRole::Forward),
            excluded = excluded.len(),
            drills = drills.len(),
            "Rig classified"
        );
        if !excluded.is_empty() {
            warn!(excluded = ?excluded, "Some actuators were not assigned a role");
        }

        Ok(RigSetup {
            groups,
            excluded,
            rotor,
            drills,
            cargo,
            range_sensors,
        })
    }
}

// ─── Tests ──────────────────────────────────────────────────────────
