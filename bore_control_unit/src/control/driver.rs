//! Group-level motion commands.
//!
//! Several physical actuators in one role group act as a single logical
//! joint: a group velocity `V` over `N` actuators commands `V / N` to each.
//! An empty group is left alone.

use bore_common::rig::config::MotionConfig;
use bore_common::rig::host::{Drill, Rotor};
use bore_common::rig::state::ActuatorRole;
use thiserror::Error;
use tracing::{debug, error};

use crate::rig::groups::{PistonHandle, RoleGroups};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DriveError {
    #[error("could not find any vertical actuators, descent aborted")]
    NoVerticalActuators,
}

/// Command `total / group.len()` to every actuator of `group`.
///
/// Returns the per-actuator velocity, or `None` for an empty group.
pub fn fan_out(group: &mut [PistonHandle], total: f64) -> Option<f64> {
    if group.is_empty() {
        return None;
    }
    let each = total / group.len() as f64;
    for piston in group.iter_mut() {
        piston.set_velocity(each);
    }
    Some(each)
}

/// Drives the classified rig.
pub struct ActuatorDriver {
    groups: RoleGroups,
    rotor: Box<dyn Rotor>,
    drills: Vec<Box<dyn Drill>>,
    motion: MotionConfig,
    /// Total descent velocity last commanded [m/s].
    descent_velocity: f64,
}

impl ActuatorDriver {
    pub fn new(
        groups: RoleGroups,
        rotor: Box<dyn Rotor>,
        drills: Vec<Box<dyn Drill>>,
        motion: MotionConfig,
    ) -> Self {
        Self {
            groups,
            rotor,
            drills,
            motion,
            descent_velocity: 0.0,
        }
    }

    /// Total descent velocity last commanded, 0 once the rig stops descending.
    #[inline]
    pub fn descent_velocity(&self) -> f64 {
        self.descent_velocity
    }

    // ─── Group actions ──────────────────────────────────────────────

    /// Split `down_total` over every vertical actuator: Down extends at
    /// `+down_total / Nv`, Base at the negated share. Negative values raise.
    fn set_vertical_velocity(&mut self, down_total: f64) -> bool {
        let vertical = self.groups.vertical_count();
        if vertical == 0 {
            return false;
        }
        let each = down_total / vertical as f64;
        for piston in self.groups.group_mut(ActuatorRole::Down) {
            piston.set_velocity(each);
        }
        for piston in self.groups.group_mut(ActuatorRole::Base) {
            piston.set_velocity(-each);
        }
        true
    }

    /// Drills on, rotor spinning, vertical group descending at the
    /// configured rate, forward group held.
    pub fn begin_descent(&mut self) -> Result<(), DriveError> {
        self.switch_drills(true);
        self.set_rotor_rpm(self.motion.rotor_rpm);

        if self.groups.vertical_count() == 0 {
            error!("Could not find any vertical actuators, aborting descent");
            self.raise();
            self.switch_drills(false);
            return Err(DriveError::NoVerticalActuators);
        }

        fan_out(self.groups.group_mut(ActuatorRole::Forward), 0.0);
        self.set_descent_velocity(self.motion.downward_velocity);
        debug!(velocity = self.descent_velocity, "Descent started");
        Ok(())
    }

    /// Re-split a new total descent velocity without touching drills or rotor.
    pub fn set_descent_velocity(&mut self, total: f64) {
        if self.set_vertical_velocity(total) {
            self.descent_velocity = total;
        }
    }

    /// Drills off, rotor stopped, vertical group retracting.
    pub fn raise(&mut self) {
        self.switch_drills(false);
        self.set_rotor_rpm(0.0);
        self.set_vertical_velocity(-self.motion.upward_velocity);
        self.descent_velocity = 0.0;
    }

    /// Vertical group, rotor and drills stopped. Forward motion continues.
    pub fn pause(&mut self) {
        self.set_vertical_velocity(0.0);
        self.set_rotor_rpm(0.0);
        self.switch_drills(false);
        self.descent_velocity = 0.0;
    }

    /// [`pause`](Self::pause) plus the forward group.
    pub fn stop_all(&mut self) {
        self.pause();
        fan_out(self.groups.group_mut(ActuatorRole::Forward), 0.0);
    }

    /// Open the forward max limit by `distance` from where the group is now
    /// and drive it outward.
    pub fn extend_forwards_by(&mut self, distance: f64) {
        let group = self.groups.group_mut(ActuatorRole::Forward);
        if group.is_empty() {
            return;
        }
        let share = distance / group.len() as f64;
        for piston in group.iter_mut() {
            let target = piston.current_position() + share;
            piston.set_max_limit(target);
        }
        fan_out(group, self.motion.forward_velocity);
    }

    /// Drive the forward group back to its lowest position.
    pub fn retract_forwards(&mut self) {
        let group = self.groups.group_mut(ActuatorRole::Forward);
        for piston in group.iter_mut() {
            let lowest = piston.lowest_position();
            piston.set_min_limit(lowest);
        }
        fan_out(group, -self.motion.forward_velocity);
    }

    pub fn switch_drills(&mut self, enabled: bool) {
        for drill in &mut self.drills {
            drill.set_enabled(enabled);
        }
    }

    pub fn set_rotor_rpm(&mut self, rpm: f64) {
        self.rotor.set_target_rpm(rpm);
    }

    // ─── Completion predicates ──────────────────────────────────────

    pub fn is_fully_extended_downwards(&self) -> bool {
        self.groups.is_fully_extended_downwards(self.motion.position_tolerance)
    }

    pub fn is_vertically_retracted(&self) -> bool {
        self.groups.is_vertically_retracted(self.motion.position_tolerance)
    }

    pub fn is_fully_extended_forwards(&self) -> bool {
        self.groups.is_fully_extended_forwards(self.motion.position_tolerance)
    }

    pub fn is_done_extending_forwards(&self) -> bool {
        self.groups.is_done_extending_forwards(self.motion.position_tolerance)
    }

    pub fn is_done_retracting_forwards(&self) -> bool {
        self.groups.is_done_retracting_forwards(self.motion.position_tolerance)
    }
}

impl std::fmt::Debug for ActuatorDriver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ActuatorDriver")
            .field("groups", &self.groups)
            .field("drills", &self.drills.len())
            .field("descent_velocity", &self.descent_velocity)
            .finish()
    }
}

// ─── Tests ──────────────────────────────────────────────────────────
