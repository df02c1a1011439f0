//! Role-partitioned actuator collections and completion predicates.
//!
//! Every predicate holds vacuously for an empty group. Positions are
//! compared against their boundary with `tolerance` of slack; a tolerance of
//! zero demands the boundary itself is reached.

use bore_common::rig::host::Piston;
use bore_common::rig::state::ActuatorRole;
use bore_common::rig::status::RoleCounts;

/// Boxed actuator handle.
pub type PistonHandle = Box<dyn Piston>;

/// `position` has reached `bound` from below.
#[inline]
pub fn reached_upper(position: f64, bound: f64, tolerance: f64) -> bool {
    position >= bound - tolerance
}

/// `position` has reached `bound` from above.
#[inline]
pub fn reached_lower(position: f64, bound: f64, tolerance: f64) -> bool {
    position <= bound + tolerance
}

/// Actuators grouped by the role classification assigned them.
///
/// A role is assigned exactly once; handles never move between groups.
#[derive(Default)]
pub struct RoleGroups {
    base: Vec<PistonHandle>,
    down: Vec<PistonHandle>,
    forward: Vec<PistonHandle>,
}

impl RoleGroups {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&mut self, role: ActuatorRole, piston: PistonHandle) {
        match role {
            ActuatorRole::Base => self.base.push(piston),
            ActuatorRole::Down => self.down.push(piston),
            ActuatorRole::Forward => self.forward.push(piston),
        }
    }

    #[inline]
    pub fn group(&self, role: ActuatorRole) -> &[PistonHandle] {
        match role {
            ActuatorRole::Base => &self.base,
            ActuatorRole::Down => &self.down,
            ActuatorRole::Forward => &self.forward,
        }
    }

    #[inline]
    pub fn group_mut(&mut self, role: ActuatorRole) -> &mut [PistonHandle] {
        match role {
            ActuatorRole::Base => &mut self.base,
            ActuatorRole::Down => &mut self.down,
            ActuatorRole::Forward => &mut self.forward,
        }
    }

    #[inline]
    pub fn len(&self, role: ActuatorRole) -> usize {
        self.group(role).len()
    }

    /// Base + Down.
    #[inline]
    pub fn vertical_count(&self) -> usize {
        self.base.len() + self.down.len()
    }

    pub fn counts(&self, excluded: usize) -> RoleCounts {
        RoleCounts {
            base: self.base.len(),
            down: self.down.len(),
            forward: self.forward.len(),
            excluded,
        }
    }

    /// Down at its highest position and Base at or below zero.
    pub fn is_fully_extended_downwards(&self, tolerance: f64) -> bool {
        self.down
            .iter()
            .all(|p| reached_upper(p.current_position(), p.highest_position(), tolerance))
            && self
                .base
                .iter()
                .all(|p| reached_lower(p.current_position(), 0.0, tolerance))
    }

    /// Down at its min limit and Base at its max limit.
    pub fn is_vertically_retracted(&self, tolerance: f64) -> bool {
        self.down
            .iter()
            .all(|p| reached_lower(p.current_position(), p.min_limit(), tolerance))
            && self
                .base
                .iter()
                .all(|p| reached_upper(p.current_position(), p.max_limit(), tolerance))
    }

    /// Forward group at its highest position.
    pub fn is_fully_extended_forwards(&self, tolerance: f64) -> bool {
        self.forward
            .iter()
            .all(|p| reached_upper(p.current_position(), p.highest_position(), tolerance))
    }

    /// Forward group at the max limit set by the last increment.
    pub fn is_done_extending_forwards(&self, tolerance: f64) -> bool {
        self.forward
            .iter()
            .all(|p| reached_upper(p.current_position(), p.max_limit(), tolerance))
    }

    /// Forward group back at its lowest position.
    pub fn is_done_retracting_forwards(&self, tolerance: f64) -> bool {
        self.forward
            .iter()
            .all(|p| reached_lower(p.current_position(), p.lowest_position(), tolerance))
    }
}

impl std::fmt::Debug for RoleGroups {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names = |g: &[PistonHandle]| g.iter().map(|p| p.name().to_string()).collect::<Vec<_>>();
        f.debug_struct("RoleGroups")
            .field("base", &names(&self.base))
            .field("down", &names(&self.down))
            .field("forward", &names(&self.forward))
            .finish()
    }
}

// ─── Tests ──────────────────────────────────────────────────────────
