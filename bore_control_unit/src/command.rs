//! Operator command overrides.
//!
//! A command forces a state (and, for some, an immediate action) before the
//! per-tick rule table runs. It wins for that tick only.

use bore_common::rig::state::{RigCommand, RigState};
use tracing::{debug, info};

use crate::control::driver::ActuatorDriver;

/// Parse a raw host argument. Unknown text is dropped with a debug log.
pub fn parse_command(argument: &str) -> Option<RigCommand> {
    match RigCommand::parse_argument(argument) {
        Ok(command) => command,
        Err(e) => {
            debug!(argument, error = %e, "Ignoring unknown command");
            None
        }
    }
}

/// Apply `command` and return the forced state.
pub fn apply_override(
    command: RigCommand,
    from: RigState,
    driver: &mut ActuatorDriver,
) -> RigState {
    let to = match command {
        RigCommand::Stop => {
            driver.stop_all();
            RigState::Stopped
        }
        RigCommand::Start => RigState::Ready,
        RigCommand::MoveUp => {
            driver.raise();
            RigState::MovingUp
        }
        RigCommand::Reset => RigState::ResetStart,
    };
    info!(%command, %from, %to, "Command override");
    to
}

#[cfg(test)]
mod tests {
    use super::*;
    use bore_common::rig::config::MotionConfig;
    use bore_common::rig::geometry::Vec3;
    use bore_common::rig::host::{Drill, Piston};
    use bore_common::rig::state::ActuatorRole;
    use bore_hal::sim::{SimDrill, SimPiston, SimRotor};

    use crate::rig::groups::RoleGroups;

    #[test]
    fn parse_ignores_unknown_and_empty() {
        assert_eq!(parse_command("reset"), Some(RigCommand::Reset));
        assert_eq!(parse_command("moveup"), Some(RigCommand::MoveUp));
        assert_eq!(parse_command(""), None);
        assert_eq!(parse_command("dance"), None);
    }

    #[test]
    fn overrides_force_state_and_action() {
        let base = SimPiston::new("base", Vec3::UNIT_Z, 0.0, 10.0, 5.0);
        let fwd = SimPiston::new("fwd", Vec3::UNIT_X, 0.0, 10.0, 5.0);
        let drill = SimDrill::new();
        let mut groups = RoleGroups::new();
        groups.push(ActuatorRole::Base, Box::new(base.clone()));
        groups.push(ActuatorRole::Forward, Box::new(fwd.clone()));
        let mut driver = ActuatorDriver::new(
            groups,
            Box::new(SimRotor::new()),
            vec![Box::new(drill.clone())],
            MotionConfig::default(),
        );

        driver.begin_descent().unwrap();
        assert_eq!(
            apply_override(RigCommand::MoveUp, RigState::MovingDown, &mut driver),
            RigState::MovingUp
        );
        assert_eq!(base.velocity(), 1.0);
        assert!(!drill.is_enabled());

        driver.retract_forwards();
        assert_eq!(
            apply_override(RigCommand::Stop, RigState::MovingUp, &mut driver),
            RigState::Stopped
        );
        assert_eq!(base.velocity(), 0.0);
        assert_eq!(fwd.velocity(), 0.0);

        assert_eq!(
            apply_override(RigCommand::Start, RigState::Stopped, &mut driver),
            RigState::Ready
        );
        assert_eq!(
            apply_override(RigCommand::Reset, RigState::Paused, &mut driver),
            RigState::ResetStart
        );
    }
}
