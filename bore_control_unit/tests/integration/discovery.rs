//! Integration test: rig discovery and classification on the simulated host.
//!
//! Validates: group-name discovery, fixed-topology discovery, failed setup
//! keeping the rig stopped, and backward-mounted actuators being excluded.

use bore_common::rig::state::{RigCommand, RigState};
use bore_common::rig::status::Alert;
use bore_control_unit::cycle::CommandSchedule;

use super::{run_until, runner, small_rig};

#[test]
fn unknown_group_keeps_rig_stopped() {
    let mut loaded = small_rig("");
    loaded.bore.rig.group_name = "Autominer 9".into();

    let mut runner = runner(loaded).with_schedule(
        CommandSchedule::from_entries(["1=start", "2=moveup"]).unwrap(),
    );
    assert!(!runner.controller().is_operational());

    for s in run_until(&mut runner, 3, |_| false) {
        assert_eq!(s.state, RigState::Stopped);
        assert_eq!(s.alert, Alert::Stopped);
    }
    assert!(!runner.plant().is_drilling());
}

#[test]
fn fixed_topology_ignores_group_name() {
    let mut loaded = small_rig("[features]\ndynamic_group_discovery = false\n");
    loaded.bore.rig.group_name = "Autominer 9".into();

    let mut runner = runner(loaded);
    let s = runner.step();
    assert!(runner.controller().is_operational());
    assert_eq!(s.state, RigState::MovingDown);
    assert_eq!(s.group_name, "");
}

#[test]
fn missing_rotor_fails_setup() {
    let mut loaded = small_rig("");
    loaded.simulation.rotor = false;

    let runner = runner(loaded);
    assert!(!runner.controller().is_operational());
    assert_eq!(runner.controller().state(), RigState::Stopped);
}

#[test]
fn backward_actuators_are_excluded_and_reported() {
    let mut loaded = small_rig("");
    loaded.simulation.backward_pistons = 2;
    loaded.simulation.down_pistons = 3;

    let mut runner = runner(loaded);
    let s = runner.step();
    assert_eq!(s.actuators.base, 1);
    assert_eq!(s.actuators.down, 3);
    assert_eq!(s.actuators.forward, 1);
    assert_eq!(s.actuators.excluded, 2);
    assert_eq!(s.drills, 1);
    assert!(s.rotor_present);
}

#[test]
fn moveup_command_raises_the_head() {
    let mut schedule = CommandSchedule::new();
    schedule.insert(4, RigCommand::MoveUp);
    let mut runner = runner(small_rig("")).with_schedule(schedule);

    let snapshots = run_until(&mut runner, 4, |_| false);
    assert_eq!(snapshots[3].state, RigState::MovingUp);
    assert!(!runner.plant().is_drilling());
}
