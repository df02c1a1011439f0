//! Integration test: full dig cycles on the simulated rig.
//!
//! Validates: descent → raise → forward advance repeats until the forward
//! group is fully extended, then the rig retracts and stops; storage
//! hysteresis pauses and resumes digging; range sensing speeds up descent.

use bore_common::rig::state::{RigCommand, RigState};
use bore_control_unit::cycle::CommandSchedule;

use super::{run_until, runner, small_rig, state_trace};

#[test]
fn digs_every_column_then_retracts_and_stops() {
    let mut runner = runner(small_rig(""));
    let snapshots = run_until(&mut runner, 200, |s| s.state == RigState::Stopped);

    use RigState::*;
    assert_eq!(
        state_trace(&snapshots),
        [
            MovingDown,
            MovingUp,
            MovingForward,
            MovingDown,
            MovingUp,
            MovingForward,
            MovingDown,
            MovingUp,
            MovingForward,
            MovingDown,
            MovingUp,
            ResetRetracting,
            Stopped,
        ]
    );

    let rig = runner.plant();
    assert_eq!(rig.forward_extension(), 0.0);
    assert_eq!(rig.head_height(), 4.0);
    assert!(!rig.is_drilling());
    // Four columns of eight seconds each at 0.1 m³/s.
    assert!((rig.free_fraction() - 0.68).abs() < 1e-9);
}

#[test]
fn first_bore_reaches_full_depth() {
    let mut runner = runner(small_rig(""));
    let snapshots = run_until(&mut runner, 50, |s| s.state == RigState::MovingForward);

    assert_eq!(snapshots.last().map(|s| s.state), Some(RigState::MovingForward));
    assert_eq!(runner.plant().bore_depth(), 8.0);
    assert_eq!(snapshots[0].descent_velocity, 1.0);
    assert_eq!(snapshots[0].forward_increment, 1.75);
}

#[test]
fn full_storage_pauses_until_start_threshold() {
    // Net 1.5 m³/s while digging, 0.5 m³/s drained while paused.
    let mut loaded = small_rig("");
    loaded.simulation.fill_rate = 2.0;
    loaded.simulation.drain_rate = 0.5;
    let mut runner = runner(loaded);
    let snapshots = run_until(&mut runner, 100, |s| s.state == RigState::MovingUp);

    let trace = state_trace(&snapshots);
    assert_eq!(
        trace,
        [
            RigState::MovingDown,
            RigState::Paused,
            RigState::MovingDown,
            RigState::MovingUp
        ]
    );

    let paused: Vec<_> = snapshots.iter().filter(|s| s.state == RigState::Paused).collect();
    // Free space recovered past the stop threshold while still paused.
    assert!(paused.iter().any(|s| s.free_cargo_percent > 20.0 && s.free_cargo_percent < 40.0));
    assert!(paused.iter().all(|s| s.descent_velocity == 0.0));

    let resumed = snapshots
        .windows(2)
        .find(|w| w[0].state == RigState::Paused && w[1].state == RigState::MovingDown)
        .map(|w| w[1].free_cargo_percent);
    assert!(resumed.is_some_and(|free| free >= 40.0));
}

#[test]
fn reset_mid_bore_lifts_retracts_and_stops() {
    let mut runner = runner(small_rig("")).with_schedule(
        CommandSchedule::from_entries(["15=reset"]).expect("valid schedule"),
    );
    let snapshots = run_until(&mut runner, 100, |s| s.state == RigState::Stopped);

    assert_eq!(snapshots[14].state, RigState::ResetLifting);
    assert_eq!(snapshots.last().map(|s| s.state), Some(RigState::Stopped));
    assert_eq!(runner.plant().forward_extension(), 0.0);
}

#[test]
fn stop_then_start_resumes_descent() {
    let mut schedule = CommandSchedule::new();
    schedule.insert(3, RigCommand::Stop);
    schedule.insert(6, RigCommand::Start);
    let mut runner = runner(small_rig("")).with_schedule(schedule);
    let snapshots = run_until(&mut runner, 6, |_| false);

    assert_eq!(snapshots[1].state, RigState::MovingDown);
    assert_eq!(snapshots[2].state, RigState::Stopped);
    assert_eq!(snapshots[4].state, RigState::Stopped);
    assert_eq!(snapshots[5].state, RigState::MovingDown);
}

#[test]
fn range_sensing_speeds_up_far_descent() {
    let mut loaded = small_rig("[features]\nrange_sensing = true\n");
    loaded.bore.motion.downward_velocity = 0.15;
    loaded.simulation.range_sensors = 1;
    loaded.simulation.initial_clearance = 20.0;
    let mut runner = runner(loaded);

    let first = runner.step();
    assert_eq!(first.state, RigState::MovingDown);
    assert_eq!(first.descent_velocity, 20.0 * 0.05);

    for s in run_until(&mut runner, 30, |s| s.state != RigState::MovingDown) {
        if s.state == RigState::MovingDown {
            assert!(s.descent_velocity >= 0.15);
        }
    }
}
