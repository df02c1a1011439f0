//! Integration test: state persistence across restarts.
//!
//! Validates: the final state is written to the state file when the loop
//! ends, and a fresh controller on a fresh rig picks it up. Setup stops
//! every actuator, so a restored motion state holds until an operator
//! command restarts the motion.

use std::fs;
use std::sync::atomic::AtomicBool;

use bore_common::rig::state::{RigCommand, RigState};
use bore_control_unit::cycle::CommandSchedule;
use bore_control_unit::persist::FileStateStore;
use tempfile::TempDir;

use super::{runner_with_store, small_rig};

#[test]
fn final_state_survives_restart() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("bore_state");
    let running = AtomicBool::new(true);

    let mut first = runner_with_store(small_rig(""), Box::new(FileStateStore::new(&path)));
    let summary = first.run(Some(3), &running);
    assert_eq!(summary.final_state, RigState::MovingDown);
    assert!(summary.persisted);
    assert_eq!(fs::read_to_string(&path).unwrap(), "movingdown");

    let mut schedule = CommandSchedule::new();
    schedule.insert(3, RigCommand::Start);
    let mut second = runner_with_store(small_rig(""), Box::new(FileStateStore::new(&path)))
        .with_schedule(schedule);
    assert_eq!(second.controller().state(), RigState::MovingDown);

    // Restored, but the actuators were stopped at setup.
    for _ in 0..2 {
        assert_eq!(second.step().state, RigState::MovingDown);
        assert!(!second.plant().is_drilling());
        assert_eq!(second.plant().bore_depth(), 0.0);
    }

    assert_eq!(second.step().state, RigState::MovingDown);
    assert!(second.plant().is_drilling());
}

#[test]
fn restored_stop_overrides_auto_start() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("bore_state");
    fs::write(&path, "stopped\n").unwrap();

    let mut runner = runner_with_store(small_rig(""), Box::new(FileStateStore::new(&path)));
    assert_eq!(runner.controller().state(), RigState::Stopped);
    assert_eq!(runner.step().state, RigState::Stopped);
}

#[test]
fn corrupt_state_file_falls_back_to_initial_state() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("bore_state");
    fs::write(&path, "half-way down").unwrap();

    let runner = runner_with_store(small_rig(""), Box::new(FileStateStore::new(&path)));
    assert_eq!(runner.controller().state(), RigState::Ready);
}
