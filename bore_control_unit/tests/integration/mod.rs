//! Shared fixtures for the integration tests.

mod dig_cycle;
mod discovery;
mod persistence;

use bore_common::rig::state::RigState;
use bore_common::rig::status::StatusSnapshot;
use bore_control_unit::config::{load_config_from_str, LoadedConfig};
use bore_control_unit::cycle::CycleRunner;
use bore_control_unit::display::StatusBoard;
use bore_control_unit::persist::{MemoryStateStore, StateStore};
use bore_control_unit::state::SequenceController;
use bore_hal::SimRig;

/// Small rig: one actuator per role over 4 m of travel, one drill, one
/// 10 m³ container. One-second ticks; descent at 1 m/s total so a bore
/// takes 8 ticks, forward increment 1.75 m.
pub const SMALL_RIG_TOML: &str = r#"
[rig]
tick_interval_ms = 1000

[motion]
drill_head_radius = 0.2
downward_velocity = 1.0
upward_velocity = 2.0
forward_velocity = 1.0

[simulation]
base_pistons = 1
down_pistons = 1
forward_pistons = 1
piston_travel = 4.0
drills = 1
cargo_containers = 1
cargo_volume = 10.0
fill_rate = 0.1
"#;

pub fn small_rig(extra: &str) -> LoadedConfig {
    load_config_from_str(&format!("{SMALL_RIG_TOML}\n{extra}")).expect("valid test config")
}

pub fn runner_with_store(loaded: LoadedConfig, store: Box<dyn StateStore>) -> CycleRunner<SimRig> {
    let mut rig = SimRig::new(loaded.simulation);
    let controller = SequenceController::discover(loaded.bore, &mut rig);
    CycleRunner::new(controller, rig, StatusBoard::new(false), store)
}

pub fn runner(loaded: LoadedConfig) -> CycleRunner<SimRig> {
    runner_with_store(loaded, Box::new(MemoryStateStore::new()))
}

/// Step until `done` holds or `limit` ticks pass; returns every snapshot.
pub fn run_until(
    runner: &mut CycleRunner<SimRig>,
    limit: usize,
    done: impl Fn(&StatusSnapshot) -> bool,
) -> Vec<StatusSnapshot> {
    let mut out = Vec::new();
    for _ in 0..limit {
        let snapshot = runner.step();
        let stop = done(&snapshot);
        out.push(snapshot);
        if stop {
            break;
        }
    }
    out
}

/// Consecutive distinct states.
pub fn state_trace(snapshots: &[StatusSnapshot]) -> Vec<RigState> {
    let mut trace: Vec<RigState> = Vec::new();
    for s in snapshots {
        if trace.last() != Some(&s.state) {
            trace.push(s.state);
        }
    }
    trace
}
