//! Storage fullness and the pause/resume decision.
//!
//! Only storage that holds an inventory, is functional and is connected to
//! the drill head counts, and only when the rig has drills at all. The
//! decision is a Schmitt trigger over the free fraction: dig while at or
//! above the stop threshold, resume from pause only at or above the higher
//! start threshold.

use bore_common::rig::config::ThresholdConfig;
use bore_common::rig::host::CargoHold;
use bore_common::rig::state::RigState;
use bore_common::rig::status::Alert;
use tracing::debug;

/// Aggregated storage reading.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CargoSample {
    /// Free volume over all counted storage [m³].
    pub free_volume: f64,
    /// Capacity over all counted storage [m³].
    pub total_capacity: f64,
}

impl CargoSample {
    /// Free over total, 0 when nothing counts.
    pub fn free_fraction(&self) -> f64 {
        if self.total_capacity > 0.0 {
            self.free_volume / self.total_capacity
        } else {
            0.0
        }
    }
}

/// Aggregate the storage the drill head can reach.
pub fn aggregate(cargo: &[Box<dyn CargoHold>], has_drills: bool) -> CargoSample {
    if !has_drills {
        return CargoSample::default();
    }
    cargo
        .iter()
        .filter(|c| c.has_inventory() && c.is_functional() && c.is_connected_to_drill_head())
        .fold(CargoSample::default(), |acc, c| CargoSample {
            free_volume: acc.free_volume + (c.max_volume() - c.current_volume()),
            total_capacity: acc.total_capacity + c.max_volume(),
        })
}

/// Two-threshold pause decision.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpaceTrigger {
    start: f64,
    stop: f64,
}

impl SpaceTrigger {
    pub fn new(thresholds: &ThresholdConfig) -> Self {
        Self {
            start: thresholds.start_free_fraction,
            stop: thresholds.stop_free_fraction,
        }
    }

    /// Whether digging may continue. `paused` is the previous decision,
    /// which the controller holds as its `Paused` state.
    #[inline]
    pub fn has_space(&self, free_fraction: f64, paused: bool) -> bool {
        if paused {
            free_fraction >= self.start
        } else {
            free_fraction >= self.stop
        }
    }

    /// Operator alert after a tick that ended in `state`.
    pub fn alert(&self, state: RigState, free_fraction: f64) -> Alert {
        match state {
            RigState::Stopped => Alert::Stopped,
            RigState::Paused => Alert::Paused,
            _ if free_fraction > self.stop && free_fraction <= self.start => Alert::LowSpace,
            _ => Alert::Normal,
        }
    }
}

/// Storage owner for the controller.
pub struct InventoryMonitor {
    cargo: Vec<Box<dyn CargoHold>>,
    has_drills: bool,
    trigger: SpaceTrigger,
    last: CargoSample,
}

impl InventoryMonitor {
    pub fn new(
        cargo: Vec<Box<dyn CargoHold>>,
        has_drills: bool,
        thresholds: &ThresholdConfig,
    ) -> Self {
        Self {
            cargo,
            has_drills,
            trigger: SpaceTrigger::new(thresholds),
            last: CargoSample::default(),
        }
    }

    /// Read every counted container.
    pub fn sample(&mut self) -> CargoSample {
        self.last = aggregate(&self.cargo, self.has_drills);
        debug!(
            free = self.last.free_volume,
            capacity = self.last.total_capacity,
            fraction = self.last.free_fraction(),
            "Cargo sampled"
        );
        self.last
    }

    /// Last reading taken by [`sample`](Self::sample).
    #[inline]
    pub fn last(&self) -> CargoSample {
        self.last
    }

    /// Decision for the last reading. `paused` is the controller's state.
    pub fn has_space(&self, paused: bool) -> bool {
        self.trigger.has_space(self.last.free_fraction(), paused)
    }

    pub fn alert(&self, state: RigState) -> Alert {
        self.trigger.alert(state, self.last.free_fraction())
    }
}

impl std::fmt::Debug for InventoryMonitor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InventoryMonitor")
            .field("cargo", &self.cargo.len())
            .field("has_drills", &self.has_drills)
            .field("trigger", &self.trigger)
            .field("last", &self.last)
            .finish()
    }
}

// ─── Tests ──────────────────────────────────────────────────────────
