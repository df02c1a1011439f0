//! Bore sequence controller.
//!
//! Cycle: Ready → MovingDown → MovingUp → MovingForward → MovingDown …,
//! pausing while storage is full. The reset path (ResetStart → ResetLifting
//! → ResetRetracting → Stopped) lifts the head, pulls the forward group
//! back and stops.
//!
//! Each tick applies at most one operator override, then evaluates the rule
//! table against the current state. Rules are checked in declaration order
//! and the first one whose guard holds fires; at most one transition per
//! tick.

use bore_common::rig::config::BoreConfig;
use bore_common::rig::host::{RigDiscovery, RigHandles, RigSelector};
use bore_common::rig::state::{RigCommand, RigState};
use bore_common::rig::status::{RoleCounts, StatusSnapshot};
use tracing::{debug, error, info, warn};

use crate::command::{apply_override, parse_command};
use crate::control::driver::ActuatorDriver;
use crate::control::inventory::InventoryMonitor;
use crate::control::range::RangeSensorAdapter;
use crate::rig::classify::{ActuatorClassifier, ClassifyError, RigSetup};

/// Start a descent, or stop when the rig has nothing to descend with.
fn descend(driver: &mut ActuatorDriver) -> RigState {
    match driver.begin_descent() {
        Ok(()) => RigState::MovingDown,
        Err(e) => {
            error!(error = %e, "Descent aborted, stopping");
            RigState::Stopped
        }
    }
}

/// Evaluate the rule table for `state`. Returns the new state if a rule fired.
fn evaluate(
    state: RigState,
    driver: &mut ActuatorDriver,
    inventory: &InventoryMonitor,
    forward_increment: f64,
) -> Option<RigState> {
    use RigState::*;

    let next = match state {
        Ready => descend(driver),

        MovingDown if driver.is_fully_extended_downwards() => {
            driver.raise();
            MovingUp
        }

        MovingUp if driver.is_vertically_retracted() => {
            if driver.is_fully_extended_forwards() {
                driver.pause();
                driver.retract_forwards();
                ResetRetracting
            } else {
                driver.extend_forwards_by(forward_increment);
                MovingForward
            }
        }

        MovingForward
            if driver.is_done_extending_forwards() || driver.is_fully_extended_forwards() =>
        {
            descend(driver)
        }

        MovingDown if !inventory.has_space(false) => {
            driver.pause();
            Paused
        }

        Paused if inventory.has_space(true) => descend(driver),

        ResetStart => {
            driver.raise();
            ResetLifting
        }

        ResetLifting if driver.is_vertically_retracted() => {
            driver.retract_forwards();
            ResetRetracting
        }

        ResetRetracting if driver.is_done_retracting_forwards() => {
            driver.stop_all();
            Stopped
        }

        _ => return None,
    };
    Some(next)
}

/// Autonomous controller for one bore rig.
///
/// Owns every handle resolved at setup. A rig that failed setup stays
/// `Stopped`, rejects commands and ignores persisted state.
pub struct SequenceController {
    config: BoreConfig,
    state: RigState,
    driver: Option<ActuatorDriver>,
    inventory: InventoryMonitor,
    range: Option<RangeSensorAdapter>,
    counts: RoleCounts,
    drills: usize,
    rotor_present: bool,
    cycle: u64,
    setup_error: Option<ClassifyError>,
}

impl SequenceController {
    /// Classify `handles` and build the controller.
    pub fn new(config: BoreConfig, handles: RigHandles) -> Self {
        let drills = handles.drills.len();
        let rotor_present = handles.rotor.is_some();

        match ActuatorClassifier::new(&config.motion).setup(handles) {
            Ok(setup) => Self::with_setup(config, setup),
            Err(e) => Self::failed(config, e, drills, rotor_present),
        }
    }

    /// Discover the rig through the host and build the controller.
    ///
    /// With dynamic group discovery the configured group name selects the
    /// rig; otherwise the whole construct is taken.
    pub fn discover(config: BoreConfig, host: &mut dyn RigDiscovery) -> Self {
        let selector = if config.features.dynamic_group_discovery {
            RigSelector::Group(config.rig.group_name.clone())
        } else {
            RigSelector::Construct
        };
        match host.discover(&selector) {
            Ok(handles) => Self::new(config, handles),
            Err(e) => {
                error!(error = %e, "Rig discovery failed");
                Self::failed(config, e.into(), 0, false)
            }
        }
    }

    fn with_setup(config: BoreConfig, setup: RigSetup) -> Self {
        let RigSetup {
            groups,
            excluded,
            rotor,
            drills,
            cargo,
            range_sensors,
        } = setup;

        let counts = groups.counts(excluded.len());
        let drill_count = drills.len();
        let inventory = InventoryMonitor::new(cargo, drill_count > 0, &config.thresholds);

        let range = match (config.features.range_sensing, range_sensors.is_empty()) {
            (true, false) => Some(RangeSensorAdapter::new(range_sensors, config.range)),
            (true, true) => {
                warn!("Range sensing enabled but no range sensors found");
                None
            }
            (false, _) => None,
        };

        let driver = ActuatorDriver::new(groups, rotor, drills, config.motion);
        let state = if config.rig.auto_start {
            RigState::Ready
        } else {
            RigState::Stopped
        };
        info!(%state, "Controller ready");

        Self {
            config,
            state,
            driver: Some(driver),
            inventory,
            range,
            counts,
            drills: drill_count,
            rotor_present: true,
            cycle: 0,
            setup_error: None,
        }
    }

    fn failed(
        config: BoreConfig,
        cause: ClassifyError,
        drills: usize,
        rotor_present: bool,
    ) -> Self {
        error!(error = %cause, "Rig setup failed, controller stopped");
        let inventory = InventoryMonitor::new(Vec::new(), false, &config.thresholds);
        Self {
            config,
            state: RigState::Stopped,
            driver: None,
            inventory,
            range: None,
            counts: RoleCounts::default(),
            drills,
            rotor_present,
            cycle: 0,
            setup_error: Some(cause),
        }
    }

    /// Take over a persisted state. Ignored when setup failed.
    ///
    /// Setup leaves every actuator stopped and nothing re-issues the motion
    /// of a restored motion state; it holds until an operator command.
    pub fn restore(&mut self, state: Option<RigState>) {
        let Some(state) = state else {
            return;
        };
        if self.driver.is_none() {
            warn!(%state, "Rig not operational, ignoring persisted state");
            return;
        }
        info!(from = %self.state, to = %state, "State restored");
        if matches!(
            state,
            RigState::MovingDown
                | RigState::MovingUp
                | RigState::MovingForward
                | RigState::ResetLifting
                | RigState::ResetRetracting
        ) {
            warn!(%state, "Actuators are stopped; motion resumes only on an operator command");
        }
        self.state = state;
    }

    #[inline]
    pub fn state(&self) -> RigState {
        self.state
    }

    #[inline]
    pub fn is_operational(&self) -> bool {
        self.driver.is_some()
    }

    pub fn setup_error(&self) -> Option<&ClassifyError> {
        self.setup_error.as_ref()
    }

    #[inline]
    pub fn cycle(&self) -> u64 {
        self.cycle
    }

    pub fn config(&self) -> &BoreConfig {
        &self.config
    }

    /// Tick with a raw host argument; unknown arguments are ignored.
    pub fn tick_argument(&mut self, argument: &str) -> StatusSnapshot {
        self.tick(parse_command(argument))
    }

    /// One controller tick.
    pub fn tick(&mut self, command: Option<RigCommand>) -> StatusSnapshot {
        self.cycle += 1;
        self.inventory.sample();

        let Some(driver) = self.driver.as_mut() else {
            if let Some(command) = command {
                warn!(%command, "Rig not operational, command rejected");
            }
            return self.snapshot();
        };

        if let Some(command) = command {
            self.state = apply_override(command, self.state, driver);
        }

        let from = self.state;
        let increment = self.config.motion.forward_increment();
        if let Some(to) = evaluate(from, driver, &self.inventory, increment) {
            info!(cycle = self.cycle, %from, %to, "State transition");
            self.state = to;
        }

        if self.state == RigState::MovingDown {
            if let Some(range) = self.range.as_mut() {
                let speed = range.descent_speed(self.config.motion.downward_velocity);
                driver.set_descent_velocity(speed);
            }
        }

        debug!(cycle = self.cycle, state = %self.state, "Tick complete");
        self.snapshot()
    }

    /// Status as of the last tick.
    pub fn snapshot(&self) -> StatusSnapshot {
        let free_fraction = self.inventory.last().free_fraction();
        let descent_velocity = match (&self.driver, self.state) {
            (Some(driver), RigState::MovingDown) => driver.descent_velocity(),
            _ => 0.0,
        };
        let group_name = if self.config.features.dynamic_group_discovery {
            self.config.rig.group_name.clone()
        } else {
            String::new()
        };

        StatusSnapshot {
            cycle: self.cycle,
            state: self.state,
            group_name,
            actuators: self.counts,
            drills: self.drills,
            rotor_present: self.rotor_present,
            forward_increment: self.config.motion.forward_increment(),
            free_cargo_percent: free_fraction * 100.0,
            alert: self.inventory.alert(self.state),
            descent_velocity,
        }
    }
}

impl std::fmt::Debug for SequenceController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SequenceController")
            .field("state", &self.state)
            .field("cycle", &self.cycle)
            .field("driver", &self.driver)
            .field("inventory", &self.inventory)
            .field("range", &self.range)
            .field("setup_error", &self.setup_error)
            .finish()
    }
}

// ─── Tests ──────────────────────────────────────────────────────────
