//! Periodic tick loop: advance plant → tick controller → publish status.
//!
//! The host calls the controller once per tick period. In simulation the
//! plant is advanced by exactly one period before each tick, so a run is
//! deterministic regardless of wall-clock pacing. With real-time pacing the
//! loop sleeps out the remainder of each period.
//!
//! The persisted state is loaded when the runner is built and written back
//! when the loop ends, whether by tick limit or by the shutdown flag.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use bore_common::rig::host::Plant;
use bore_common::rig::state::{ParseCommandError, RigCommand, RigState};
use bore_common::rig::status::StatusSnapshot;
use thiserror::Error;
use tracing::{debug, info};

use crate::display::StatusBoard;
use crate::persist::{persist_state, restore_state, StateStore};
use crate::state::SequenceController;

// ─── Cycle Statistics ───────────────────────────────────────────────

/// Duration in nanoseconds, saturating at `u64::MAX` (about 584 years).
#[inline]
pub fn saturating_nanos(duration: Duration) -> u64 {
    u64::try_from(duration.as_nanos()).unwrap_or(u64::MAX)
}

/// O(1) per-tick timing statistics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CycleStats {
    /// Total ticks executed.
    pub cycle_count: u64,
    /// Last tick duration [ns].
    pub last_cycle_ns: u64,
    /// Minimum tick duration [ns].
    pub min_cycle_ns: u64,
    /// Maximum tick duration [ns].
    pub max_cycle_ns: u64,
    /// Running sum for average computation.
    pub sum_cycle_ns: u64,
    /// Ticks that took longer than the tick period.
    pub overruns: u64,
}

impl Default for CycleStats {
    fn default() -> Self {
        Self::new()
    }
}

impl CycleStats {
    pub const fn new() -> Self {
        Self {
            cycle_count: 0,
            last_cycle_ns: 0,
            min_cycle_ns: u64::MAX,
            max_cycle_ns: 0,
            sum_cycle_ns: 0,
            overruns: 0,
        }
    }

    /// Record a tick duration against the tick budget.
    #[inline]
    pub fn record(&mut self, duration_ns: u64, budget_ns: u64) {
        self.cycle_count += 1;
        self.last_cycle_ns = duration_ns;
        self.min_cycle_ns = self.min_cycle_ns.min(duration_ns);
        self.max_cycle_ns = self.max_cycle_ns.max(duration_ns);
        self.sum_cycle_ns = self.sum_cycle_ns.saturating_add(duration_ns);
        if duration_ns > budget_ns {
            self.overruns += 1;
        }
    }

    /// Average tick time [ns] (0 if no ticks).
    #[inline]
    pub fn avg_cycle_ns(&self) -> u64 {
        if self.cycle_count == 0 {
            0
        } else {
            self.sum_cycle_ns / self.cycle_count
        }
    }
}

// ─── Command Schedule ───────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum CycleError {
    #[error("invalid scheduled command '{0}', expected TICK=COMMAND")]
    Schedule(String),

    #[error(transparent)]
    Command(#[from] ParseCommandError),
}

/// Operator commands keyed by the tick (1-based) they arrive on.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CommandSchedule {
    entries: BTreeMap<u64, RigCommand>,
}

impl CommandSchedule {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse `TICK=COMMAND`, e.g. `120=reset`.
    pub fn parse_entry(entry: &str) -> Result<(u64, RigCommand), CycleError> {
        let (tick, command) = entry
            .split_once('=')
            .ok_or_else(|| CycleError::Schedule(entry.to_string()))?;
        let tick = tick
            .trim()
            .parse::<u64>()
            .map_err(|_| CycleError::Schedule(entry.to_string()))?;
        Ok((tick, command.parse()?))
    }

    /// Build from `TICK=COMMAND` entries. A later entry for the same tick wins.
    pub fn from_entries<'a, I>(entries: I) -> Result<Self, CycleError>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut schedule = Self::new();
        for entry in entries {
            let (tick, command) = Self::parse_entry(entry)?;
            schedule.insert(tick, command);
        }
        Ok(schedule)
    }

    pub fn insert(&mut self, tick: u64, command: RigCommand) {
        self.entries.insert(tick, command);
    }

    /// Remove and return the command for `tick`.
    pub fn take(&mut self, tick: u64) -> Option<RigCommand> {
        self.entries.remove(&tick)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// ─── Cycle Runner ───────────────────────────────────────────────────

/// Outcome of [`CycleRunner::run`].
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub ticks: u64,
    pub final_state: RigState,
    /// Loop left because the shutdown flag was cleared.
    pub interrupted: bool,
    /// Final state written to the store.
    pub persisted: bool,
    pub stats: CycleStats,
}

/// Owns the controller and everything around it.
pub struct CycleRunner<P: Plant> {
    controller: SequenceController,
    plant: P,
    board: StatusBoard,
    store: Box<dyn StateStore>,
    schedule: CommandSchedule,
    tick_interval: Duration,
    realtime: bool,
    stats: CycleStats,
}

impl<P: Plant> CycleRunner<P> {
    /// Build the runner and hand any persisted state to the controller.
    pub fn new(
        mut controller: SequenceController,
        plant: P,
        board: StatusBoard,
        mut store: Box<dyn StateStore>,
    ) -> Self {
        controller.restore(restore_state(store.as_mut()));
        let tick_interval = controller.config().rig.tick_interval();
        Self {
            controller,
            plant,
            board,
            store,
            schedule: CommandSchedule::new(),
            tick_interval,
            realtime: false,
            stats: CycleStats::new(),
        }
    }

    pub fn with_schedule(mut self, schedule: CommandSchedule) -> Self {
        self.schedule = schedule;
        self
    }

    /// Sleep out each tick period instead of running as fast as possible.
    pub fn with_realtime(mut self, realtime: bool) -> Self {
        self.realtime = realtime;
        self
    }

    pub fn controller(&self) -> &SequenceController {
        &self.controller
    }

    pub fn plant(&self) -> &P {
        &self.plant
    }

    pub fn stats(&self) -> &CycleStats {
        &self.stats
    }

    /// One period: plant, then controller, then sinks.
    pub fn step(&mut self) -> StatusSnapshot {
        let start = Instant::now();
        self.plant.advance(self.tick_interval);

        let command = self.schedule.take(self.controller.cycle() + 1);
        let snapshot = self.controller.tick(command);
        self.board.publish(&snapshot);

        let elapsed = saturating_nanos(start.elapsed());
        self.stats.record(elapsed, saturating_nanos(self.tick_interval));
        snapshot
    }

    /// Tick until `max_ticks` is reached or `running` is cleared, then persist.
    pub fn run(&mut self, max_ticks: Option<u64>, running: &AtomicBool) -> RunSummary {
        info!(
            tick_ms = u64::try_from(self.tick_interval.as_millis()).unwrap_or(u64::MAX),
            realtime = self.realtime,
            ?max_ticks,
            "Entering tick loop"
        );
        let mut ticks = 0u64;
        let mut interrupted = false;

        loop {
            if max_ticks.is_some_and(|max| ticks >= max) {
                break;
            }
            if !running.load(Ordering::SeqCst) {
                interrupted = true;
                break;
            }

            let started = Instant::now();
            self.step();
            ticks += 1;

            if self.realtime {
                if let Some(rest) = self.tick_interval.checked_sub(started.elapsed()) {
                    std::thread::sleep(rest);
                }
            }
        }

        let persisted = self.shutdown();
        info!(
            ticks,
            state = %self.controller.state(),
            avg_tick_ns = self.stats.avg_cycle_ns(),
            max_tick_ns = self.stats.max_cycle_ns,
            interrupted,
            "Tick loop finished"
        );
        RunSummary {
            ticks,
            final_state: self.controller.state(),
            interrupted,
            persisted,
            stats: self.stats.clone(),
        }
    }

    /// Write the current state to the store.
    pub fn shutdown(&mut self) -> bool {
        let state = self.controller.state();
        debug!(%state, "Persisting state");
        persist_state(self.store.as_mut(), state)
    }
}

// ─── Tests ──────────────────────────────────────────────────────────
