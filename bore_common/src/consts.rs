//! Workspace-wide constants.
//!
//! Single source of truth for defaults shared by the host simulation and
//! the control unit.

/// Default host tick period in milliseconds (one tick every 100 frames at 60 Hz).
pub const DEFAULT_TICK_INTERVAL_MS: u64 = 1667;

/// Lower bound accepted for the tick period.
pub const TICK_INTERVAL_MS_MIN: u64 = 1;

/// Upper bound accepted for the tick period.
pub const TICK_INTERVAL_MS_MAX: u64 = 60_000;

/// Default name of the block group that holds every rig part.
pub const DEFAULT_GROUP_NAME: &str = "Autominer 1";

/// Default configuration file path.
pub const DEFAULT_CONFIG_PATH: &str = "config/bore.toml";

/// Default persisted state file name.
pub const DEFAULT_STATE_FILE: &str = "bore_state";

/// Forward increment = `FORWARD_INCREMENT_PER_RADIUS * radius + FORWARD_INCREMENT_BASE`.
pub const FORWARD_INCREMENT_PER_RADIUS: f64 = 2.5;

/// Constant term of the forward increment [m].
pub const FORWARD_INCREMENT_BASE: f64 = 1.25;
