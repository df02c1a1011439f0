//! Prelude module for common re-exports.
//!
//! ```rust
//! use bore_common::prelude::*;
//! ```

// ─── Configuration ──────────────────────────────────────────────────
pub use crate::config::{ConfigError, ConfigLoader, LogLevel, SharedConfig};
pub use crate::rig::config::{BoreConfig, FeatureFlags, MotionConfig, RangeConfig, ThresholdConfig};

// ─── Rig Types ──────────────────────────────────────────────────────
pub use crate::rig::geometry::{ReferenceFrame, Vec3};
pub use crate::rig::host::{
    CargoHold, DiscoveryError, Drill, Piston, Plant, RangeSensor, RigDiscovery, RigHandles,
    RigSelector, Rotor, StatusSink,
};
pub use crate::rig::state::{ActuatorRole, RigCommand, RigState};
pub use crate::rig::status::{Alert, RoleCounts, StatusSnapshot};

// ─── System Constants ───────────────────────────────────────────────
pub use crate::consts::{DEFAULT_GROUP_NAME, DEFAULT_TICK_INTERVAL_MS};

