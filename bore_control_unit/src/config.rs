//! TOML configuration loader with validation.
//!
//! One document holds everything the binary needs:
//!
//! ```toml
//! [shared]       # log level, service name
//! [rig]          # group name, auto start, tick period
//! [thresholds]   # storage start/stop fractions
//! [motion]       # velocities, impulse caps, reservation, tolerance
//! [range]        # clearance sensing
//! [features]     # range_sensing, multi_display, dynamic_group_discovery
//! [simulation]   # simulated rig layout
//! ```
//!
//! Every table and every key is optional; missing values take defaults.

use std::path::Path;

use bore_common::config::{ConfigError, ConfigLoader, SharedConfig};
use bore_common::rig::config::BoreConfig;
use bore_hal::sim::SimLayout;
use serde::Deserialize;
use tracing::debug;

// ─── Loaded Config Bundle ───────────────────────────────────────────

/// Complete validated configuration, ready for runtime use.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoadedConfig {
    #[serde(default)]
    pub shared: SharedConfig,

    #[serde(flatten)]
    pub bore: BoreConfig,

    #[serde(default)]
    pub simulation: SimLayout,
}

impl LoadedConfig {
    /// Validate every section.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.shared.validate()?;
        self.bore.validate()?;
        self.simulation
            .validate()
            .map_err(|e| ConfigError::ValidationError(format!("[simulation] {e}")))?;
        Ok(())
    }
}

// ─── Loading Functions ──────────────────────────────────────────────

/// Load and validate the configuration file at `path`.
pub fn load_config(path: &Path) -> Result<LoadedConfig, ConfigError> {
    debug!(path = ?path, "Loading configuration");
    let loaded = LoadedConfig::load(path)?;
    loaded.validate()?;
    Ok(loaded)
}

/// Parse and validate a configuration document.
pub fn load_config_from_str(content: &str) -> Result<LoadedConfig, ConfigError> {
    let loaded = LoadedConfig::load_str(content)?;
    loaded.validate()?;
    Ok(loaded)
}

// ─── Tests ──────────────────────────────────────────────────────────
