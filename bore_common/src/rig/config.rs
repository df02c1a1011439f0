//! Immutable rig tunables.
//!
//! All types use `serde::Deserialize` for TOML loading and
//! `#[serde(default)]` so a partial document falls back to the stock rig.
//! A `BoreConfig` is built once at startup and passed by reference into
//! every component; nothing mutates it afterwards.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::config::ConfigError;
use crate::consts::{
    DEFAULT_GROUP_NAME, DEFAULT_TICK_INTERVAL_MS, FORWARD_INCREMENT_BASE,
    FORWARD_INCREMENT_PER_RADIUS, TICK_INTERVAL_MS_MAX, TICK_INTERVAL_MS_MIN,
};

// ─── Top-Level Config ───────────────────────────────────────────────

/// Complete controller configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BoreConfig {
    #[serde(default)]
    pub rig: RigConfig,
    #[serde(default)]
    pub thresholds: ThresholdConfig,
    #[serde(default)]
    pub motion: MotionConfig,
    #[serde(default)]
    pub range: RangeConfig,
    #[serde(default)]
    pub features: FeatureFlags,
}

impl BoreConfig {
    /// Validate every section, reporting the first failure.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.rig
            .validate()
            .and_then(|()| self.thresholds.validate())
            .and_then(|()| self.motion.validate())
            .and_then(|()| self.range.validate())
            .map_err(ConfigError::ValidationError)
    }
}

// ─── Rig Identity & Lifecycle ───────────────────────────────────────

/// Identity and lifecycle of the rig.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RigConfig {
    /// Block group holding every rig part (dynamic group discovery).
    #[serde(default = "default_group_name")]
    pub group_name: String,

    /// Enter `Ready` after a successful setup instead of `Stopped`.
    #[serde(default = "default_true")]
    pub auto_start: bool,

    /// Host tick period [ms].
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,
}

fn default_group_name() -> String {
    DEFAULT_GROUP_NAME.to_string()
}
fn default_true() -> bool {
    true
}
fn default_tick_interval_ms() -> u64 {
    DEFAULT_TICK_INTERVAL_MS
}

impl Default for RigConfig {
    fn default() -> Self {
        Self {
            group_name: default_group_name(),
            auto_start: true,
            tick_interval_ms: DEFAULT_TICK_INTERVAL_MS,
        }
    }
}

impl RigConfig {
    /// Tick period as a `Duration`.
    #[inline]
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    pub fn validate(&self) -> Result<(), String> {
        if !(TICK_INTERVAL_MS_MIN..=TICK_INTERVAL_MS_MAX).contains(&self.tick_interval_ms) {
            return Err(format!(
                "tick_interval_ms {} out of range [{}, {}]",
                self.tick_interval_ms, TICK_INTERVAL_MS_MIN, TICK_INTERVAL_MS_MAX
            ));
        }
        Ok(())
    }
}

// ─── Storage Hysteresis ─────────────────────────────────────────────

/// Free-storage fractions for the pause/resume trigger.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ThresholdConfig {
    /// Resume digging once the free fraction is at least this.
    #[serde(default = "default_start_free")]
    pub start_free_fraction: f64,

    /// Pause digging once the free fraction drops below this.
    #[serde(default = "default_stop_free")]
    pub stop_free_fraction: f64,
}

fn default_start_free() -> f64 {
    0.40
}
fn default_stop_free() -> f64 {
    0.20
}

impl Default for ThresholdConfig {
    fn default() -> Self {
        Self {
            start_free_fraction: default_start_free(),
            stop_free_fraction: default_stop_free(),
        }
    }
}

impl ThresholdConfig {
    pub fn validate(&self) -> Result<(), String> {
        for (name, value) in [
            ("start_free_fraction", self.start_free_fraction),
            ("stop_free_fraction", self.stop_free_fraction),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(format!("{name} {value} out of range [0, 1]"));
            }
        }
        if self.stop_free_fraction >= self.start_free_fraction {
            return Err(format!(
                "stop_free_fraction {} must be below start_free_fraction {}",
                self.stop_free_fraction, self.start_free_fraction
            ));
        }
        Ok(())
    }
}

// ─── Motion ─────────────────────────────────────────────────────────

/// Velocities, limits and physics properties of the actuators.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MotionConfig {
    /// Drills from the centre drill to the edge, excluding the centre one.
    #[serde(default = "default_drill_head_radius")]
    pub drill_head_radius: f64,

    /// Rotor speed while drilling [rpm].
    #[serde(default = "default_rotor_rpm")]
    pub rotor_rpm: f64,

    /// Total descent velocity across all vertical actuators [m/s].
    #[serde(default = "default_downward_velocity")]
    pub downward_velocity: f64,

    /// Total ascent velocity across all vertical actuators [m/s].
    #[serde(default = "default_one")]
    pub upward_velocity: f64,

    /// Total forward velocity across the forward group [m/s].
    #[serde(default = "default_one")]
    pub forward_velocity: f64,

    /// Impulse cap along the actuator axis [N].
    #[serde(default = "default_impulse")]
    pub max_impulse_axis: f64,

    /// Impulse cap across the actuator axis [N].
    #[serde(default = "default_impulse")]
    pub max_impulse_non_axis: f64,

    /// Vertical travel kept in reserve, split over all vertical actuators [m].
    #[serde(default)]
    pub min_vertical_reservation: f64,

    /// Slack allowed when comparing positions against limits [m].
    /// Zero compares against the exact boundary.
    #[serde(default)]
    pub position_tolerance: f64,

    /// Share inertia tensors between actuators, rotor and sub-grids.
    #[serde(default = "default_true")]
    pub share_inertia: bool,
}

fn default_drill_head_radius() -> f64 {
    6.0
}
fn default_rotor_rpm() -> f64 {
    0.4
}
fn default_downward_velocity() -> f64 {
    0.15
}
fn default_one() -> f64 {
    1.0
}
fn default_impulse() -> f64 {
    200_000.0
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            drill_head_radius: default_drill_head_radius(),
            rotor_rpm: default_rotor_rpm(),
            downward_velocity: default_downward_velocity(),
            upward_velocity: 1.0,
            forward_velocity: 1.0,
            max_impulse_axis: default_impulse(),
            max_impulse_non_axis: default_impulse(),
            min_vertical_reservation: 0.0,
            position_tolerance: 0.0,
            share_inertia: true,
        }
    }
}

impl MotionConfig {
    /// Horizontal advance between bores [m], derived from the drill head radius.
    #[inline]
    pub fn forward_increment(&self) -> f64 {
        FORWARD_INCREMENT_PER_RADIUS * self.drill_head_radius + FORWARD_INCREMENT_BASE
    }

    pub fn validate(&self) -> Result<(), String> {
        for (name, value) in [
            ("downward_velocity", self.downward_velocity),
            ("upward_velocity", self.upward_velocity),
            ("forward_velocity", self.forward_velocity),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return Err(format!("{name} must be positive, got {value}"));
            }
        }
        for (name, value) in [
            ("drill_head_radius", self.drill_head_radius),
            ("rotor_rpm", self.rotor_rpm),
            ("max_impulse_axis", self.max_impulse_axis),
            ("max_impulse_non_axis", self.max_impulse_non_axis),
            ("min_vertical_reservation", self.min_vertical_reservation),
            ("position_tolerance", self.position_tolerance),
        ] {
            if !(value.is_finite() && value >= 0.0) {
                return Err(format!("{name} must be non-negative, got {value}"));
            }
        }
        Ok(())
    }
}

// ─── Range Sensing ──────────────────────────────────────────────────

/// Range-sensor descent adaptation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RangeConfig {
    /// Maximum cast distance [m].
    #[serde(default = "default_scan_range")]
    pub scan_range: f64,

    /// Clearance assumed when no sensor reports a hit [m].
    #[serde(default = "default_fallback_distance")]
    pub fallback_distance: f64,

    /// Distance from the sensors to the drill tips [m].
    #[serde(default = "default_camera_offset")]
    pub camera_offset: f64,

    /// Descent speed per metre of clearance [1/s].
    #[serde(default = "default_slowdown_factor")]
    pub slowdown_factor: f64,
}

fn default_scan_range() -> f64 {
    100.0
}
fn default_fallback_distance() -> f64 {
    100.0
}
fn default_camera_offset() -> f64 {
    2.5
}
fn default_slowdown_factor() -> f64 {
    0.05
}

impl Default for RangeConfig {
    fn default() -> Self {
        Self {
            scan_range: default_scan_range(),
            fallback_distance: default_fallback_distance(),
            camera_offset: default_camera_offset(),
            slowdown_factor: default_slowdown_factor(),
        }
    }
}

impl RangeConfig {
    pub fn validate(&self) -> Result<(), String> {
        if !(self.scan_range.is_finite() && self.scan_range > 0.0) {
            return Err(format!("scan_range must be positive, got {}", self.scan_range));
        }
        for (name, value) in [
            ("fallback_distance", self.fallback_distance),
            ("camera_offset", self.camera_offset),
            ("slowdown_factor", self.slowdown_factor),
        ] {
            if !(value.is_finite() && value >= 0.0) {
                return Err(format!("{name} must be non-negative, got {value}"));
            }
        }
        Ok(())
    }
}

// ─── Feature Flags ──────────────────────────────────────────────────

/// Optional behaviour, all decided at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureFlags {
    /// Adapt descent speed from range sensors.
    #[serde(default)]
    pub range_sensing: bool,

    /// Publish status to every registered sink, not only the primary one.
    #[serde(default)]
    pub multi_display: bool,

    /// Discover parts by block group name instead of the whole construct.
    #[serde(default = "default_true")]
    pub dynamic_group_discovery: bool,
}

impl Default for FeatureFlags {
    fn default() -> Self {
        Self {
            range_sensing: false,
            multi_display: false,
            dynamic_group_discovery: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert!(BoreConfig::default().validate().is_ok());
    }

    #[test]
    fn forward_increment_from_radius() {
        let motion = MotionConfig::default();
        assert_eq!(motion.forward_increment(), 16.25);
    }

    #[test]
    fn thresholds_must_be_ordered() {
        let t = ThresholdConfig {
            start_free_fraction: 0.2,
            stop_free_fraction: 0.2,
        };
        assert!(t.validate().is_err());

        let t = ThresholdConfig {
            start_free_fraction: 1.5,
            stop_free_fraction: 0.2,
        };
        assert!(t.validate().unwrap_err().contains("start_free_fraction"));
    }

    #[test]
    fn velocities_must_be_positive() {
        let mut config = BoreConfig::default();
        config.motion.upward_velocity = 0.0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ValidationError(msg)) if msg.contains("upward_velocity")
        ));
    }

    #[test]
    fn tick_interval_bounds() {
        let mut rig = RigConfig::default();
        rig.tick_interval_ms = 0;
        assert!(rig.validate().is_err());
        assert_eq!(RigConfig::default().tick_interval(), Duration::from_millis(1667));
    }

    #[test]
    fn partial_document_uses_defaults() {
        let config: BoreConfig = toml::from_str(
            r#"
[thresholds]
stop_free_fraction = 0.1

[features]
range_sensing = true
"#,
        )
        .unwrap();
        assert_eq!(config.thresholds.stop_free_fraction, 0.1);
        assert_eq!(config.thresholds.start_free_fraction, 0.40);
        assert!(config.features.range_sensing);
        assert!(config.features.dynamic_group_discovery);
        assert_eq!(config.rig.group_name, "Autominer 1");
    }
}
