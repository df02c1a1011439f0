//! Clearance-driven descent speed.
//!
//! Sensors cast toward the bore floor; the closest hit less the sensor
//! offset is the clearance. The target speed grows with clearance but never
//! drops below the nominal descent rate, so the adapter can only speed the
//! descent up while the head is far from the floor.

use bore_common::rig::config::RangeConfig;
use bore_common::rig::host::RangeSensor;
use tracing::debug;

/// Clearance for a set of hit distances, `fallback_distance` when there are none.
pub fn clearance<I>(hits: I, config: &RangeConfig) -> f64
where
    I: IntoIterator<Item = f64>,
{
    hits.into_iter()
        .filter(|d| d.is_finite())
        .reduce(f64::min)
        .map(|closest| (closest - config.camera_offset).max(0.0))
        .unwrap_or(config.fallback_distance)
}

/// Speed proportional to clearance.
#[inline]
pub fn target_speed(clearance: f64, config: &RangeConfig) -> f64 {
    clearance * config.slowdown_factor
}

/// Commanded descent speed: the target, floored at `nominal`.
#[inline]
pub fn descent_speed(clearance: f64, nominal: f64, config: &RangeConfig) -> f64 {
    target_speed(clearance, config).max(nominal)
}

/// Owns the range sensors of the rig.
pub struct RangeSensorAdapter {
    sensors: Vec<Box<dyn RangeSensor>>,
    config: RangeConfig,
}

impl RangeSensorAdapter {
    pub fn new(sensors: Vec<Box<dyn RangeSensor>>, config: RangeConfig) -> Self {
        Self { sensors, config }
    }

    /// Cast every sensor and reduce to a clearance.
    pub fn measure(&mut self) -> f64 {
        let range = self.config.scan_range;
        let hits: Vec<f64> = self.sensors.iter_mut().filter_map(|s| s.raycast(range)).collect();
        let value = clearance(hits.iter().copied(), &self.config);
        debug!(hits = hits.len(), clearance = value, "Range measured");
        value
    }

    /// Measure and derive the commanded descent speed.
    pub fn descent_speed(&mut self, nominal: f64) -> f64 {
        let clearance = self.measure();
        descent_speed(clearance, nominal, &self.config)
    }
}

impl std::fmt::Debug for RangeSensorAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RangeSensorAdapter")
            .field("sensors", &self.sensors.len())
            .field("config", &self.config)
            .finish()
    }
}

// ─── Tests ──────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use bore_hal::sim::SimRangeSensor;

    #[test]
    fn clearance_uses_closest_hit_less_offset() {
        let config = RangeConfig::default();
        assert_eq!(clearance([12.5, 7.5, 30.0], &config), 5.0);
        assert_eq!(clearance([1.0], &config), 0.0);
        assert_eq!(clearance(std::iter::empty(), &config), config.fallback_distance);
    }

    #[test]
    fn descent_speed_never_below_nominal() {
        let config = RangeConfig::default();
        let nominal = 0.15;
        let mut clearance = 0.0;
        while clearance < 500.0 {
            assert!(descent_speed(clearance, nominal, &config) >= nominal);
            clearance += 0.37;
        }
        assert!(descent_speed(f64::NAN, nominal, &config) >= nominal);
    }

    #[test]
    fn far_floor_speeds_up_descent() {
        let config = RangeConfig::default();
        assert_eq!(descent_speed(40.0, 0.15, &config), 40.0 * config.slowdown_factor);
        assert_eq!(descent_speed(1.0, 0.15, &config), 0.15);
    }

    #[test]
    fn adapter_reads_all_sensors() {
        let near = SimRangeSensor::new();
        let far = SimRangeSensor::new();
        let blind = SimRangeSensor::new();
        near.set_distance(Some(22.5));
        far.set_distance(Some(60.0));

        let config = RangeConfig::default();
        let mut adapter = RangeSensorAdapter::new(
            vec![Box::new(near), Box::new(far), Box::new(blind)],
            config,
        );
        assert_eq!(adapter.measure(), 20.0);
        assert_eq!(adapter.descent_speed(0.15), 20.0 * config.slowdown_factor);
    }
}
