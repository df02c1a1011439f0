//! Simulated rig parts.
//!
//! Each handle wraps `Rc<RefCell<..>>` state: clones observe and command the
//! same physical part. The host is single-threaded, so no locking is needed.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use bore_common::rig::geometry::Vec3;
use bore_common::rig::host::{CargoHold, Drill, Piston, RangeSensor, Rotor};
use tracing::trace;

// ─── Piston ─────────────────────────────────────────────────────────

#[derive(Debug)]
struct PistonBody {
    direction: Vec3,
    lowest: f64,
    highest: f64,
    position: f64,
    min_limit: f64,
    max_limit: f64,
    velocity: f64,
    impulse_axis: f64,
    impulse_non_axis: f64,
    shared_inertia: bool,
}

/// Kinematic linear actuator.
///
/// Moves at its commanded velocity and stops at the tighter of its limit
/// and its physical travel bound. No acceleration, no load.
#[derive(Debug, Clone)]
pub struct SimPiston {
    name: Rc<str>,
    body: Rc<RefCell<PistonBody>>,
}

impl SimPiston {
    /// New piston at `position`, limits opened to the full travel.
    pub fn new(name: &str, direction: Vec3, lowest: f64, highest: f64, position: f64) -> Self {
        let position = position.clamp(lowest, highest);
        Self {
            name: Rc::from(name),
            body: Rc::new(RefCell::new(PistonBody {
                direction,
                lowest,
                highest,
                position,
                min_limit: lowest,
                max_limit: highest,
                velocity: 0.0,
                impulse_axis: 0.0,
                impulse_non_axis: 0.0,
                shared_inertia: false,
            })),
        }
    }

    /// Teleport to `position` (clamped to the travel). Test and restore helper.
    pub fn set_position(&self, position: f64) {
        let mut body = self.body.borrow_mut();
        body.position = position.clamp(body.lowest, body.highest);
    }

    /// Current extension [m].
    pub fn position(&self) -> f64 {
        self.body.borrow().position
    }

    /// Unit extension direction, or zero for a degenerate mount.
    pub fn unit_direction(&self) -> Vec3 {
        self.body.borrow().direction.normalized().unwrap_or(Vec3::ZERO)
    }

    /// Impulse caps last applied (axis, non-axis).
    pub fn impulse_limits(&self) -> (f64, f64) {
        let body = self.body.borrow();
        (body.impulse_axis, body.impulse_non_axis)
    }

    /// Whether the inertia tensor is shared.
    pub fn shares_inertia(&self) -> bool {
        self.body.borrow().shared_inertia
    }

    /// Integrate one step of `dt` seconds.
    pub fn step(&self, dt: f64) {
        let mut body = self.body.borrow_mut();
        let upper = body.max_limit.min(body.highest);
        let lower = body.min_limit.max(body.lowest);
        let v = body.velocity;
        if v > 0.0 && body.position < upper {
            body.position = (body.position + v * dt).min(upper);
        } else if v < 0.0 && body.position > lower {
            body.position = (body.position + v * dt).max(lower);
        }
        trace!(piston = %self.name, position = body.position, velocity = v, "piston step");
    }
}

impl Piston for SimPiston {
    fn name(&self) -> &str {
        &self.name
    }

    fn extension_vector(&self) -> Vec3 {
        self.body.borrow().direction
    }

    fn current_position(&self) -> f64 {
        self.body.borrow().position
    }

    fn lowest_position(&self) -> f64 {
        self.body.borrow().lowest
    }

    fn highest_position(&self) -> f64 {
        self.body.borrow().highest
    }

    fn min_limit(&self) -> f64 {
        self.body.borrow().min_limit
    }

    fn max_limit(&self) -> f64 {
        self.body.borrow().max_limit
    }

    fn set_min_limit(&mut self, limit: f64) {
        let mut body = self.body.borrow_mut();
        body.min_limit = limit.clamp(body.lowest, body.highest);
    }

    fn set_max_limit(&mut self, limit: f64) {
        let mut body = self.body.borrow_mut();
        body.max_limit = limit.clamp(body.lowest, body.highest);
    }

    fn velocity(&self) -> f64 {
        self.body.borrow().velocity
    }

    fn set_velocity(&mut self, velocity: f64) {
        self.body.borrow_mut().velocity = velocity;
    }

    fn set_impulse_limits(&mut self, axis: f64, non_axis: f64) {
        let mut body = self.body.borrow_mut();
        body.impulse_axis = axis;
        body.impulse_non_axis = non_axis;
    }

    fn set_shared_inertia(&mut self, shared: bool) {
        self.body.borrow_mut().shared_inertia = shared;
    }
}

// ─── Rotor ──────────────────────────────────────────────────────────

#[derive(Debug, Default)]
struct RotorBody {
    target_rpm: f64,
    shared_inertia: bool,
}

/// Drill head rotor.
#[derive(Debug, Clone, Default)]
pub struct SimRotor {
    body: Rc<RefCell<RotorBody>>,
}

impl SimRotor {
    /// New rotor at rest.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the inertia tensor is shared.
    pub fn shares_inertia(&self) -> bool {
        self.body.borrow().shared_inertia
    }
}

impl Rotor for SimRotor {
    fn target_rpm(&self) -> f64 {
        self.body.borrow().target_rpm
    }

    fn set_target_rpm(&mut self, rpm: f64) {
        self.body.borrow_mut().target_rpm = rpm;
    }

    fn set_shared_inertia(&mut self, shared: bool) {
        self.body.borrow_mut().shared_inertia = shared;
    }
}

// ─── Drill ──────────────────────────────────────────────────────────

/// One drill unit.
#[derive(Debug, Clone, Default)]
pub struct SimDrill {
    enabled: Rc<Cell<bool>>,
}

impl SimDrill {
    /// New drill, switched off.
    pub fn new() -> Self {
        Self::default()
    }
}

impl Drill for SimDrill {
    fn is_enabled(&self) -> bool {
        self.enabled.get()
    }

    fn set_enabled(&mut self, enabled: bool) {
        self.enabled.set(enabled);
    }
}

// ─── Cargo ──────────────────────────────────────────────────────────

#[derive(Debug)]
struct CargoBody {
    max_volume: f64,
    current_volume: f64,
    functional: bool,
    connected: bool,
}

/// Storage container.
#[derive(Debug, Clone)]
pub struct SimCargo {
    body: Rc<RefCell<CargoBody>>,
}

impl SimCargo {
    /// Empty, functional container.
    pub fn new(max_volume: f64, connected: bool) -> Self {
        Self {
            body: Rc::new(RefCell::new(CargoBody {
                max_volume,
                current_volume: 0.0,
                functional: true,
                connected,
            })),
        }
    }

    /// Set occupied volume (clamped to capacity).
    pub fn set_volume(&self, volume: f64) {
        let mut body = self.body.borrow_mut();
        body.current_volume = volume.clamp(0.0, body.max_volume);
    }

    /// Mark the container damaged or repaired.
    pub fn set_functional(&self, functional: bool) {
        self.body.borrow_mut().functional = functional;
    }

    /// Free volume [m³].
    pub fn free_volume(&self) -> f64 {
        let body = self.body.borrow();
        body.max_volume - body.current_volume
    }

    /// Store up to `volume` m³; returns what did not fit.
    pub fn insert(&self, volume: f64) -> f64 {
        let mut body = self.body.borrow_mut();
        let room = body.max_volume - body.current_volume;
        let stored = volume.min(room).max(0.0);
        body.current_volume += stored;
        volume - stored
    }

    /// Remove up to `volume` m³; returns what could not be removed.
    pub fn remove(&self, volume: f64) -> f64 {
        let mut body = self.body.borrow_mut();
        let taken = volume.min(body.current_volume).max(0.0);
        body.current_volume -= taken;
        volume - taken
    }
}

impl CargoHold for SimCargo {
    fn has_inventory(&self) -> bool {
        true
    }

    fn is_functional(&self) -> bool {
        self.body.borrow().functional
    }

    fn is_connected_to_drill_head(&self) -> bool {
        self.body.borrow().connected
    }

    fn max_volume(&self) -> f64 {
        self.body.borrow().max_volume
    }

    fn current_volume(&self) -> f64 {
        self.body.borrow().current_volume
    }
}

// ─── Range Sensor ───────────────────────────────────────────────────

/// Range sensor reporting the distance the world last computed for it.
#[derive(Debug, Clone)]
pub struct SimRangeSensor {
    distance: Rc<Cell<Option<f64>>>,
}

impl SimRangeSensor {
    /// Sensor with no surface in view.
    pub fn new() -> Self {
        Self {
            distance: Rc::new(Cell::new(None)),
        }
    }

    /// Surface distance now in view, `None` for open sky.
    pub fn set_distance(&self, distance: Option<f64>) {
        self.distance.set(distance);
    }
}

impl Default for SimRangeSensor {
    fn default() -> Self {
        Self::new()
    }
}

impl RangeSensor for SimRangeSensor {
    fn raycast(&mut self, range: f64) -> Option<f64> {
        self.distance.get().filter(|d| *d <= range)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vertical(position: f64) -> SimPiston {
        SimPiston::new("p", Vec3::UNIT_Z, 0.0, 10.0, position)
    }

    #[test]
    fn piston_moves_until_limit() {
        let mut p = vertical(0.0);
        p.set_max_limit(2.0);
        p.set_velocity(1.5);
        p.step(1.0);
        assert_eq!(p.current_position(), 1.5);
        p.step(1.0);
        assert_eq!(p.current_position(), 2.0);
        p.step(1.0);
        assert_eq!(p.current_position(), 2.0);
    }

    #[test]
    fn piston_retracts_to_min_limit() {
        let mut p = vertical(5.0);
        p.set_min_limit(1.0);
        p.set_velocity(-3.0);
        p.step(1.0);
        p.step(1.0);
        assert_eq!(p.current_position(), 1.0);
    }

    #[test]
    fn limits_are_clamped_to_travel() {
        let mut p = vertical(0.0);
        p.set_max_limit(25.0);
        p.set_min_limit(-4.0);
        assert_eq!(p.max_limit(), 10.0);
        assert_eq!(p.min_limit(), 0.0);
    }

    #[test]
    fn clones_share_state() {
        let p = vertical(0.0);
        let mut handle = p.clone();
        handle.set_velocity(0.5);
        assert_eq!(p.velocity(), 0.5);
    }

    #[test]
    fn cargo_insert_overflows() {
        let cargo = SimCargo::new(10.0, true);
        assert_eq!(cargo.insert(4.0), 0.0);
        assert_eq!(cargo.insert(8.0), 2.0);
        assert_eq!(cargo.free_volume(), 0.0);
        assert_eq!(cargo.remove(3.0), 0.0);
        assert_eq!(cargo.current_volume(), 7.0);
    }

    #[test]
    fn range_sensor_respects_range() {
        let sensor = SimRangeSensor::new();
        let mut handle = sensor.clone();
        sensor.set_distance(Some(40.0));
        assert_eq!(handle.raycast(50.0), Some(40.0));
        assert_eq!(handle.raycast(30.0), None);
    }
}
