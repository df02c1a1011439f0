//! Simulated rig world.
//!
//! `SimRig` builds every part from a [`SimLayout`], answers discovery
//! requests with shared handles, and integrates the kinematics between
//! controller ticks:
//!
//! 1. Step every piston at its commanded velocity.
//! 2. A change of forward extension starts a fresh bore column.
//! 3. Drills cut (and fill storage) while enabled, spinning, and below the
//!    current bore floor.
//! 4. Storage drains at the configured unload rate.
//! 5. Range sensors see the bore floor.

use std::time::Duration;

use bore_common::rig::geometry::ReferenceFrame;
use bore_common::rig::host::{
    CargoHold, DiscoveryError, Drill, Piston, Plant, RangeSensor, RigDiscovery, RigHandles,
    RigSelector, Rotor,
};
use tracing::{debug, info};

use super::layout::SimLayout;
use super::parts::{SimCargo, SimDrill, SimPiston, SimRangeSensor, SimRotor};

const COLUMN_EPSILON: f64 = 1e-9;

/// The simulated rig and the ground it bores into.
#[derive(Debug)]
pub struct SimRig {
    layout: SimLayout,
    frame: ReferenceFrame,
    pistons: Vec<SimPiston>,
    rotor: Option<SimRotor>,
    drills: Vec<SimDrill>,
    cargo: Vec<SimCargo>,
    sensors: Vec<SimRangeSensor>,
    /// Head height at which the drill tips touch undisturbed ground.
    ground_level: f64,
    /// Lowest head height reached in the current column.
    floor_level: f64,
    last_forward: f64,
    elapsed: Duration,
}

impl SimRig {
    /// Build the rig described by `layout`, oriented Z-up / X-forward.
    pub fn new(layout: SimLayout) -> Self {
        let frame = ReferenceFrame::default();
        let travel = layout.piston_travel;
        let mut pistons = Vec::new();
        for i in 0..layout.base_pistons {
            pistons.push(SimPiston::new(
                &format!("Piston Base {}", i + 1),
                frame.up,
                0.0,
                travel,
                travel,
            ));
        }
        for i in 0..layout.down_pistons {
            pistons.push(SimPiston::new(
                &format!("Piston Down {}", i + 1),
                frame.down,
                0.0,
                travel,
                0.0,
            ));
        }
        for i in 0..layout.forward_pistons {
            pistons.push(SimPiston::new(
                &format!("Piston Forward {}", i + 1),
                frame.forward,
                0.0,
                travel,
                0.0,
            ));
        }
        for i in 0..layout.backward_pistons {
            pistons.push(SimPiston::new(
                &format!("Piston Backward {}", i + 1),
                frame.backward,
                0.0,
                travel,
                0.0,
            ));
        }

        let rotor = layout.rotor.then(SimRotor::new);
        let drills = (0..layout.drills).map(|_| SimDrill::new()).collect();
        let cargo = (0..layout.cargo_containers)
            .map(|_| SimCargo::new(layout.cargo_volume, true))
            .chain(
                (0..layout.isolated_containers).map(|_| SimCargo::new(layout.cargo_volume, false)),
            )
            .collect();
        let sensors = (0..layout.range_sensors).map(|_| SimRangeSensor::new()).collect();

        let mut rig = Self {
            layout,
            frame,
            pistons,
            rotor,
            drills,
            cargo,
            sensors,
            ground_level: 0.0,
            floor_level: 0.0,
            last_forward: 0.0,
            elapsed: Duration::ZERO,
        };
        rig.ground_level = rig.head_height() - rig.layout.initial_clearance;
        rig.floor_level = rig.ground_level;
        rig.last_forward = rig.forward_extension();
        rig.update_sensors();
        info!(
            "Simulated rig '{}': {} pistons, {} drills, {} containers, rotor={}",
            rig.layout.group_name,
            rig.pistons.len(),
            rig.drills.len(),
            rig.cargo.len(),
            rig.rotor.is_some()
        );
        rig
    }

    /// Layout the rig was built from.
    pub fn layout(&self) -> &SimLayout {
        &self.layout
    }

    /// All pistons, in construction order (base, down, forward, backward).
    pub fn pistons(&self) -> &[SimPiston] {
        &self.pistons
    }

    /// Drill head rotor, if the layout has one.
    pub fn rotor(&self) -> Option<&SimRotor> {
        self.rotor.as_ref()
    }

    /// Drill units.
    pub fn drills(&self) -> &[SimDrill] {
        &self.drills
    }

    /// Storage containers (connected first, then isolated).
    pub fn cargo(&self) -> &[SimCargo] {
        &self.cargo
    }

    /// Range sensors.
    pub fn range_sensors(&self) -> &[SimRangeSensor] {
        &self.sensors
    }

    /// Simulated time since construction.
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// Drill head height relative to the rig mount [m].
    pub fn head_height(&self) -> f64 {
        self.pistons
            .iter()
            .map(|p| p.position() * p.unit_direction().dot(self.frame.up))
            .sum()
    }

    /// Total forward extension [m].
    pub fn forward_extension(&self) -> f64 {
        self.pistons
            .iter()
            .map(|p| p.position() * p.unit_direction().dot(self.frame.forward))
            .sum()
    }

    /// Depth of the current bore below undisturbed ground [m].
    pub fn bore_depth(&self) -> f64 {
        self.ground_level - self.floor_level
    }

    /// Free fraction over connected storage.
    pub fn free_fraction(&self) -> f64 {
        let (free, total) = self
            .cargo
            .iter()
            .filter(|c| c.is_connected_to_drill_head())
            .fold((0.0, 0.0), |(f, t), c| (f + c.free_volume(), t + c.max_volume()));
        if total > 0.0 { free / total } else { 0.0 }
    }

    /// Drills enabled and rotor spinning.
    pub fn is_drilling(&self) -> bool {
        let spinning = self.rotor.as_ref().is_some_and(|r| r.target_rpm() != 0.0);
        spinning && self.drills.iter().any(|d| d.is_enabled())
    }

    fn store(&self, mut volume: f64) {
        for container in self.cargo.iter().filter(|c| c.is_connected_to_drill_head()) {
            volume = container.insert(volume);
            if volume <= 0.0 {
                return;
            }
        }
        if volume > 0.0 {
            debug!("Storage full, {volume:.3} m³ spilled");
        }
    }

    fn drain(&self, mut volume: f64) {
        for container in &self.cargo {
            volume = container.remove(volume);
            if volume <= 0.0 {
                return;
            }
        }
    }

    fn update_sensors(&self) {
        let clearance = (self.head_height() - self.floor_level).max(0.0);
        for sensor in &self.sensors {
            sensor.set_distance(Some(self.layout.sensor_offset + clearance));
        }
    }
}

impl Plant for SimRig {
    fn advance(&mut self, dt: Duration) {
        let dt_s = dt.as_secs_f64();
        for piston in &self.pistons {
            piston.step(dt_s);
        }

        let forward = self.forward_extension();
        if (forward - self.last_forward).abs() > COLUMN_EPSILON {
            self.floor_level = self.ground_level;
            self.last_forward = forward;
        }

        let head = self.head_height();
        if self.is_drilling() && head < self.floor_level {
            self.floor_level = head;
            self.store(self.layout.fill_rate * dt_s);
        }

        if self.layout.drain_rate > 0.0 {
            self.drain(self.layout.drain_rate * dt_s);
        }

        self.update_sensors();
        self.elapsed += dt;
    }
}

impl RigDiscovery for SimRig {
    fn discover(&mut self, selector: &RigSelector) -> Result<RigHandles, DiscoveryError> {
        if let RigSelector::Group(name) = selector {
            if *name != self.layout.group_name {
                return Err(DiscoveryError::GroupNotFound(name.clone()));
            }
        }
        debug!("Discovery for {selector:?}");

        Ok(RigHandles {
            frame: self.frame,
            pistons: self
                .pistons
                .iter()
                .map(|p| Box::new(p.clone()) as Box<dyn Piston>)
                .collect(),
            rotor: self
                .rotor
                .as_ref()
                .map(|r| Box::new(r.clone()) as Box<dyn Rotor>),
            drills: self
                .drills
                .iter()
                .map(|d| Box::new(d.clone()) as Box<dyn Drill>)
                .collect(),
            cargo: self
                .cargo
                .iter()
                .map(|c| Box::new(c.clone()) as Box<dyn CargoHold>)
                .collect(),
            range_sensors: self
                .sensors
                .iter()
                .map(|s| Box::new(s.clone()) as Box<dyn RangeSensor>)
                .collect(),
        })
    }
}
