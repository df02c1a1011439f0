//! Simulation host module.
//!
//! Every part handle is a cheap clone sharing its state with the `SimRig`
//! world, so the controller can own its handles while the world keeps
//! integrating them between ticks.

mod layout;
mod parts;
mod rig;

pub use layout::SimLayout;
pub use parts::{SimCargo, SimDrill, SimPiston, SimRangeSensor, SimRotor};
pub use rig::SimRig;
