//! # Bore HAL Library
//!
//! Simulated host for the bore rig controller.
//!
//! Implements the host capability contract from `bore_common::rig::host`
//! with kinematic actuators, a drill head that fills storage while it runs,
//! and range sensors that see the bottom of the current bore.
//!
//! # Module Structure
//!
//! - [`sim`] - Simulated parts, rig world and layout configuration
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                      bore_hal                            │
//! │  ┌────────────┐   discover()   ┌──────────────────────┐  │
//! │  │  SimLayout │──────────────► │  SimRig              │  │
//! │  │  (TOML)    │                │  (RigDiscovery+Plant)│  │
//! │  └────────────┘                └──────────┬───────────┘  │
//! │                                           │ shared parts │
//! │                                           ▼              │
//! │           SimPiston · SimRotor · SimDrill · SimCargo     │
//! │                      · SimRangeSensor                    │
//! └──────────────────────────────────────────────────────────┘
//! ```

#![warn(missing_docs)]

pub mod sim;

pub use crate::sim::{SimLayout, SimRig};
