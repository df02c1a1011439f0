//! # Bore Control Unit Library
//!
//! Autonomous sequencing controller for a piston-driven bore rig: vertical
//! "base" and "down" actuator groups sink the drill head, a "forward" group
//! advances the rig between bores, and a rotor spins the head.
//!
//! ## Layers
//!
//! 1. **rig**: actuator role classification and role groups
//! 2. **control**: group-level motion, storage hysteresis, range sensing
//! 3. **state**: the sequence state machine
//! 4. **cycle**: the periodic tick loop with persistence and status sinks
//!
//! Host access goes through the capability traits in
//! [`bore_common::rig::host`]; `bore_hal` provides a simulated host.

pub mod command;
pub mod config;
pub mod control;
pub mod cycle;
pub mod display;
pub mod persist;
pub mod rig;
pub mod state;
