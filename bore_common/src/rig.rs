//! Bore rig shared types.
//!
//! Organized by domain: controller state and commands, immutable tunables,
//! reference geometry, the host capability contract, and the per-tick
//! status snapshot.

pub mod config;
pub mod geometry;
pub mod host;
pub mod state;
pub mod status;
