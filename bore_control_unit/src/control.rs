//! Actuation and sensing collaborators of the sequence controller.
//!
//! - [`driver`]: fans group-level motion commands out to individual actuators
//! - [`inventory`]: storage fullness with start/stop hysteresis
//! - [`range`]: clearance-based descent speed

pub mod driver;
pub mod inventory;
pub mod range;
