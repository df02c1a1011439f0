//! Rig hardware as the controller sees it.
//!
//! Classification runs once at startup and partitions the discovered
//! actuators into role groups; the groups answer the completion predicates
//! the sequence controller polls every tick.

pub mod classify;
pub mod groups;
