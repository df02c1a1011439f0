//! Integration tests for the Bore Control Unit.
//!
//! These tests run the controller against the simulated rig from
//! `bore_hal`, through the same config loader, tick loop and state store the
//! binary uses.

mod integration;
