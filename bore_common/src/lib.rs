//! Bore Common Library
//!
//! Shared types, constants and configuration loading for all bore rig
//! workspace crates.
//!
//! # Module Structure
//!
//! - [`rig`] - Rig state, commands, tunables, host contract and status types
//! - [`config`] - Configuration loading traits and types
//! - [`consts`] - Workspace-wide defaults
//! - [`prelude`] - Common re-exports for convenience
//!
//! # Usage
//!
//! ```rust
//! use bore_common::prelude::*;
//!
//! let state = RigState::from_tag("movingdown").unwrap();
//! assert_eq!(state, RigState::MovingDown);
//! ```

pub mod config;
pub mod consts;
pub mod prelude;
pub mod rig;
