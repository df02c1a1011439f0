//! Controller state, operator commands and actuator roles.
//!
//! `RigState` is a closed enum inside the workspace. Strings only appear at
//! the persistence boundary (`tag` / `from_tag`) and at the command input
//! boundary (`RigCommand::from_str`).

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Sequencing controller state.
///
/// There is no terminal state: `Stopped` is both the rest state and the end
/// of the reset path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum RigState {
    /// Idle, nothing commanded.
    #[default]
    Stopped,
    /// Armed; the next tick begins descent.
    Ready,
    /// Drilling downward.
    #[serde(rename = "movingdown")]
    MovingDown,
    /// Raising the drill head out of the bore.
    #[serde(rename = "movingup")]
    MovingUp,
    /// Advancing the forward group by one increment.
    #[serde(rename = "movingforward")]
    MovingForward,
    /// Storage full, waiting for free space.
    Paused,
    /// Reset requested.
    ResetStart,
    /// Reset: raising the drill head.
    ResetLifting,
    /// Retracting the forward group back to its origin.
    ResetRetracting,
}

/// Every state, in sequence order.
pub const ALL_STATES: [RigState; 9] = [
    RigState::Stopped,
    RigState::Ready,
    RigState::MovingDown,
    RigState::MovingUp,
    RigState::MovingForward,
    RigState::Paused,
    RigState::ResetStart,
    RigState::ResetLifting,
    RigState::ResetRetracting,
];

/// Persisted tag could not be mapped to a state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown rig state tag '{0}'")]
pub struct ParseStateError(pub String);

impl RigState {
    /// Opaque tag written to persistent storage.
    pub const fn tag(self) -> &'static str {
        match self {
            Self::Stopped => "stopped",
            Self::Ready => "ready",
            Self::MovingDown => "movingdown",
            Self::MovingUp => "movingup",
            Self::MovingForward => "movingforward",
            Self::Paused => "paused",
            Self::ResetStart => "reset_start",
            Self::ResetLifting => "reset_lifting",
            Self::ResetRetracting => "reset_retracting",
        }
    }

    /// Parse a persisted tag. Surrounding whitespace is ignored.
    pub fn from_tag(tag: &str) -> Result<Self, ParseStateError> {
        let tag = tag.trim();
        ALL_STATES
            .into_iter()
            .find(|s| s.tag() == tag)
            .ok_or_else(|| ParseStateError(tag.to_string()))
    }
}

impl fmt::Display for RigState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Operator override delivered alongside a tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RigCommand {
    /// Arm the rig; descent starts on the same tick.
    Start,
    /// Stop vertical motion, rotor and drills.
    Stop,
    /// Raise the drill head.
    MoveUp,
    /// Lift, retract the forward group and stop.
    Reset,
}

/// Argument string is not a known command.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown command '{0}'")]
pub struct ParseCommandError(pub String);

impl RigCommand {
    /// Argument string accepted on the command input.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Stop => "stop",
            Self::MoveUp => "moveup",
            Self::Reset => "reset",
        }
    }

    /// Parse an optional argument. Empty input means "no override".
    ///
    /// Unknown arguments are reported so the caller can log and ignore them.
    pub fn parse_argument(argument: &str) -> Result<Option<Self>, ParseCommandError> {
        if argument.trim().is_empty() {
            return Ok(None);
        }
        argument.parse().map(Some)
    }
}

impl FromStr for RigCommand {
    type Err = ParseCommandError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "start" => Ok(Self::Start),
            "stop" => Ok(Self::Stop),
            "moveup" => Ok(Self::MoveUp),
            "reset" => Ok(Self::Reset),
            other => Err(ParseCommandError(other.to_string())),
        }
    }
}

impl fmt::Display for RigCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Functional role assigned to a linear actuator at classification time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActuatorRole {
    /// Vertical, extends upward; retracts to lower the rig body.
    Base,
    /// Vertical, extends downward; pushes the drill head into the ground.
    Down,
    /// Horizontal, advances the rig between bores.
    Forward,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_state_is_stopped() {
        assert_eq!(RigState::default(), RigState::Stopped);
    }

    #[test]
    fn tags_are_unique_and_parse_back() {
        for (i, a) in ALL_STATES.iter().enumerate() {
            assert_eq!(RigState::from_tag(a.tag()), Ok(*a));
            for b in &ALL_STATES[i + 1..] {
                assert_ne!(a.tag(), b.tag());
            }
        }
    }

    #[test]
    fn from_tag_trims_and_rejects_unknown() {
        assert_eq!(RigState::from_tag(" paused\n"), Ok(RigState::Paused));
        assert_eq!(
            RigState::from_tag("digging"),
            Err(ParseStateError("digging".to_string()))
        );
        assert!(RigState::from_tag("").is_err());
    }

    #[test]
    fn command_parsing() {
        assert_eq!("start".parse(), Ok(RigCommand::Start));
        assert_eq!("moveup".parse(), Ok(RigCommand::MoveUp));
        assert!("MOVEUP".parse::<RigCommand>().is_err());
        assert_eq!(RigCommand::parse_argument(""), Ok(None));
        assert_eq!(RigCommand::parse_argument("reset"), Ok(Some(RigCommand::Reset)));
        assert!(RigCommand::parse_argument("dance").is_err());
    }
}
