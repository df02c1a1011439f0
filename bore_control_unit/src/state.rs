//! Sequence state machine module root.

pub mod machine;

pub use machine::SequenceController;
