//! Status sinks.
//!
//! The controller hands a [`StatusSnapshot`] to every registered sink after
//! each tick, or only to the primary one unless multi-display is enabled.
//! Sinks carry structured data; rendering text is left to the consumer.

use std::io::Write;

use bore_common::rig::host::StatusSink;
use bore_common::rig::state::RigState;
use bore_common::rig::status::{Alert, StatusSnapshot};
use tracing::{debug, info, warn};

/// Logs the snapshot through `tracing`.
///
/// State and alert changes are logged at info level, every other tick at
/// debug level.
#[derive(Debug, Default)]
pub struct LogStatusSink {
    last: Option<(RigState, Alert)>,
}

impl LogStatusSink {
    pub fn new() -> Self {
        Self::default()
    }
}

impl StatusSink for LogStatusSink {
    fn publish(&mut self, s: &StatusSnapshot) {
        let key = (s.state, s.alert);
        if self.last != Some(key) {
            info!(
                cycle = s.cycle,
                state = %s.state,
                alert = ?s.alert,
                group = %s.group_name,
                base = s.actuators.base,
                down = s.actuators.down,
                forward = s.actuators.forward,
                excluded = s.actuators.excluded,
                drills = s.drills,
                rotor = s.rotor_present,
                forward_increment = s.forward_increment,
                free_percent = s.free_cargo_percent,
                "Rig status"
            );
            self.last = Some(key);
        } else {
            debug!(
                cycle = s.cycle,
                state = %s.state,
                free_percent = s.free_cargo_percent,
                descent_velocity = s.descent_velocity,
                "Rig status"
            );
        }
    }
}

/// Writes one JSON object per snapshot, newline-delimited.
#[derive(Debug)]
pub struct JsonStatusSink<W: Write> {
    writer: W,
}

impl<W: Write> JsonStatusSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }
}

impl<W: Write> StatusSink for JsonStatusSink<W> {
    fn publish(&mut self, snapshot: &StatusSnapshot) {
        let result = serde_json::to_writer(&mut self.writer, snapshot)
            .map_err(std::io::Error::from)
            .and_then(|()| self.writer.write_all(b"\n"))
            .and_then(|()| self.writer.flush());
        if let Err(e) = result {
            warn!(error = %e, "Failed to write status snapshot");
        }
    }
}

/// Registered sinks, first one primary.
pub struct StatusBoard {
    sinks: Vec<Box<dyn StatusSink>>,
    multi_display: bool,
}

impl StatusBoard {
    pub fn new(multi_display: bool) -> Self {
        Self {
            sinks: Vec::new(),
            multi_display,
        }
    }

    /// Operator displays: the JSON stream, when one is requested, is the
    /// primary display and the log sink follows it; without one the log
    /// sink is primary.
    pub fn with_displays(multi_display: bool, json: Option<Box<dyn StatusSink>>) -> Self {
        let mut board = Self::new(multi_display);
        if let Some(json) = json {
            board.push(json);
        }
        board.push(Box::new(LogStatusSink::new()));
        board
    }

    pub fn push(&mut self, sink: Box<dyn StatusSink>) {
        self.sinks.push(sink);
    }

    pub fn len(&self) -> usize {
        self.sinks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }

    pub fn publish(&mut self, snapshot: &StatusSnapshot) {
        let count = if self.multi_display { self.sinks.len() } else { 1 };
        for sink in self.sinks.iter_mut().take(count) {
            sink.publish(snapshot);
        }
    }
}

impl std::fmt::Debug for StatusBoard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StatusBoard")
            .field("sinks", &self.sinks.len())
            .field("multi_display", &self.multi_display)
            .finish()
    }
}

// ─── Tests ──────────────────────────────────────────────────────────
