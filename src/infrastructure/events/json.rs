//! JSON Event Sink
//!
//! Outputs reconcile events as NDJSON for automation consumption.

use crate::domain::ports::{ReconcileEvent, ReconcileEventSink};
use std::io::{self, Write};
use std::sync::Mutex;

/// Event sink that outputs NDJSON events to stdout
pub struct JsonEventSink {
    /// Mutex to ensure thread-safe writes
    writer: Mutex<Box<dyn Write + Send>>,
}

impl JsonEventSink {
    /// Create a new JSON event sink writing to stdout
    pub fn stdout() -> Self {
        Self {
            writer: Mutex::new(Box::new(io::stdout())),
        }
    }

    /// Create a JSON event sink writing to a custom writer
    pub fn with_writer<W: Write + Send + 'static>(writer: W) -> Self {
        Self {
            writer: Mutex::new(Box::new(writer)),
        }
    }

    fn write_event(&self, event: serde_json::Value) {
        if let Ok(mut writer) = self.writer.lock() {
            let _ = writeln!(writer, "{}", event);
            let _ = writer.flush();
        }
    }
}

/// NDJSON shape of an event
pub fn event_to_json(event: &ReconcileEvent) -> serde_json::Value {
    match event {
        ReconcileEvent::Started { identity, discs } => serde_json::json!({
            "event": "start",
            "identity": identity,
            "discs": discs,
        }),

        ReconcileEvent::ParentMissing { identity } => serde_json::json!({
            "event": "parent_missing",
            "identity": identity,
        }),

        ReconcileEvent::PhaseChanged { identity, from, to } => serde_json::json!({
            "event": "phase",
            "identity": identity,
            "from": from.to_string(),
            "to": to.to_string(),
        }),

        ReconcileEvent::Planned {
            identity,
            creates,
            updates,
            deletes,
            unchanged,
        } => serde_json::json!({
            "event": "planned",
            "identity": identity,
            "creates": creates,
            "updates": updates,
            "deletes": deletes,
            "unchanged": unchanged,
        }),

        ReconcileEvent::RecordCreated { name } => serde_json::json!({
            "event": "record_created",
            "name": name,
        }),

        ReconcileEvent::RecordUpdated { name, version } => serde_json::json!({
            "event": "record_updated",
            "name": name,
            "version": version,
        }),

        ReconcileEvent::RecordDeleted { name } => serde_json::json!({
            "event": "record_deleted",
            "name": name,
        }),

        ReconcileEvent::RecordSkipped { name, reason } => serde_json::json!({
            "event": "record_skipped",
            "name": name,
            "reason": reason,
        }),

        ReconcileEvent::RetryScheduled {
            name,
            attempt,
            reason,
        } => serde_json::json!({
            "event": "retry",
            "name": name,
            "attempt": attempt,
            "reason": reason,
        }),

        ReconcileEvent::RecordFailed {
            name,
            error,
            retryable,
        } => serde_json::json!({
            "event": "record_error",
            "name": name,
            "error": error,
            "retryable": retryable,
        }),

        ReconcileEvent::StatusWritten { identity, phase } => serde_json::json!({
            "event": "status",
            "identity": identity,
            "phase": phase.to_string(),
        }),

        ReconcileEvent::Finished {
            identity,
            outcome,
            reason,
        } => serde_json::json!({
            "event": "complete",
            "identity": identity,
            "outcome": outcome,
            "reason": reason,
        }),
    }
}

impl ReconcileEventSink for JsonEventSink {
    fn on_event(&self, event: ReconcileEvent) {
        self.write_event(event_to_json(&event));
    }

    fn wants_detailed_events(&self) -> bool {
        true // JSON mode wants all events
    }
}
