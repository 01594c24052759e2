//! Reconcile Event Port
//!
//! Observable interface for reconcile attempts. Enables progress output,
//! NDJSON event streams, and debugging without the core knowing about
//! terminals or log formats.

use crate::domain::entities::Phase;

/// Event emitted during a reconcile attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReconcileEvent {
    /// Attempt started for a challenge
    Started { identity: String, discs: i64 },

    /// Challenge disappeared before the attempt could read it
    ParentMissing { identity: String },

    /// Phase transition inside the attempt
    PhaseChanged {
        identity: String,
        from: Phase,
        to: Phase,
    },

    /// Diff computed
    Planned {
        identity: String,
        creates: usize,
        updates: usize,
        deletes: usize,
        unchanged: usize,
    },

    /// Record created
    RecordCreated { name: String },

    /// Record payload replaced
    RecordUpdated { name: String, version: u64 },

    /// Stale record removed
    RecordDeleted { name: String },

    /// Operation turned out to be unnecessary or not ours to perform
    RecordSkipped { name: String, reason: String },

    /// A transient failure will be retried
    RetryScheduled {
        name: String,
        attempt: u32,
        reason: String,
    },

    /// An operation gave up
    RecordFailed {
        name: String,
        error: String,
        retryable: bool,
    },

    /// Status document written
    StatusWritten { identity: String, phase: Phase },

    /// Attempt finished
    Finished {
        identity: String,
        outcome: &'static str,
        reason: Option<String>,
    },
}

impl ReconcileEvent {
    /// Per-record events; summary-only sinks skip these
    pub fn is_detailed(&self) -> bool {
        matches!(
            self,
            ReconcileEvent::RecordCreated { .. }
                | ReconcileEvent::RecordUpdated { .. }
                | ReconcileEvent::RecordDeleted { .. }
                | ReconcileEvent::RecordSkipped { .. }
                | ReconcileEvent::RetryScheduled { .. }
        )
    }
}

/// Trait for receiving reconcile events
///
/// Implementations can be:
/// - ConsoleEventSink: human-readable lines filtered by verbosity
/// - JsonEventSink: NDJSON event stream for automation
/// - NoopEventSink: Silent operation
pub trait ReconcileEventSink: Send + Sync {
    /// Handle a reconcile event
    fn on_event(&self, event: ReconcileEvent);

    /// Check if this sink wants detailed events (e.g., per-record)
    fn wants_detailed_events(&self) -> bool {
        true
    }
}

/// Emit `event` unless it is detailed and the sink only wants summaries
pub fn emit(sink: &dyn ReconcileEventSink, event: ReconcileEvent) {
    if event.is_detailed() && !sink.wants_detailed_events() {
        return;
    }
    sink.on_event(event);
}

/// No-op event sink for silent operation
pub struct NoopEventSink;

impl ReconcileEventSink for NoopEventSink {
    fn on_event(&self, _event: ReconcileEvent) {}

    fn wants_detailed_events(&self) -> bool {
        false
    }
}
