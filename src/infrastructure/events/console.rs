//! Console Event Sink
//!
//! Human-readable progress lines, filtered by verbosity.

use std::io::{self, Write};
use std::sync::Mutex;

use crate::config::Verbosity;
use crate::domain::ports::{ReconcileEvent, ReconcileEventSink};

pub struct ConsoleEventSink {
    verbosity: Verbosity,
    writer: Mutex<Box<dyn Write + Send>>,
}

impl ConsoleEventSink {
    /// Console sink writing to stderr
    pub fn stderr(verbosity: Verbosity) -> Self {
        Self::with_writer(verbosity, io::stderr())
    }

    pub fn with_writer<W: Write + Send + 'static>(verbosity: Verbosity, writer: W) -> Self {
        Self {
            verbosity,
            writer: Mutex::new(Box::new(writer)),
        }
    }

    /// Lowest verbosity at which `event` is shown
    fn threshold(event: &ReconcileEvent) -> Verbosity {
        match event {
            ReconcileEvent::RecordFailed { .. } => Verbosity::Quiet,
            ReconcileEvent::Finished { outcome, .. } if *outcome != "success" => Verbosity::Quiet,
            ReconcileEvent::Started { .. }
            | ReconcileEvent::ParentMissing { .. }
            | ReconcileEvent::Planned { .. }
            | ReconcileEvent::Finished { .. } => Verbosity::Normal,
            ReconcileEvent::PhaseChanged { .. }
            | ReconcileEvent::RecordCreated { .. }
            | ReconcileEvent::RecordUpdated { .. }
            | ReconcileEvent::RecordDeleted { .. }
            | ReconcileEvent::RecordSkipped { .. }
            | ReconcileEvent::RetryScheduled { .. } => Verbosity::Verbose,
            ReconcileEvent::StatusWritten { .. } => Verbosity::Debug,
        }
    }
}

fn rank(verbosity: Verbosity) -> u8 {
    match verbosity {
        Verbosity::Quiet => 0,
        Verbosity::Normal => 1,
        Verbosity::Verbose => 2,
        Verbosity::Debug => 3,
    }
}

/// One display line for an event
pub fn format_event(event: &ReconcileEvent) -> String {
    match event {
        ReconcileEvent::Started { identity, discs } => {
            format!("{identity}: reconciling ({discs} discs)")
        }
        ReconcileEvent::ParentMissing { identity } => {
            format!("{identity}: challenge not found, nothing to do")
        }
        ReconcileEvent::PhaseChanged { identity, from, to } => {
            format!("{identity}: {from} -> {to}")
        }
        ReconcileEvent::Planned {
            identity,
            creates,
            updates,
            deletes,
            unchanged,
        } => format!(
            "{identity}: plan {creates} create, {updates} update, {deletes} delete, {unchanged} unchanged"
        ),
        ReconcileEvent::RecordCreated { name } => format!("  + {name}"),
        ReconcileEvent::RecordUpdated { name, version } => format!("  ~ {name} (v{version})"),
        ReconcileEvent::RecordDeleted { name } => format!("  - {name}"),
        ReconcileEvent::RecordSkipped { name, reason } => format!("  = {name} ({reason})"),
        ReconcileEvent::RetryScheduled {
            name,
            attempt,
            reason,
        } => format!("  ! {name} retry {attempt}: {reason}"),
        ReconcileEvent::RecordFailed {
            name,
            error,
            retryable,
        } => {
            let kind = if *retryable { "will retry" } else { "terminal" };
            format!("  x {name} failed ({kind}): {error}")
        }
        ReconcileEvent::StatusWritten { identity, phase } => {
            format!("{identity}: status {phase}")
        }
        ReconcileEvent::Finished {
            identity,
            outcome,
            reason,
        } => match reason {
            Some(reason) => format!("{identity}: {outcome}: {reason}"),
            None => format!("{identity}: {outcome}"),
        },
    }
}

impl ReconcileEventSink for ConsoleEventSink {
    fn on_event(&self, event: ReconcileEvent) {
        if rank(Self::threshold(&event)) > rank(self.verbosity) {
            return;
        }
        if let Ok(mut writer) = self.writer.lock() {
            let _ = writeln!(writer, "{}", format_event(&event));
            let _ = writer.flush();
        }
    }

    fn wants_detailed_events(&self) -> bool {
        rank(self.verbosity) >= rank(Verbosity::Verbose)
    }
}
