//! Event Sink Implementations
//!
//! Provides concrete implementations of ReconcileEventSink:
//! - JsonEventSink: NDJSON output for automation
//! - ConsoleEventSink: Human-readable progress

mod console;
mod json;

pub use console::{format_event, ConsoleEventSink};
pub use json::{event_to_json, JsonEventSink};
