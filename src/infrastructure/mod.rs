//! Infrastructure Layer
//!
//! Concrete implementations of domain ports.
//! This layer handles all I/O operations.
//!
//! ## Structure
//!
//! - `store/` - Child record stores (Memory, Fs)
//! - `repositories/` - Challenge repositories (Manifest, Memory)
//! - `events/` - Reconcile event sinks (Json, Console)
//! - `fs` - Atomic file writes

pub mod events;
pub mod fs;
pub mod repositories;
pub mod store;

// Re-export for convenience
pub use events::{ConsoleEventSink, JsonEventSink};
pub use repositories::{ManifestRepository, MemoryChallengeRepository};
pub use store::{FsRecordStore, MemoryRecordStore, StoreOp};
