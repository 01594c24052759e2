//! Controller Module
//!
//! A small reference host that owns requeue and backoff for the reconciler.
//!
//! ## Structure
//!
//! - `queue` - Due-time work queue with per-identity backoff (`WorkQueue`)
//! - `use_case` - Watch/resync loop (`ControllerUseCase`)

mod queue;
mod use_case;

pub use queue::WorkQueue;
pub use use_case::{changed_identity, ControllerOptions, ControllerSummary, ControllerUseCase};
