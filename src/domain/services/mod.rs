//! Domain Services
//!
//! Pure business logic services that operate on domain entities.
//! Only the collector and the applier talk to a store, and only through the
//! `ChildRecordStore` port.

mod applier;
mod desired_state;
mod differ;
mod move_generator;
mod observed_state;
mod retry;

pub use applier::{Applier, ApplyFailure, ApplyReport};
pub use desired_state::DesiredState;
pub use differ::{Differ, PlannedUpdate, ReconcileOperation, ReconcilePlan, RecordAction};
pub use move_generator::MoveGenerator;
pub use observed_state::{ObservedState, ObservedStateCollector};
pub use retry::{Backoff, RetryPolicy};
