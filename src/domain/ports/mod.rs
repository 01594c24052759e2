//! Domain Ports (Interfaces)
//!
//! These traits define the boundaries of the domain layer.
//! Infrastructure layer provides concrete implementations.

pub mod challenge_repository;
pub mod reconcile_events;
pub mod record_store;

pub use challenge_repository::{ChallengeRepository, RepositoryError, RepositoryResult};
pub use reconcile_events::{emit, NoopEventSink, ReconcileEvent, ReconcileEventSink};
pub use record_store::{ChildRecordStore, StoreError, StoreResult};
