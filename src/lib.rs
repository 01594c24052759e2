//! tower-operator - declarative Tower of Hanoi convergence controller
//!
//! A challenge names a disc count. The reconciler turns it into the solving
//! move sequence, materializes one child record per move in a record store,
//! and converges the store towards that desired state, writing a status
//! document that tracks each attempt.
//!
//! ## Layers
//!
//! - `domain` - value objects, entities, ports and pure services
//! - `application` - reconcile and controller use cases
//! - `infrastructure` - record stores, manifest repository, event sinks
//! - `config` - TOML configuration with env overrides

pub mod application;
pub mod config;
pub mod domain;
pub mod error;
pub mod infrastructure;

// Re-exports for convenience
pub use application::{Outcome, ReconcileOptions, ReconcileReport, ReconcileUseCase};
pub use config::Config;
pub use domain::services::MoveGenerator;
pub use domain::value_objects::{DiscCount, Move, ParentIdentity, Rod};
pub use error::{OperatorError, OperatorResult};
