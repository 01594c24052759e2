//! Application Layer
//!
//! Use cases that orchestrate the business flow.
//! This layer:
//! - Depends on Domain layer (entities, services, ports)
//! - Does NOT contain business rules (those are in Domain)
//! - Coordinates between Infrastructure and Domain
//!
//! ## Use Cases
//!
//! - `ReconcileUseCase` - One reconcile attempt (validate, diff, apply, write status)
//! - `ControllerUseCase` - Watch manifests and keep every challenge converged

pub mod controller;
pub mod reconcile;

pub use controller::{ControllerOptions, ControllerSummary, ControllerUseCase, WorkQueue};
pub use reconcile::{Outcome, ReconcileOptions, ReconcileReport, ReconcileUseCase};
