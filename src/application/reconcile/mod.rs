//! Reconcile Module
//!
//! One reconcile attempt for one challenge: validate the spec, derive the
//! desired records, diff against the store, apply, and write status.
//!
//! ## Structure
//!
//! - `options` - Configuration types (`ReconcileOptions`)
//! - `outcome` - Result types (`Outcome`, `ReconcileReport`)
//! - `use_case` - The state machine (`ReconcileUseCase`)
//!
//! ## Usage
//!
//! ```ignore
//! use tower_operator::application::reconcile::{ReconcileOptions, ReconcileUseCase};
//!
//! let use_case = ReconcileUseCase::new(repository, store);
//! let report = use_case.reconcile(&identity, &ReconcileOptions::default());
//! ```

mod options;
mod outcome;
mod use_case;

pub use options::ReconcileOptions;
pub use outcome::{Outcome, ReconcileReport};
pub use use_case::ReconcileUseCase;
