//! Reconcile result types

use crate::domain::entities::{ChallengeStatus, Phase};
use crate::domain::services::ApplyReport;

/// What the host should do next
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Converged, or nothing to do
    Success,
    /// Try again later; the host owns backoff
    RetryableFailure(String),
    /// Do not retry until something outside changes
    TerminalFailure(String),
}

impl Outcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success)
    }

    pub fn is_retryable(&self) -> bool {
        matches!(self, Outcome::RetryableFailure(_))
    }

    pub fn reason(&self) -> Option<&str> {
        match self {
            Outcome::Success => None,
            Outcome::RetryableFailure(r) | Outcome::TerminalFailure(r) => Some(r),
        }
    }

    /// Short label used in events and CLI output
    pub fn label(&self) -> &'static str {
        match self {
            Outcome::Success => "success",
            Outcome::RetryableFailure(_) => "retry",
            Outcome::TerminalFailure(_) => "failed",
        }
    }

    /// Process exit code for one-shot reconciles
    pub fn exit_code(&self) -> i32 {
        match self {
            Outcome::Success => 0,
            Outcome::TerminalFailure(_) => 1,
            Outcome::RetryableFailure(_) => 2,
        }
    }
}

/// Everything one attempt did
#[derive(Debug, Clone)]
pub struct ReconcileReport {
    pub identity: String,
    pub outcome: Outcome,
    /// Phases entered during the attempt, starting at `Pending`
    pub transitions: Vec<Phase>,
    /// Status written at the end of the attempt, if any
    pub status: Option<ChallengeStatus>,
    /// Apply pass results, if the attempt got that far
    pub apply: Option<ApplyReport>,
    /// The challenge no longer exists
    pub parent_missing: bool,
}

impl ReconcileReport {
    pub(super) fn new(identity: &str) -> Self {
        Self {
            identity: identity.to_string(),
            outcome: Outcome::Success,
            transitions: vec![Phase::Pending],
            status: None,
            apply: None,
            parent_missing: false,
        }
    }

    /// Phase the attempt ended in
    pub fn final_phase(&self) -> Phase {
        self.transitions.last().copied().unwrap_or_default()
    }

    /// Store mutations performed by the apply pass
    pub fn mutation_count(&self) -> usize {
        self.apply.as_ref().map(ApplyReport::mutation_count).unwrap_or(0)
    }
}
