//! Challenge status entity
//!
//! Written only by the reconcile use case, always as a whole document.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Reconcile phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Phase {
    #[default]
    Pending,
    Validating,
    Failed,
    Converging,
    Completed,
}

impl Phase {
    /// Whether an attempt may move from `self` to `next`
    pub fn can_transition_to(self, next: Phase) -> bool {
        matches!(
            (self, next),
            (Phase::Pending, Phase::Validating)
                | (Phase::Validating, Phase::Failed)
                | (Phase::Validating, Phase::Converging)
                | (Phase::Converging, Phase::Completed)
        )
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Phase::Pending => "Pending",
            Phase::Validating => "Validating",
            Phase::Failed => "Failed",
            Phase::Converging => "Converging",
            Phase::Completed => "Completed",
        };
        f.write_str(s)
    }
}

/// Observed state of a challenge
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ChallengeStatus {
    pub phase: Phase,
    #[serde(default)]
    pub steps: Vec<String>,
    #[serde(default)]
    pub child_names: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub started_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

impl ChallengeStatus {
    /// Status of an attempt that converged
    pub fn completed(
        steps: Vec<String>,
        child_names: Vec<String>,
        started_at: DateTime<Utc>,
        completed_at: DateTime<Utc>,
    ) -> Self {
        Self {
            phase: Phase::Completed,
            steps,
            child_names,
            started_at: Some(started_at),
            completed_at: Some(completed_at),
            error_message: None,
        }
    }

    /// Status of an attempt rejected during validation
    pub fn failed(message: impl Into<String>, started_at: DateTime<Utc>) -> Self {
        Self {
            phase: Phase::Failed,
            started_at: Some(started_at),
            error_message: Some(message.into()),
            ..Self::default()
        }
    }

    /// Status of an attempt that stopped while converging
    pub fn interrupted(
        steps: Vec<String>,
        message: impl Into<String>,
        started_at: DateTime<Utc>,
    ) -> Self {
        Self {
            phase: Phase::Converging,
            steps,
            started_at: Some(started_at),
            error_message: Some(message.into()),
            ..Self::default()
        }
    }

    pub fn is_completed(&self) -> bool {
        self.phase == Phase::Completed
    }
}
