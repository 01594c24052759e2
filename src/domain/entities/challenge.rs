//! Tower challenge entity - the parent of all child records

use serde::{Deserialize, Serialize};

use super::ChallengeStatus;
use crate::domain::value_objects::ParentIdentity;

/// Desired state: how many discs to solve for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChallengeSpec {
    /// Raw disc count; validated during reconcile, never at load time
    pub discs: i64,
}

/// A challenge as handed to the reconciler
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TowerChallenge {
    pub identity: ParentIdentity,
    pub spec: ChallengeSpec,
    pub status: ChallengeStatus,
}

impl TowerChallenge {
    pub fn new(identity: ParentIdentity, discs: i64) -> Self {
        Self {
            identity,
            spec: ChallengeSpec { discs },
            status: ChallengeStatus::default(),
        }
    }

    pub fn with_status(mut self, status: ChallengeStatus) -> Self {
        self.status = status;
        self
    }
}
