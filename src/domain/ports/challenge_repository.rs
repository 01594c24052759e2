//! Challenge Repository Port
//!
//! Where parent specs come from and where their status goes. The reconcile
//! use case reads a challenge once per attempt and writes status once at the
//! end of the attempt.

use crate::domain::entities::{ChallengeStatus, TowerChallenge};
use crate::domain::value_objects::ParentIdentity;

/// Result type for repository operations
pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// Repository operation errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RepositoryError {
    /// Challenge no longer exists
    NotFound(String),
    /// Manifest exists but cannot be decoded
    InvalidManifest { name: String, message: String },
    /// Status write lost a race; try again later
    Conflict(String),
    /// I/O error
    Io(String),
}

impl RepositoryError {
    /// Whether a later attempt may succeed without outside help
    pub fn is_transient(&self) -> bool {
        matches!(self, RepositoryError::Conflict(_) | RepositoryError::Io(_))
    }
}

impl std::fmt::Display for RepositoryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RepositoryError::NotFound(name) => write!(f, "challenge '{}' not found", name),
            RepositoryError::InvalidManifest { name, message } => {
                write!(f, "invalid manifest for '{}': {}", name, message)
            }
            RepositoryError::Conflict(msg) => write!(f, "status conflict: {}", msg),
            RepositoryError::Io(msg) => write!(f, "I/O error: {}", msg),
        }
    }
}

impl std::error::Error for RepositoryError {}

/// Abstract source of challenges
pub trait ChallengeRepository: Send + Sync {
    /// Every challenge identity currently known
    fn list(&self) -> RepositoryResult<Vec<ParentIdentity>>;

    /// Load spec and last written status
    fn get(&self, identity: &ParentIdentity) -> RepositoryResult<TowerChallenge>;

    /// Replace the status document as a whole
    fn update_status(
        &self,
        identity: &ParentIdentity,
        status: &ChallengeStatus,
    ) -> RepositoryResult<()>;
}

impl<R: ChallengeRepository + ?Sized> ChallengeRepository for &R {
    fn list(&self) -> RepositoryResult<Vec<ParentIdentity>> {
        (**self).list()
    }

    fn get(&self, identity: &ParentIdentity) -> RepositoryResult<TowerChallenge> {
        (**self).get(identity)
    }

    fn update_status(
        &self,
        identity: &ParentIdentity,
        status: &ChallengeStatus,
    ) -> RepositoryResult<()> {
        (**self).update_status(identity, status)
    }
}
