//! Error types for tower-operator
//!
//! Uses `thiserror` for library errors. Port-level failures keep their own
//! types (`StoreError`, `RepositoryError`) and convert into this one at the
//! edges.

use std::path::PathBuf;
use thiserror::Error;

use crate::domain::ports::{RepositoryError, StoreError};
use crate::domain::value_objects::{InvalidIdentity, InvalidSpec};

/// Result type alias for operator operations
pub type OperatorResult<T> = Result<T, OperatorError>;

/// Main error type for operator operations
#[derive(Error, Debug)]
pub enum OperatorError {
    /// Config file could not be parsed
    #[error("invalid config in {file}: {message}")]
    InvalidConfig { file: PathBuf, message: String },

    /// Manifest could not be parsed
    #[error("invalid manifest {file}: {message}")]
    InvalidManifest { file: PathBuf, message: String },

    /// Challenge name is not a valid identity
    #[error(transparent)]
    InvalidIdentity(#[from] InvalidIdentity),

    /// Disc count rejected
    #[error(transparent)]
    InvalidSpec(#[from] InvalidSpec),

    /// Challenge repository failure
    #[error("repository error: {0}")]
    Repository(#[from] RepositoryError),

    /// Record store failure
    #[error(transparent)]
    Store(#[from] StoreError),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON encoding error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML parsing error
    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),

    /// File watcher error
    #[error("watch error: {0}")]
    Watch(#[from] notify::Error),

    /// Challenge does not exist
    #[error("challenge '{0}' not found")]
    ChallengeNotFound(String),
}
