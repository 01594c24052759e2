//! Child Record Store Port
//!
//! The only shared mutable resource of the reconciler. Every mutation is a
//! single bounded request; conflict detection is the store's job, not ours.

use thiserror::Error;

use crate::domain::entities::{ChildRecord, MovePayload, StoredRecord};

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Outcome of a failed store request
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// No record with this name
    #[error("record '{name}' not found")]
    NotFound { name: String },

    /// Create raced with another creator
    #[error("record '{name}' already exists")]
    AlreadyExists { name: String },

    /// Optimistic-concurrency check failed
    #[error("record '{name}' changed concurrently (expected version {expected}, found {actual})")]
    Conflict {
        name: String,
        expected: u64,
        actual: u64,
    },

    /// Timeout, interrupted request, unavailable backend
    #[error("transient store error: {0}")]
    Transient(String),

    /// Not allowed to touch the record
    #[error("permission denied: {0}")]
    PermissionDenied(String),

    /// Record exists but cannot be decoded
    #[error("malformed record '{name}': {message}")]
    Malformed { name: String, message: String },

    /// Anything else the backend reports
    #[error("store error: {0}")]
    Backend(String),
}

impl StoreError {
    /// Whether retrying the same request may succeed
    pub fn is_transient(&self) -> bool {
        matches!(self, StoreError::Conflict { .. } | StoreError::Transient(_))
    }
}

/// Trait for child record stores
///
/// Implementations:
/// - `MemoryRecordStore`: in-process, used by tests and dry runs
/// - `FsRecordStore`: one JSON document per record on disk
pub trait ChildRecordStore: Send + Sync {
    /// All records whose owner tag equals `owner`
    fn list(&self, owner: &str) -> StoreResult<Vec<StoredRecord>>;

    /// Fetch one record by name
    fn get(&self, name: &str) -> StoreResult<StoredRecord>;

    /// Persist a new record, failing with `AlreadyExists` if the name is taken
    fn create(&self, record: &ChildRecord) -> StoreResult<StoredRecord>;

    /// Replace the payload if the stored version still equals `expected_version`
    fn update(
        &self,
        name: &str,
        payload: &MovePayload,
        expected_version: u64,
    ) -> StoreResult<StoredRecord>;

    /// Remove a record, failing with `NotFound` if it is already gone
    fn delete(&self, name: &str) -> StoreResult<()>;
}

impl<S: ChildRecordStore + ?Sized> ChildRecordStore for &S {
    fn list(&self, owner: &str) -> StoreResult<Vec<StoredRecord>> {
        (**self).list(owner)
    }

    fn get(&self, name: &str) -> StoreResult<StoredRecord> {
        (**self).get(name)
    }

    fn create(&self, record: &ChildRecord) -> StoreResult<StoredRecord> {
        (**self).create(record)
    }

    fn update(
        &self,
        name: &str,
        payload: &MovePayload,
        expected_version: u64,
    ) -> StoreResult<StoredRecord> {
        (**self).update(name, payload, expected_version)
    }

    fn delete(&self, name: &str) -> StoreResult<()> {
        (**self).delete(name)
    }
}
