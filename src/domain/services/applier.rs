//! Apply engine
//!
//! Executes a reconcile plan against the record store.
//!
//! - Creates that hit `AlreadyExists` fall through to the update path.
//! - Updates always re-fetch and write against the latest version; conflicts
//!   are retried within the policy bound, then reported as retryable.
//! - Deletes of records that are already gone succeed.
//! - Any non-transient error stops the pass and is reported as terminal.
//!
//! A record owned by another challenge is never written or deleted.

use crate::domain::entities::{ChildRecord, MovePayload, StoredRecord};
use crate::domain::ports::{emit, ChildRecordStore, ReconcileEvent, ReconcileEventSink, StoreError};
use crate::domain::value_objects::ParentIdentity;

use super::{ReconcilePlan, RetryPolicy};

/// Why an apply pass did not finish cleanly
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApplyFailure {
    /// Transient errors outlasted the retry bound; try the pass again later
    Retryable { name: String, reason: String },
    /// Needs outside intervention; the pass was aborted
    Terminal { name: String, reason: String },
}

impl ApplyFailure {
    pub fn is_retryable(&self) -> bool {
        matches!(self, ApplyFailure::Retryable { .. })
    }

    pub fn name(&self) -> &str {
        match self {
            ApplyFailure::Retryable { name, .. } | ApplyFailure::Terminal { name, .. } => name,
        }
    }
}

impl std::fmt::Display for ApplyFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApplyFailure::Retryable { name, reason } => {
                write!(f, "record '{}' not applied, retry requested: {}", name, reason)
            }
            ApplyFailure::Terminal { name, reason } => {
                write!(f, "record '{}' failed: {}", name, reason)
            }
        }
    }
}

/// Result of an apply pass
#[derive(Debug, Clone, Default)]
pub struct ApplyReport {
    /// Records created
    pub created: Vec<String>,
    /// Records whose payload was replaced
    pub updated: Vec<String>,
    /// Records removed, including ones that were already gone
    pub deleted: Vec<String>,
    /// Planned writes that found the record already in the desired state
    pub unchanged: Vec<String>,
    /// Deletes skipped because the record changed owner
    pub skipped: Vec<String>,
    /// First terminal failure, or the first retryable one if none was terminal
    pub failure: Option<ApplyFailure>,
}

impl ApplyReport {
    pub fn is_success(&self) -> bool {
        self.failure.is_none()
    }

    /// Names of every operation that reached its goal
    pub fn applied_names(&self) -> Vec<String> {
        self.created
            .iter()
            .chain(&self.updated)
            .chain(&self.deleted)
            .chain(&self.unchanged)
            .cloned()
            .collect()
    }

    /// Number of records created, updated or removed
    pub fn mutation_count(&self) -> usize {
        self.created.len() + self.updated.len() + self.deleted.len()
    }

    fn record_failure(&mut self, failure: ApplyFailure) {
        let replace = match &self.failure {
            None => true,
            Some(existing) => existing.is_retryable() && !failure.is_retryable(),
        };
        if replace {
            self.failure = Some(failure);
        }
    }
}

/// Successful end state of one operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Applied {
    Created,
    Updated(u64),
    Deleted,
    AlreadyInSync,
    AlreadyAbsent,
    NotOwned,
}

/// Failure of one operation after retries
#[derive(Debug, Clone)]
struct OpFailure {
    retryable: bool,
    reason: String,
}

impl OpFailure {
    fn terminal(reason: impl Into<String>) -> Self {
        Self {
            retryable: false,
            reason: reason.into(),
        }
    }

    fn exhausted(reason: impl Into<String>) -> Self {
        Self {
            retryable: true,
            reason: reason.into(),
        }
    }
}

type OpResult = Result<Applied, OpFailure>;

/// Result of a single guarded write
enum Attempt {
    Done(Applied),
    Retry(String),
    Fail(OpFailure),
}

/// Apply engine bound to one store, owner and retry policy
pub struct Applier<'a, S: ChildRecordStore + ?Sized> {
    store: &'a S,
    owner: &'a ParentIdentity,
    policy: &'a RetryPolicy,
    events: &'a dyn ReconcileEventSink,
}

impl<'a, S: ChildRecordStore + ?Sized> Applier<'a, S> {
    pub fn new(
        store: &'a S,
        owner: &'a ParentIdentity,
        policy: &'a RetryPolicy,
        events: &'a dyn ReconcileEventSink,
    ) -> Self {
        Self {
            store,
            owner,
            policy,
            events,
        }
    }

    /// Execute every operation of `plan`
    ///
    /// Retryable failures do not stop the pass; terminal ones do.
    pub fn apply(&self, plan: &ReconcilePlan) -> ApplyReport {
        let mut report = ApplyReport::default();

        for record in &plan.creates {
            let result = self.create(record);
            if !self.settle(&record.name, result, &mut report) {
                return report;
            }
        }

        for update in &plan.updates {
            let name = update.existing.name();
            let result = self.converge_existing(name, &update.desired);
            if !self.settle(name, result, &mut report) {
                return report;
            }
        }

        for existing in &plan.deletes {
            let result = self.delete(existing);
            if !self.settle(existing.name(), result, &mut report) {
                return report;
            }
        }

        report
    }

    /// Book the outcome of one operation; false means abort the pass
    fn settle(&self, name: &str, result: OpResult, report: &mut ApplyReport) -> bool {
        let name = name.to_string();
        match result {
            Ok(Applied::Created) => {
                emit(self.events, ReconcileEvent::RecordCreated { name: name.clone() });
                report.created.push(name);
            }
            Ok(Applied::Updated(version)) => {
                emit(
                    self.events,
                    ReconcileEvent::RecordUpdated {
                        name: name.clone(),
                        version,
                    },
                );
                report.updated.push(name);
            }
            Ok(Applied::Deleted) => {
                emit(self.events, ReconcileEvent::RecordDeleted { name: name.clone() });
                report.deleted.push(name);
            }
            Ok(Applied::AlreadyAbsent) => {
                self.skipped(&name, "already absent");
                report.deleted.push(name);
            }
            Ok(Applied::AlreadyInSync) => {
                self.skipped(&name, "already in desired state");
                report.unchanged.push(name);
            }
            Ok(Applied::NotOwned) => {
                self.skipped(&name, "owned by another challenge");
                report.skipped.push(name);
            }
            Err(failure) => {
                emit(
                    self.events,
                    ReconcileEvent::RecordFailed {
                        name: name.clone(),
                        error: failure.reason.clone(),
                        retryable: failure.retryable,
                    },
                );
                if failure.retryable {
                    report.record_failure(ApplyFailure::Retryable {
                        name,
                        reason: failure.reason,
                    });
                } else {
                    report.record_failure(ApplyFailure::Terminal {
                        name,
                        reason: failure.reason,
                    });
                    return false;
                }
            }
        }
        true
    }

    fn skipped(&self, name: &str, reason: &str) {
        emit(
            self.events,
            ReconcileEvent::RecordSkipped {
                name: name.to_string(),
                reason: reason.to_string(),
            },
        );
    }

    /// Wait before the next attempt, or report that the budget is spent
    fn backoff(&self, name: &str, attempt: u32, reason: &str) -> bool {
        if !self.policy.allows_retry_after(attempt) {
            return false;
        }
        emit(
            self.events,
            ReconcileEvent::RetryScheduled {
                name: name.to_string(),
                attempt: attempt + 1,
                reason: reason.to_string(),
            },
        );
        let delay = self.policy.delay_after(attempt);
        if !delay.is_zero() {
            std::thread::sleep(delay);
        }
        true
    }

    fn create(&self, record: &ChildRecord) -> OpResult {
        let mut attempt = 1;
        loop {
            match self.store.create(record) {
                Ok(_) => return Ok(Applied::Created),
                Err(StoreError::AlreadyExists { .. }) => {
                    return self.converge_existing(&record.name, &record.payload);
                }
                Err(e) if e.is_transient() => {
                    let reason = e.to_string();
                    if !self.backoff(&record.name, attempt, &reason) {
                        return Err(OpFailure::exhausted(reason));
                    }
                    attempt += 1;
                }
                Err(e) => return Err(OpFailure::terminal(e.to_string())),
            }
        }
    }

    /// Bring an existing record to `desired`, re-reading it before each write
    fn converge_existing(&self, name: &str, desired: &MovePayload) -> OpResult {
        let mut attempt = 1;
        loop {
            let reason = match self.store.get(name) {
                Ok(latest) => match self.write_latest(name, &latest, desired) {
                    Attempt::Done(applied) => return Ok(applied),
                    Attempt::Retry(reason) => reason,
                    Attempt::Fail(failure) => return Err(failure),
                },
                Err(StoreError::NotFound { .. }) => {
                    // Deleted since we looked; put it back
                    let record = ChildRecord::new(name, self.owner.as_str(), desired.clone());
                    match self.store.create(&record) {
                        Ok(_) => return Ok(Applied::Created),
                        Err(e @ StoreError::AlreadyExists { .. }) => e.to_string(),
                        Err(e) if e.is_transient() => e.to_string(),
                        Err(e) => return Err(OpFailure::terminal(e.to_string())),
                    }
                }
                Err(e) if e.is_transient() => e.to_string(),
                Err(e) => return Err(OpFailure::terminal(e.to_string())),
            };

            if !self.backoff(name, attempt, &reason) {
                return Err(OpFailure::exhausted(reason));
            }
            attempt += 1;
        }
    }

    /// One guarded write against a freshly read record
    fn write_latest(&self, name: &str, latest: &StoredRecord, desired: &MovePayload) -> Attempt {
        if !latest.record.is_owned_by(self.owner) {
            return Attempt::Fail(OpFailure::terminal(format!(
                "name collides with a record owned by '{}'",
                latest.record.owner_tag
            )));
        }
        if latest.payload() == desired {
            return Attempt::Done(Applied::AlreadyInSync);
        }

        match self.store.update(name, desired, latest.version) {
            Ok(stored) => Attempt::Done(Applied::Updated(stored.version)),
            Err(e @ StoreError::NotFound { .. }) => Attempt::Retry(e.to_string()),
            Err(e) if e.is_transient() => Attempt::Retry(e.to_string()),
            Err(e) => Attempt::Fail(OpFailure::terminal(e.to_string())),
        }
    }

    fn delete(&self, existing: &StoredRecord) -> OpResult {
        let name = existing.name();
        let mut attempt = 1;
        loop {
            let reason = match self.store.get(name) {
                Err(StoreError::NotFound { .. }) => return Ok(Applied::AlreadyAbsent),
                Ok(latest) if !latest.record.is_owned_by(self.owner) => {
                    return Ok(Applied::NotOwned)
                }
                Ok(_) => match self.store.delete(name) {
                    Ok(()) => return Ok(Applied::Deleted),
                    Err(StoreError::NotFound { .. }) => return Ok(Applied::AlreadyAbsent),
                    Err(e) if e.is_transient() => e.to_string(),
                    Err(e) => return Err(OpFailure::terminal(e.to_string())),
                },
                Err(e) if e.is_transient() => e.to_string(),
                Err(e) => return Err(OpFailure::terminal(e.to_string())),
            };

            if !self.backoff(name, attempt, &reason) {
                return Err(OpFailure::exhausted(reason));
            }
            attempt += 1;
        }
    }
}
