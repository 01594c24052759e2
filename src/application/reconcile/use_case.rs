//! Reconcile Use Case
//!
//! Drives one attempt through the phase machine:
//!
//! ```text
//! Pending -> Validating -> Converging -> Completed
//!                      \-> Failed
//! ```
//!
//! 1. Read the challenge (gone means nothing to do)
//! 2. Validate the disc count
//! 3. Generate moves and derive the desired records
//! 4. Collect what the store holds for this challenge
//! 5. Diff and apply
//! 6. Write status, once, as a whole document
//!
//! Every attempt starts from scratch; nothing is carried between calls.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::domain::entities::{ChallengeStatus, Phase};
use crate::domain::ports::{
    emit, ChallengeRepository, ChildRecordStore, NoopEventSink, ReconcileEvent,
    ReconcileEventSink, RepositoryError,
};
use crate::domain::services::{
    Applier, DesiredState, Differ, MoveGenerator, ObservedStateCollector,
};
use crate::domain::value_objects::{DiscCount, ParentIdentity};

use super::options::ReconcileOptions;
use super::outcome::{Outcome, ReconcileReport};

/// Reconcile use case - one attempt per call
pub struct ReconcileUseCase<R, S>
where
    R: ChallengeRepository,
    S: ChildRecordStore,
{
    repository: R,
    store: S,
}

impl<R, S> ReconcileUseCase<R, S>
where
    R: ChallengeRepository,
    S: ChildRecordStore,
{
    pub fn new(repository: R, store: S) -> Self {
        Self { repository, store }
    }

    pub fn repository(&self) -> &R {
        &self.repository
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Run one attempt silently
    pub fn reconcile(&self, identity: &ParentIdentity, options: &ReconcileOptions) -> ReconcileReport {
        self.reconcile_with_events(identity, options, Arc::new(NoopEventSink))
    }

    /// Run one attempt, reporting progress to `events`
    pub fn reconcile_with_events(
        &self,
        identity: &ParentIdentity,
        options: &ReconcileOptions,
        events: Arc<dyn ReconcileEventSink>,
    ) -> ReconcileReport {
        let mut attempt = Attempt::new(identity, events.as_ref());
        self.run(&mut attempt, options);
        attempt.finish()
    }

    fn run(&self, attempt: &mut Attempt<'_>, options: &ReconcileOptions) {
        let identity = attempt.identity;

        let challenge = match self.repository.get(identity) {
            Ok(challenge) => challenge,
            Err(RepositoryError::NotFound(_)) => {
                attempt.report.parent_missing = true;
                attempt.emit(ReconcileEvent::ParentMissing {
                    identity: identity.to_string(),
                });
                return;
            }
            Err(e) => {
                attempt.report.outcome = outcome_for_repository(&e);
                return;
            }
        };

        attempt.emit(ReconcileEvent::Started {
            identity: identity.to_string(),
            discs: challenge.spec.discs,
        });
        attempt.transition(Phase::Validating);

        let discs = match DiscCount::with_limit(challenge.spec.discs, options.max_discs) {
            Ok(discs) => discs,
            Err(e) => {
                attempt.transition(Phase::Failed);
                let message = e.to_string();
                let status = ChallengeStatus::failed(message.clone(), attempt.started_at);
                self.write_status(attempt, status, Outcome::TerminalFailure(message));
                return;
            }
        };

        attempt.transition(Phase::Converging);

        let moves = MoveGenerator::solve(discs);
        let desired = DesiredState::build(identity, &moves);

        let observed = match ObservedStateCollector::collect(&self.store, identity) {
            Ok(observed) => observed,
            Err(e) => {
                let message = format!("listing records failed: {}", e);
                let outcome = if e.is_transient() {
                    Outcome::RetryableFailure(message.clone())
                } else {
                    Outcome::TerminalFailure(message.clone())
                };
                let status =
                    ChallengeStatus::interrupted(desired.steps(), message, attempt.started_at);
                self.write_status(attempt, status, outcome);
                return;
            }
        };

        let plan = Differ::new().diff(&desired, &observed);
        attempt.emit(ReconcileEvent::Planned {
            identity: identity.to_string(),
            creates: plan.creates.len(),
            updates: plan.updates.len(),
            deletes: plan.deletes.len(),
            unchanged: plan.unchanged.len(),
        });

        let applied =
            Applier::new(&self.store, identity, &options.retry, attempt.events).apply(&plan);
        let failure = applied.failure.clone();
        attempt.report.apply = Some(applied);

        match failure {
            None => {
                attempt.transition(Phase::Completed);
                let status = ChallengeStatus::completed(
                    desired.steps(),
                    desired.names(),
                    attempt.started_at,
                    Utc::now(),
                );
                self.write_status(attempt, status, Outcome::Success);
            }
            Some(failure) => {
                let message = failure.to_string();
                let outcome = if failure.is_retryable() {
                    Outcome::RetryableFailure(message.clone())
                } else {
                    Outcome::TerminalFailure(message.clone())
                };
                let status =
                    ChallengeStatus::interrupted(desired.steps(), message, attempt.started_at);
                self.write_status(attempt, status, outcome);
            }
        }
    }

    /// Persist the attempt's status and settle the outcome
    ///
    /// A failed status write never masks an earlier failure; it only turns a
    /// success into a failure.
    fn write_status(&self, attempt: &mut Attempt<'_>, status: ChallengeStatus, outcome: Outcome) {
        let identity = attempt.identity;
        match self.repository.update_status(identity, &status) {
            Ok(()) => {
                attempt.emit(ReconcileEvent::StatusWritten {
                    identity: identity.to_string(),
                    phase: status.phase,
                });
                attempt.report.status = Some(status);
                attempt.report.outcome = outcome;
            }
            Err(RepositoryError::NotFound(_)) => {
                // Deleted mid-attempt; its records are left for the host to collect
                attempt.report.parent_missing = true;
                attempt.emit(ReconcileEvent::ParentMissing {
                    identity: identity.to_string(),
                });
                attempt.report.outcome = outcome;
            }
            Err(e) => {
                attempt.report.outcome = match outcome {
                    Outcome::Success => outcome_for_repository(&e),
                    failed => failed,
                };
            }
        }
    }
}

fn outcome_for_repository(err: &RepositoryError) -> Outcome {
    if err.is_transient() {
        Outcome::RetryableFailure(err.to_string())
    } else {
        Outcome::TerminalFailure(err.to_string())
    }
}

/// Per-attempt scratch state
struct Attempt<'a> {
    identity: &'a ParentIdentity,
    events: &'a dyn ReconcileEventSink,
    started_at: DateTime<Utc>,
    report: ReconcileReport,
}

impl<'a> Attempt<'a> {
    fn new(identity: &'a ParentIdentity, events: &'a dyn ReconcileEventSink) -> Self {
        Self {
            identity,
            events,
            started_at: Utc::now(),
            report: ReconcileReport::new(identity.as_str()),
        }
    }

    fn emit(&self, event: ReconcileEvent) {
        emit(self.events, event);
    }

    fn transition(&mut self, to: Phase) {
        let from = self.report.final_phase();
        debug_assert!(from.can_transition_to(to), "{from} -> {to}");
        self.report.transitions.push(to);
        self.emit(ReconcileEvent::PhaseChanged {
            identity: self.identity.to_string(),
            from,
            to,
        });
    }

    fn finish(self) -> ReconcileReport {
        self.emit(ReconcileEvent::Finished {
            identity: self.identity.to_string(),
            outcome: self.report.outcome.label(),
            reason: self.report.outcome.reason().map(str::to_string),
        });
        self.report
    }
}
