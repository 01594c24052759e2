//! Work queue for the reference controller
//!
//! Pure bookkeeping: callers pass `now`, nothing here reads a clock or sleeps.
//! One entry per identity; re-adding an identity only moves its due time
//! earlier.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use crate::application::reconcile::Outcome;
use crate::domain::value_objects::ParentIdentity;

#[derive(Debug, Clone)]
pub struct WorkQueue {
    due: HashMap<ParentIdentity, Instant>,
    failures: HashMap<ParentIdentity, u32>,
    base: Duration,
    max: Duration,
}

impl WorkQueue {
    /// Queue whose retry delays start at `base` and double up to `max`
    pub fn new(base: Duration, max: Duration) -> Self {
        Self {
            due: HashMap::new(),
            failures: HashMap::new(),
            base,
            max: max.max(base),
        }
    }

    /// Schedule `identity` for `now`
    pub fn add(&mut self, identity: ParentIdentity, now: Instant) {
        self.add_at(identity, now);
    }

    /// Schedule `identity` for `at`, unless it is already due sooner
    pub fn add_at(&mut self, identity: ParentIdentity, at: Instant) {
        self.due
            .entry(identity)
            .and_modify(|due| *due = (*due).min(at))
            .or_insert(at);
    }

    /// Remove and return every identity due at `now`, earliest first
    pub fn pop_due(&mut self, now: Instant) -> Vec<ParentIdentity> {
        let mut ready: Vec<(Instant, ParentIdentity)> = self
            .due
            .iter()
            .filter(|(_, due)| **due <= now)
            .map(|(id, due)| (*due, id.clone()))
            .collect();
        ready.sort();
        for (_, id) in &ready {
            self.due.remove(id);
        }
        ready.into_iter().map(|(_, id)| id).collect()
    }

    /// Earliest due time, if anything is queued
    pub fn next_due(&self) -> Option<Instant> {
        self.due.values().min().copied()
    }

    /// Record the outcome of an attempt; retryable failures are requeued
    /// with backoff, anything else resets the failure count
    pub fn done(&mut self, identity: &ParentIdentity, outcome: &Outcome, now: Instant) {
        if outcome.is_retryable() {
            let failures = {
                let count = self.failures.entry(identity.clone()).or_insert(0);
                *count = count.saturating_add(1);
                *count
            };
            let delay = self.backoff(failures);
            self.add_at(identity.clone(), now + delay);
        } else {
            self.failures.remove(identity);
        }
    }

    /// Drop all state for `identity`
    pub fn forget(&mut self, identity: &ParentIdentity) {
        self.due.remove(identity);
        self.failures.remove(identity);
    }

    /// Requeue delay after `failures` consecutive retryable failures
    pub fn backoff(&self, failures: u32) -> Duration {
        let exponent = failures.saturating_sub(1).min(31);
        self.base.saturating_mul(1 << exponent).min(self.max)
    }

    pub fn failures(&self, identity: &ParentIdentity) -> u32 {
        self.failures.get(identity).copied().unwrap_or(0)
    }

    pub fn contains(&self, identity: &ParentIdentity) -> bool {
        self.due.contains_key(identity)
    }

    pub fn len(&self) -> usize {
        self.due.len()
    }

    pub fn is_empty(&self) -> bool {
        self.due.is_empty()
    }
}
