//! Controller Use Case
//!
//! Reference host for the reconciler: keeps every challenge in the manifest
//! directory converged until told to stop.
//!
//! - All challenges are queued at start and again on every resync
//! - Manifest changes are picked up with `notify`, debounced, then queued
//! - Retryable outcomes are requeued with backoff by the `WorkQueue`

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::channel;
use std::sync::Arc;
use std::time::{Duration, Instant};

use notify::{Config as NotifyConfig, Event, RecommendedWatcher, RecursiveMode, Watcher};

use crate::application::reconcile::{Outcome, ReconcileOptions, ReconcileUseCase};
use crate::config::Config;
use crate::domain::ports::{ChallengeRepository, ChildRecordStore, ReconcileEventSink};
use crate::domain::value_objects::ParentIdentity;
use crate::error::OperatorResult;
use crate::infrastructure::repositories::{identity_from_path, is_status_path};

use super::queue::WorkQueue;

const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Controller settings
#[derive(Debug, Clone)]
pub struct ControllerOptions {
    /// Directory to watch for manifest changes
    pub manifests: PathBuf,
    pub reconcile: ReconcileOptions,
    pub resync: Duration,
    pub requeue_base: Duration,
    pub requeue_max: Duration,
    pub debounce: Duration,
}

impl ControllerOptions {
    pub fn from_config(config: &Config) -> Self {
        Self {
            manifests: config.paths.manifests.clone(),
            reconcile: ReconcileOptions::from_config(config),
            resync: config.controller.resync(),
            requeue_base: config.controller.requeue_base(),
            requeue_max: config.controller.requeue_max(),
            debounce: config.controller.debounce(),
        }
    }
}

/// Counters for a controller run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ControllerSummary {
    pub attempts: usize,
    pub successes: usize,
    pub retries_requested: usize,
    pub terminal_failures: usize,
}

impl ControllerSummary {
    fn record(&mut self, outcome: &Outcome) {
        self.attempts += 1;
        match outcome {
            Outcome::Success => self.successes += 1,
            Outcome::RetryableFailure(_) => self.retries_requested += 1,
            Outcome::TerminalFailure(_) => self.terminal_failures += 1,
        }
    }
}

/// Changed identities waiting out the debounce window
pub(super) struct PendingChanges {
    identities: HashSet<ParentIdentity>,
    last_change: Option<Instant>,
    debounce: Duration,
}

impl PendingChanges {
    pub(super) fn new(debounce: Duration) -> Self {
        Self {
            identities: HashSet::new(),
            last_change: None,
            debounce,
        }
    }

    pub(super) fn add(&mut self, identity: ParentIdentity, now: Instant) {
        self.identities.insert(identity);
        self.last_change = Some(now);
    }

    pub(super) fn is_ready(&self, now: Instant) -> bool {
        match self.last_change {
            Some(last) => {
                !self.identities.is_empty() && now.saturating_duration_since(last) >= self.debounce
            }
            None => false,
        }
    }

    pub(super) fn take(&mut self) -> Vec<ParentIdentity> {
        self.last_change = None;
        let mut changed: Vec<_> = self.identities.drain().collect();
        changed.sort();
        changed
    }
}

/// Identity a watched path refers to; status documents are ignored
pub fn changed_identity(path: &Path) -> Option<ParentIdentity> {
    if is_status_path(path) {
        return None;
    }
    identity_from_path(path)
}

/// Controller use case - blocking reconcile loop
pub struct ControllerUseCase<R, S>
where
    R: ChallengeRepository,
    S: ChildRecordStore,
{
    reconciler: ReconcileUseCase<R, S>,
    options: ControllerOptions,
}

impl<R, S> ControllerUseCase<R, S>
where
    R: ChallengeRepository,
    S: ChildRecordStore,
{
    pub fn new(repository: R, store: S, options: ControllerOptions) -> Self {
        Self {
            reconciler: ReconcileUseCase::new(repository, store),
            options,
        }
    }

    pub fn reconciler(&self) -> &ReconcileUseCase<R, S> {
        &self.reconciler
    }

    pub fn new_queue(&self) -> WorkQueue {
        WorkQueue::new(self.options.requeue_base, self.options.requeue_max)
    }

    /// Queue every known challenge
    pub fn resync(&self, queue: &mut WorkQueue, now: Instant) -> OperatorResult<()> {
        for identity in self.reconciler.repository().list()? {
            queue.add(identity, now);
        }
        Ok(())
    }

    /// Reconcile everything due at `now`
    pub fn process_due(
        &self,
        queue: &mut WorkQueue,
        now: Instant,
        events: &Arc<dyn ReconcileEventSink>,
        summary: &mut ControllerSummary,
    ) {
        for identity in queue.pop_due(now) {
            let report = self.reconciler.reconcile_with_events(
                &identity,
                &self.options.reconcile,
                events.clone(),
            );
            summary.record(&report.outcome);
            if report.parent_missing {
                queue.forget(&identity);
            } else {
                queue.done(&identity, &report.outcome, Instant::now());
            }
        }
    }

    /// Run until `running` is cleared
    ///
    /// Blocks the calling thread. Watch setup errors are returned; reconcile
    /// failures are reported through `events` and never stop the loop.
    pub fn start(
        &self,
        running: Arc<AtomicBool>,
        events: Arc<dyn ReconcileEventSink>,
    ) -> OperatorResult<ControllerSummary> {
        let mut summary = ControllerSummary::default();
        let mut queue = self.new_queue();
        let mut last_resync = Instant::now();
        self.resync(&mut queue, last_resync)?;

        std::fs::create_dir_all(&self.options.manifests)?;
        let (tx, rx) = channel();
        let mut watcher = RecommendedWatcher::new(
            move |res: Result<Event, notify::Error>| {
                if let Ok(event) = res {
                    for path in event.paths {
                        let _ = tx.send(path);
                    }
                }
            },
            NotifyConfig::default(),
        )?;
        watcher.watch(&self.options.manifests, RecursiveMode::NonRecursive)?;

        let mut pending = PendingChanges::new(self.options.debounce);

        while running.load(Ordering::SeqCst) {
            if let Ok(path) = rx.recv_timeout(POLL_INTERVAL) {
                let now = Instant::now();
                for path in std::iter::once(path).chain(rx.try_iter()) {
                    if let Some(identity) = changed_identity(&path) {
                        pending.add(identity, now);
                    }
                }
            }

            let now = Instant::now();
            if pending.is_ready(now) {
                for identity in pending.take() {
                    queue.add(identity, now);
                }
            }

            if now.saturating_duration_since(last_resync) >= self.options.resync {
                // A failed listing is retried on the next resync
                let _ = self.resync(&mut queue, now);
                last_resync = now;
            }

            self.process_due(&mut queue, now, &events, &mut summary);
        }

        Ok(summary)
    }
}
