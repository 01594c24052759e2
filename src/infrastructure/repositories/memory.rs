//! In-memory challenge repository for tests and simulations

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::domain::entities::{ChallengeStatus, TowerChallenge};
use crate::domain::ports::{ChallengeRepository, RepositoryError, RepositoryResult};
use crate::domain::value_objects::ParentIdentity;

#[derive(Default)]
struct Inner {
    challenges: BTreeMap<ParentIdentity, TowerChallenge>,
    status_writes: usize,
    fail_status_writes: Option<RepositoryError>,
}

#[derive(Default)]
pub struct MemoryChallengeRepository {
    inner: Mutex<Inner>,
}

impl MemoryChallengeRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Add or replace a challenge, keeping any status already written
    pub fn put(&self, identity: &ParentIdentity, discs: i64) {
        let mut inner = self.lock();
        let status = inner
            .challenges
            .get(identity)
            .map(|c| c.status.clone())
            .unwrap_or_default();
        inner.challenges.insert(
            identity.clone(),
            TowerChallenge::new(identity.clone(), discs).with_status(status),
        );
    }

    pub fn remove(&self, identity: &ParentIdentity) {
        self.lock().challenges.remove(identity);
    }

    pub fn status(&self, identity: &ParentIdentity) -> Option<ChallengeStatus> {
        self.lock().challenges.get(identity).map(|c| c.status.clone())
    }

    pub fn status_writes(&self) -> usize {
        self.lock().status_writes
    }

    /// Make every following status write fail with `err`
    pub fn fail_status_writes(&self, err: RepositoryError) {
        self.lock().fail_status_writes = Some(err);
    }
}

impl ChallengeRepository for MemoryChallengeRepository {
    fn list(&self) -> RepositoryResult<Vec<ParentIdentity>> {
        Ok(self.lock().challenges.keys().cloned().collect())
    }

    fn get(&self, identity: &ParentIdentity) -> RepositoryResult<TowerChallenge> {
        self.lock()
            .challenges
            .get(identity)
            .cloned()
            .ok_or_else(|| RepositoryError::NotFound(identity.to_string()))
    }

    fn update_status(
        &self,
        identity: &ParentIdentity,
        status: &ChallengeStatus,
    ) -> RepositoryResult<()> {
        let mut inner = self.lock();
        if let Some(err) = inner.fail_status_writes.clone() {
            return Err(err);
        }
        let challenge = inner
            .challenges
            .get_mut(identity)
            .ok_or_else(|| RepositoryError::NotFound(identity.to_string()))?;
        challenge.status = status.clone();
        inner.status_writes += 1;
        Ok(())
    }
}
