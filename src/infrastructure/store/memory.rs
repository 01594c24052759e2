//! In-memory record store
//!
//! Versioned, thread-safe store used by tests, simulations and dry runs.
//! Supports fault injection so retry and conflict handling can be exercised
//! without a real backend, and "external" mutations that bypass the port to
//! stand in for concurrent writers.

use std::collections::{BTreeMap, HashMap};
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::domain::entities::{ChildRecord, MovePayload, StoredRecord};
use crate::domain::ports::{ChildRecordStore, StoreError, StoreResult};

/// Store operation, used to target injected faults
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreOp {
    List,
    Get,
    Create,
    Update,
    Delete,
}

type FaultFn = Box<dyn Fn(&str) -> StoreError + Send + Sync>;

struct Fault {
    op: StoreOp,
    name: Option<String>,
    /// `None` fires forever
    remaining: Option<usize>,
    make: FaultFn,
}

#[derive(Default)]
struct Inner {
    records: BTreeMap<String, StoredRecord>,
    faults: Vec<Fault>,
    calls: HashMap<StoreOp, usize>,
    mutations: usize,
}

impl Inner {
    /// Count the call and return an injected error if one matches
    fn intercept(&mut self, op: StoreOp, key: &str) -> Option<StoreError> {
        *self.calls.entry(op).or_insert(0) += 1;

        let index = self.faults.iter().position(|f| {
            f.op == op && f.name.as_deref().map(|n| n == key).unwrap_or(true)
        })?;

        let error = (self.faults[index].make)(key);
        if let Some(remaining) = self.faults[index].remaining.as_mut() {
            *remaining -= 1;
            if *remaining == 0 {
                self.faults.remove(index);
            }
        }
        Some(error)
    }
}

/// Thread-safe in-memory store
#[derive(Default)]
pub struct MemoryRecordStore {
    inner: Mutex<Inner>,
}

impl MemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the store with records, each at version 1
    pub fn with_records(records: impl IntoIterator<Item = ChildRecord>) -> Self {
        let store = Self::new();
        {
            let mut inner = store.lock();
            for record in records {
                inner
                    .records
                    .insert(record.name.clone(), StoredRecord::new(record, 1));
            }
        }
        store
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn len(&self) -> usize {
        self.lock().records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().records.is_empty()
    }

    /// Snapshot of every record, in name order
    pub fn records(&self) -> Vec<StoredRecord> {
        self.lock().records.values().cloned().collect()
    }

    /// Successful creates, updates and deletes made through the port
    pub fn mutations(&self) -> usize {
        self.lock().mutations
    }

    /// Calls of `op` made through the port, including failed ones
    pub fn calls(&self, op: StoreOp) -> usize {
        self.lock().calls.get(&op).copied().unwrap_or(0)
    }

    /// Fail the next `times` calls of `op`
    pub fn fail_next<F>(&self, op: StoreOp, times: usize, make: F)
    where
        F: Fn(&str) -> StoreError + Send + Sync + 'static,
    {
        self.push_fault(op, None, Some(times), Box::new(make));
    }

    /// Fail every call of `op`
    pub fn fail_always<F>(&self, op: StoreOp, make: F)
    where
        F: Fn(&str) -> StoreError + Send + Sync + 'static,
    {
        self.push_fault(op, None, None, Box::new(make));
    }

    /// Fail the next `times` calls of `op` that target `name`
    pub fn fail_next_for<F>(&self, op: StoreOp, name: &str, times: usize, make: F)
    where
        F: Fn(&str) -> StoreError + Send + Sync + 'static,
    {
        self.push_fault(op, Some(name.to_string()), Some(times), Box::new(make));
    }

    /// Fail every call of `op` that targets `name`
    pub fn fail_always_for<F>(&self, op: StoreOp, name: &str, make: F)
    where
        F: Fn(&str) -> StoreError + Send + Sync + 'static,
    {
        self.push_fault(op, Some(name.to_string()), None, Box::new(make));
    }

    /// Drop every injected fault
    pub fn clear_faults(&self) {
        self.lock().faults.clear();
    }

    fn push_fault(&self, op: StoreOp, name: Option<String>, remaining: Option<usize>, make: FaultFn) {
        if remaining == Some(0) {
            return;
        }
        self.lock().faults.push(Fault {
            op,
            name,
            remaining,
            make,
        });
    }

    /// Change a payload as a concurrent writer would (bumps the version)
    pub fn external_update(&self, name: &str, payload: MovePayload) {
        if let Some(stored) = self.lock().records.get_mut(name) {
            stored.record.payload = payload;
            stored.version += 1;
        }
    }

    /// Insert or overwrite a record as a concurrent writer would
    pub fn external_replace(&self, record: ChildRecord) {
        let mut inner = self.lock();
        let version = inner
            .records
            .get(&record.name)
            .map(|r| r.version + 1)
            .unwrap_or(1);
        inner
            .records
            .insert(record.name.clone(), StoredRecord::new(record, version));
    }

    /// Remove a record as a concurrent writer would
    pub fn external_delete(&self, name: &str) {
        self.lock().records.remove(name);
    }
}

impl ChildRecordStore for MemoryRecordStore {
    fn list(&self, owner: &str) -> StoreResult<Vec<StoredRecord>> {
        let mut inner = self.lock();
        if let Some(err) = inner.intercept(StoreOp::List, owner) {
            return Err(err);
        }
        Ok(inner
            .records
            .values()
            .filter(|r| r.record.owner_tag == owner)
            .cloned()
            .collect())
    }

    fn get(&self, name: &str) -> StoreResult<StoredRecord> {
        let mut inner = self.lock();
        if let Some(err) = inner.intercept(StoreOp::Get, name) {
            return Err(err);
        }
        inner
            .records
            .get(name)
            .cloned()
            .ok_or_else(|| StoreError::NotFound {
                name: name.to_string(),
            })
    }

    fn create(&self, record: &ChildRecord) -> StoreResult<StoredRecord> {
        let mut inner = self.lock();
        if let Some(err) = inner.intercept(StoreOp::Create, &record.name) {
            return Err(err);
        }
        if inner.records.contains_key(&record.name) {
            return Err(StoreError::AlreadyExists {
                name: record.name.clone(),
            });
        }
        let stored = StoredRecord::new(record.clone(), 1);
        inner.records.insert(record.name.clone(), stored.clone());
        inner.mutations += 1;
        Ok(stored)
    }

    fn update(
        &self,
        name: &str,
        payload: &MovePayload,
        expected_version: u64,
    ) -> StoreResult<StoredRecord> {
        let mut inner = self.lock();
        if let Some(err) = inner.intercept(StoreOp::Update, name) {
            return Err(err);
        }
        let stored = inner
            .records
            .get_mut(name)
            .ok_or_else(|| StoreError::NotFound {
                name: name.to_string(),
            })?;
        if stored.version != expected_version {
            return Err(StoreError::Conflict {
                name: name.to_string(),
                expected: expected_version,
                actual: stored.version,
            });
        }
        stored.record.payload = payload.clone();
        stored.version += 1;
        let updated = stored.clone();
        inner.mutations += 1;
        Ok(updated)
    }

    fn delete(&self, name: &str) -> StoreResult<()> {
        let mut inner = self.lock();
        if let Some(err) = inner.intercept(StoreOp::Delete, name) {
            return Err(err);
        }
        match inner.records.remove(name) {
            Some(_) => {
                inner.mutations += 1;
                Ok(())
            }
            None => Err(StoreError::NotFound {
                name: name.to_string(),
            }),
        }
    }
}
