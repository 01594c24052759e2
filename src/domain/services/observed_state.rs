//! Observed state collector
//!
//! Reads the records a challenge currently owns. Anything tagged with a
//! different owner is dropped here, so it can never reach the diff.

use std::collections::BTreeMap;

use crate::domain::entities::StoredRecord;
use crate::domain::ports::{ChildRecordStore, StoreResult};
use crate::domain::value_objects::ParentIdentity;

/// Records owned by one challenge, keyed by name
#[derive(Debug, Clone, Default)]
pub struct ObservedState {
    records: BTreeMap<String, StoredRecord>,
}

impl ObservedState {
    /// Keep only records owned by `owner`
    pub fn from_records(
        owner: &ParentIdentity,
        records: impl IntoIterator<Item = StoredRecord>,
    ) -> Self {
        let records = records
            .into_iter()
            .filter(|r| r.record.is_owned_by(owner))
            .map(|r| (r.record.name.clone(), r))
            .collect();
        Self { records }
    }

    pub fn get(&self, name: &str) -> Option<&StoredRecord> {
        self.records.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.records.contains_key(name)
    }

    /// Records in name order
    pub fn iter(&self) -> impl Iterator<Item = &StoredRecord> {
        self.records.values()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Read-only collector over a record store
pub struct ObservedStateCollector;

impl ObservedStateCollector {
    /// List everything `owner` owns; empty when nothing exists yet
    pub fn collect<S: ChildRecordStore + ?Sized>(
        store: &S,
        owner: &ParentIdentity,
    ) -> StoreResult<ObservedState> {
        let records = store.list(owner.as_str())?;
        Ok(ObservedState::from_records(owner, records))
    }
}
