//! Desired state builder
//!
//! Maps a move sequence onto the child records a challenge should own.

use std::collections::HashMap;

use crate::domain::entities::{ChildRecord, MovePayload};
use crate::domain::value_objects::{Move, ParentIdentity};

/// Ordered set of records a challenge should own
#[derive(Debug, Clone, Default)]
pub struct DesiredState {
    records: Vec<ChildRecord>,
    index: HashMap<String, usize>,
}

impl DesiredState {
    /// Build one record per move; the move at 1-based position `i` becomes
    /// `{identity}-move-{i}`
    pub fn build(identity: &ParentIdentity, moves: &[Move]) -> Self {
        let records: Vec<ChildRecord> = moves
            .iter()
            .enumerate()
            .map(|(i, mv)| {
                ChildRecord::new(
                    identity.record_name(i + 1),
                    identity.as_str(),
                    MovePayload::from(mv),
                )
            })
            .collect();

        let index = records
            .iter()
            .enumerate()
            .map(|(i, r)| (r.name.clone(), i))
            .collect();

        Self { records, index }
    }

    /// Records in generation order
    pub fn records(&self) -> &[ChildRecord] {
        &self.records
    }

    pub fn get(&self, name: &str) -> Option<&ChildRecord> {
        self.index.get(name).map(|&i| &self.records[i])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Record names in generation order
    pub fn names(&self) -> Vec<String> {
        self.records.iter().map(|r| r.name.clone()).collect()
    }

    /// Move descriptions in generation order
    pub fn steps(&self) -> Vec<String> {
        self.records
            .iter()
            .map(|r| r.payload.move_description.clone())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
