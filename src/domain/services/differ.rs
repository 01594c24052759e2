//! Diff Domain Service
//!
//! Compares desired and observed records and produces the three disjoint
//! operation sets of a reconcile pass. Matching is by name; change detection
//! is by full payload equality. A converged state yields an empty plan.

use crate::domain::entities::{ChildRecord, MovePayload, StoredRecord};

use super::{DesiredState, ObservedState};

/// What a single desired record needs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordAction {
    /// Not present yet
    Create,
    /// Present with a different payload
    Update,
    /// Present and identical
    Unchanged,
}

/// Update of an observed record to the desired payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedUpdate {
    pub existing: StoredRecord,
    pub desired: MovePayload,
}

/// One operation of a reconcile pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReconcileOperation {
    Create(ChildRecord),
    Update(PlannedUpdate),
    Delete(StoredRecord),
}

impl ReconcileOperation {
    /// Name of the record this operation targets
    pub fn name(&self) -> &str {
        match self {
            ReconcileOperation::Create(record) => &record.name,
            ReconcileOperation::Update(update) => update.existing.name(),
            ReconcileOperation::Delete(existing) => existing.name(),
        }
    }
}

/// Result of diffing desired against observed
#[derive(Debug, Clone, Default)]
pub struct ReconcilePlan {
    /// Desired but absent, in generation order
    pub creates: Vec<ChildRecord>,
    /// Present with a stale payload, in generation order
    pub updates: Vec<PlannedUpdate>,
    /// Present but no longer desired, in name order
    pub deletes: Vec<StoredRecord>,
    /// Names already in the desired state
    pub unchanged: Vec<String>,
}

impl ReconcilePlan {
    /// Create an empty plan
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the pass has nothing to do
    pub fn is_empty(&self) -> bool {
        self.creates.is_empty() && self.updates.is_empty() && self.deletes.is_empty()
    }

    /// Number of store mutations the plan asks for
    pub fn operation_count(&self) -> usize {
        self.creates.len() + self.updates.len() + self.deletes.len()
    }

    /// All operations: creates, then updates, then deletes
    pub fn operations(&self) -> Vec<ReconcileOperation> {
        self.creates
            .iter()
            .cloned()
            .map(ReconcileOperation::Create)
            .chain(self.updates.iter().cloned().map(ReconcileOperation::Update))
            .chain(self.deletes.iter().cloned().map(ReconcileOperation::Delete))
            .collect()
    }
}

/// Pure diff service
///
/// No store access - the caller collects observed state first.
#[derive(Debug, Clone, Copy, Default)]
pub struct Differ;

impl Differ {
    /// Create a new Differ instance
    pub fn new() -> Self {
        Self
    }

    /// Decide what a single desired record needs
    pub fn plan_record(desired: &ChildRecord, observed: Option<&StoredRecord>) -> RecordAction {
        match observed {
            None => RecordAction::Create,
            Some(existing) if existing.payload() == &desired.payload => RecordAction::Unchanged,
            Some(_) => RecordAction::Update,
        }
    }

    /// Compute the operation sets that turn `observed` into `desired`
    pub fn diff(&self, desired: &DesiredState, observed: &ObservedState) -> ReconcilePlan {
        let mut plan = ReconcilePlan::new();

        for record in desired.records() {
            let existing = observed.get(&record.name);
            match Self::plan_record(record, existing) {
                RecordAction::Create => plan.creates.push(record.clone()),
                RecordAction::Unchanged => plan.unchanged.push(record.name.clone()),
                RecordAction::Update => {
                    if let Some(existing) = existing {
                        plan.updates.push(PlannedUpdate {
                            existing: existing.clone(),
                            desired: record.payload.clone(),
                        });
                    }
                }
            }
        }

        for existing in observed.iter() {
            if !desired.contains(existing.name()) {
                plan.deletes.push(existing.clone());
            }
        }

        plan
    }
}
