//! Child record entity - one materialized move
//!
//! A child record is owned by exactly one challenge through its owner tag.
//! The store assigns a version on every write; `StoredRecord` pairs the record
//! with that version for optimistic-concurrency updates.

use serde::{Deserialize, Serialize};

use crate::domain::value_objects::{Move, ParentIdentity};

/// Record payload: `{ "move": "Move disk n from X to Y" }`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MovePayload {
    #[serde(rename = "move")]
    pub move_description: String,
}

impl MovePayload {
    pub fn new(move_description: impl Into<String>) -> Self {
        Self {
            move_description: move_description.into(),
        }
    }
}

impl From<&Move> for MovePayload {
    fn from(mv: &Move) -> Self {
        Self::new(mv.describe())
    }
}

/// A child record as desired or observed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChildRecord {
    pub name: String,
    #[serde(rename = "owner")]
    pub owner_tag: String,
    #[serde(rename = "data")]
    pub payload: MovePayload,
}

impl ChildRecord {
    pub fn new(
        name: impl Into<String>,
        owner_tag: impl Into<String>,
        payload: MovePayload,
    ) -> Self {
        Self {
            name: name.into(),
            owner_tag: owner_tag.into(),
            payload,
        }
    }

    /// Whether this record belongs to `owner`
    pub fn is_owned_by(&self, owner: &ParentIdentity) -> bool {
        self.owner_tag == owner.as_str()
    }
}

/// A record as persisted, with its store-assigned version
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredRecord {
    #[serde(flatten)]
    pub record: ChildRecord,
    pub version: u64,
}

impl StoredRecord {
    pub fn new(record: ChildRecord, version: u64) -> Self {
        Self { record, version }
    }

    pub fn name(&self) -> &str {
        &self.record.name
    }

    pub fn payload(&self) -> &MovePayload {
        &self.record.payload
    }
}
