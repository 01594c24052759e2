//! Domain Entities
//!
//! - `TowerChallenge` - the parent spec plus its last written status
//! - `ChildRecord` / `StoredRecord` - one materialized move
//! - `ChallengeStatus` - phase and results of the last reconcile attempt

mod challenge;
mod child_record;
mod status;

pub use challenge::{ChallengeSpec, TowerChallenge};
pub use child_record::{ChildRecord, MovePayload, StoredRecord};
pub use status::{ChallengeStatus, Phase};
