//! Domain Layer
//!
//! The reconcile core - pure business logic plus the ports it talks through.
//!
//! ## Structure
//!
//! - `entities/` - Challenge, child records, status
//! - `value_objects/` - Rod, Move, DiscCount, ParentIdentity
//! - `services/` - Move generator, desired/observed state, differ, applier
//! - `ports/` - Record store, challenge repository, event sink
//!
//! ## Design Principles
//!
//! 1. **No I/O** - Store and repository access goes through trait-defined ports
//! 2. **Pure Functions** - Generation and diffing are stateless and testable
//! 3. **No global state** - Everything a pass needs is passed in

pub mod entities;
pub mod ports;
pub mod services;
pub mod value_objects;
