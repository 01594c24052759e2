//! Child record store implementations
//!
//! - `MemoryRecordStore`: in-process, with fault injection for tests
//! - `FsRecordStore`: one JSON document per record on disk

mod fs;
mod memory;

pub use fs::FsRecordStore;
pub use memory::{MemoryRecordStore, StoreOp};
