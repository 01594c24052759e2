//! Domain Value Objects
//!
//! Immutable value types that represent domain concepts.

mod disc_count;
mod hanoi_move;
mod identity;
mod rod;

pub use disc_count::{DiscCount, InvalidSpec};
pub use hanoi_move::Move;
pub use identity::{InvalidIdentity, ParentIdentity, MAX_IDENTITY_LEN};
pub use rod::Rod;
