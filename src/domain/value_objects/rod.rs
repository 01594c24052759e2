//! Rod value object - the three pegs of the tower
//!
//! Labels are fixed: `A` is the source, `C` the destination and `B` the
//! auxiliary peg.

use serde::{Deserialize, Serialize};

/// One of the three rods
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Rod {
    A,
    B,
    C,
}

impl Rod {
    /// Rod every disc starts on
    pub const SOURCE: Rod = Rod::A;
    /// Rod every disc ends on
    pub const DESTINATION: Rod = Rod::C;
    /// Rod used as scratch space
    pub const AUXILIARY: Rod = Rod::B;

    /// Single-letter label
    pub fn label(&self) -> &'static str {
        match self {
            Rod::A => "A",
            Rod::B => "B",
            Rod::C => "C",
        }
    }
}

impl std::fmt::Display for Rod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}
