//! Move value object
//!
//! A single transfer of one disc between two rods.

use serde::{Deserialize, Serialize};

use super::Rod;

/// One move of the solution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Move {
    /// Disc being moved (1 is the smallest)
    #[serde(rename = "disc")]
    pub disc_index: u32,
    pub from: Rod,
    pub to: Rod,
}

impl Move {
    pub fn new(disc_index: u32, from: Rod, to: Rod) -> Self {
        Self {
            disc_index,
            from,
            to,
        }
    }

    /// Human-readable description stored in child records
    pub fn describe(&self) -> String {
        format!(
            "Move disk {} from {} to {}",
            self.disc_index, self.from, self.to
        )
    }
}

impl std::fmt::Display for Move {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{{{}, {}, {}}}", self.disc_index, self.from, self.to)
    }
}
