//! Disc count value object
//!
//! The only field of a challenge spec. Raw input is a signed integer because
//! manifests may carry anything; a `DiscCount` is always at least one.

use thiserror::Error;

/// Rejected disc count
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidSpec {
    /// Zero or negative disc count
    #[error("the number of discs must be positive, got {discs}")]
    NonPositive { discs: i64 },

    /// More discs than the configured ceiling
    #[error("the number of discs must not exceed {max}, got {discs}")]
    TooManyDiscs { discs: i64, max: u32 },
}

/// Validated disc count (`>= 1`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DiscCount(u32);

impl DiscCount {
    /// Ceiling used when no limit is configured
    pub const DEFAULT_MAX: u32 = 16;

    /// Validate a raw disc count
    pub fn new(discs: i64) -> Result<Self, InvalidSpec> {
        if discs <= 0 {
            return Err(InvalidSpec::NonPositive { discs });
        }
        u32::try_from(discs)
            .map(Self)
            .map_err(|_| InvalidSpec::TooManyDiscs {
                discs,
                max: u32::MAX,
            })
    }

    /// Validate against an upper bound as well
    pub fn with_limit(discs: i64, max: u32) -> Result<Self, InvalidSpec> {
        let count = Self::new(discs)?;
        if count.0 > max {
            return Err(InvalidSpec::TooManyDiscs { discs, max });
        }
        Ok(count)
    }

    pub fn get(&self) -> u32 {
        self.0
    }

    /// Number of moves in the solution (`2^n - 1`), saturating
    pub fn move_count(&self) -> u64 {
        1u64.checked_shl(self.0)
            .map(|n| n - 1)
            .unwrap_or(u64::MAX)
    }
}
