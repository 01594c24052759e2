//! Parent identity value object
//!
//! The stable key of one challenge. It is also the owner tag stamped on every
//! child record and the prefix of every derived record name, so it follows
//! DNS-subdomain rules: lowercase alphanumerics, `-` and `.`, starting and
//! ending with an alphanumeric.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Longest identity accepted (leaves room for the `-move-N` suffix)
pub const MAX_IDENTITY_LEN: usize = 200;

/// Rejected identity
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidIdentity {
    #[error("identity must not be empty")]
    Empty,
    #[error("identity '{0}' is longer than {MAX_IDENTITY_LEN} characters")]
    TooLong(String),
    #[error("identity '{0}' must consist of lowercase alphanumerics, '-' or '.', and start and end with an alphanumeric")]
    InvalidCharacters(String),
    #[error("identity '{0}' has an empty or dash-edged '.'-separated label")]
    InvalidLabel(String),
}

/// Identity of one challenge (parent)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ParentIdentity(String);

impl ParentIdentity {
    pub fn new(name: impl Into<String>) -> Result<Self, InvalidIdentity> {
        let name = name.into();
        if name.is_empty() {
            return Err(InvalidIdentity::Empty);
        }
        if name.len() > MAX_IDENTITY_LEN {
            return Err(InvalidIdentity::TooLong(name));
        }

        let allowed = |c: char| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '.';
        let edge = |c: Option<char>| {
            c.map(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
                .unwrap_or(false)
        };
        if !name.chars().all(allowed) || !edge(name.chars().next()) || !edge(name.chars().last()) {
            return Err(InvalidIdentity::InvalidCharacters(name));
        }
        // Every label must itself start and end with an alphanumeric
        if name.contains("..") || name.contains(".-") || name.contains("-.") {
            return Err(InvalidIdentity::InvalidLabel(name));
        }

        Ok(Self(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Name of the child record holding the move at 1-based `position`
    pub fn record_name(&self, position: usize) -> String {
        format!("{}-move-{}", self.0, position)
    }
}

impl fmt::Display for ParentIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for ParentIdentity {
    type Error = InvalidIdentity;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ParentIdentity> for String {
    fn from(identity: ParentIdentity) -> Self {
        identity.0
    }
}

impl std::str::FromStr for ParentIdentity {
    type Err = InvalidIdentity;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}
