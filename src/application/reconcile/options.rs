//! Reconcile options

use crate::config::Config;
use crate::domain::services::RetryPolicy;
use crate::domain::value_objects::DiscCount;

/// Knobs for a reconcile attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconcileOptions {
    /// Per-operation retry bound of the apply engine
    pub retry: RetryPolicy,
    /// Largest accepted disc count
    pub max_discs: u32,
}

impl Default for ReconcileOptions {
    fn default() -> Self {
        Self {
            retry: RetryPolicy::default(),
            max_discs: DiscCount::DEFAULT_MAX,
        }
    }
}

impl ReconcileOptions {
    pub fn from_config(config: &Config) -> Self {
        Self {
            retry: config.retry.policy(),
            max_discs: config.validation.max_discs,
        }
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn with_max_discs(mut self, max_discs: u32) -> Self {
        self.max_discs = max_discs;
        self
    }
}
