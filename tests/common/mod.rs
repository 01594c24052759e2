//! Common test utilities for tower-operator CLI and scenario tests.
//!
//! This module provides:
//! - `TestEnv`: Isolated test environment with temp directories
//! - Helpers to write manifests and read records/status documents

pub mod env;

pub use env::*;
