//! Test utilities
//!
//! Manual mock implementations and test fixtures for unit testing.
//!
//! Integration tests build a real router over the in-memory gateway, so
//! the full handler -> validator -> service -> gateway path is exercised
//! without a MySQL instance.

pub mod fixtures;
pub mod mocks;

pub use fixtures::*;
pub use mocks::*;
