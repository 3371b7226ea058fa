//! Shared fixtures for unit tests: cheap ledgers and sample transfers.

pub mod test_utils;

pub use test_utils::*;
