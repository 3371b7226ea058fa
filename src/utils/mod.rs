//! Utility functions and helpers
//!
//! Hashing, the clock, and binary encoding used throughout the ledger.

pub mod crypto;
pub mod serialization;

pub use crypto::{current_timestamp, sha256_context, sha256_digest, sha256_hex};

pub use serialization::{deserialize, serialize};
