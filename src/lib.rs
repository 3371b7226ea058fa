//! # pow-ledger - an in-memory proof-of-work ledger
//!
//! This crate is the ledger behind a small block explorer: it keeps the chain,
//! the pending pool, mines blocks and checks the chain's integrity. The
//! explorer's HTTP layer and UI are someone else's job; they talk to the
//! ledger through [`api::ApiHandler`].
//!
//! ## What's in here
//! - **Blocks**: SHA-256 over a length-prefixed canonical encoding, linked by
//!   `previous_hash`, genesis at index 0
//! - **Pool**: FIFO pending transactions, drained whole (or up to a cap) per block
//! - **Mining**: linear nonce search against a leading-hex-zero or target-bits
//!   predicate, with optional attempt ceiling and cancellation
//! - **Validation**: every hash and link re-derived from stored fields
//! - **Snapshots**: bincode export/import for whoever stores the ledger
//!
//! ## How the code is organized
//! - `core/`: transactions, blocks, proof-of-work, validation, the ledger
//! - `storage/`: the transaction pool and snapshot format
//! - `api/`: request/response schemas and the dispatcher
//! - `config/`: TOML configuration with environment overrides
//! - `utils/`: hashing, clock and binary encoding helpers
//! - `cli/`: argument parsing for the binary
//!
//! Mining holds the state lock only to drain the pool and to append the
//! sealed block. Transactions taken for a block still show as pending until
//! that block is on the chain.

pub mod api;
pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod storage;
pub mod utils;

#[cfg(test)]
pub mod testnet;

// Re-export commonly used types for convenience
pub use api::{ApiHandler, Request, Response};
pub use cli::{Command, Opt};
pub use config::{Config, MiningConfig};
pub use core::{
    derive_hash, validate_chain, validate_transaction, Block, BlockSkeleton, Blockchain,
    CancellationToken, ChainReport, Difficulty, DifficultyMode, FaultKind, ProofOfWork,
    Transaction, GENESIS_PREVIOUS_HASH,
};
pub use error::{LedgerError, Result};
pub use storage::{ChainSnapshot, TransactionPool};
