//! Core ledger functionality
//!
//! Transactions, blocks and their hash derivation, the proof-of-work miner,
//! the chain validator, and the `Blockchain` that ties them together.

pub mod block;
pub mod blockchain;
pub mod difficulty;
pub mod proof_of_work;
pub mod transaction;
pub mod validation;

pub use block::{derive_hash, Block, BlockSkeleton, GENESIS_PREVIOUS_HASH};
pub use blockchain::Blockchain;
pub use difficulty::{Difficulty, DifficultyMode, MAX_HEX_ZEROS, MAX_TARGET_BITS};
pub use proof_of_work::{CancellationToken, ProofOfWork, CANCEL_CHECK_INTERVAL};
pub use transaction::{validate_transaction, Transaction};
pub use validation::{validate_chain, BlockFault, ChainReport, FaultKind};
