//! Error handling for the ledger
//!
//! Every fallible ledger operation returns [`LedgerError`]. A corrupted chain
//! is not an error: the validator reports it through
//! [`ChainReport`](crate::core::ChainReport).

use std::fmt;

/// Result type alias for ledger operations
pub type Result<T> = std::result::Result<T, LedgerError>;

#[derive(Debug, Clone, PartialEq)]
pub enum LedgerError {
    /// Submission rejected at the validation gate
    InvalidTransaction(String),
    /// Mining requested while the pool holds nothing
    NoPendingTransactions,
    /// The configured attempts ceiling was reached without a solution
    MiningTimeout { attempts: u64 },
    /// The nonce search was stopped through its cancellation token
    Cancelled,
    /// The chain tip changed while a block was being sealed
    ChainMoved { expected: String, found: String },
    /// A snapshot handed to `restore` does not describe a valid ledger
    CorruptSnapshot(String),
    /// Configuration errors
    Config(String),
    /// Serialization/deserialization errors
    Serialization(String),
    /// System clock errors
    Clock(String),
    /// File I/O errors
    Io(String),
}

impl LedgerError {
    /// Stable machine-readable name, used by the API layer
    pub fn kind(&self) -> &'static str {
        match self {
            LedgerError::InvalidTransaction(_) => "invalid_transaction",
            LedgerError::NoPendingTransactions => "no_pending_transactions",
            LedgerError::MiningTimeout { .. } => "mining_timeout",
            LedgerError::Cancelled => "cancelled",
            LedgerError::ChainMoved { .. } => "chain_moved",
            LedgerError::CorruptSnapshot(_) => "corrupt_snapshot",
            LedgerError::Config(_) => "config",
            LedgerError::Serialization(_) => "serialization",
            LedgerError::Clock(_) => "clock",
            LedgerError::Io(_) => "io",
        }
    }
}

impl fmt::Display for LedgerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LedgerError::InvalidTransaction(msg) => write!(f, "Invalid transaction: {msg}"),
            LedgerError::NoPendingTransactions => write!(f, "No pending transactions to mine"),
            LedgerError::MiningTimeout { attempts } => {
                write!(f, "Mining gave up after {attempts} attempts")
            }
            LedgerError::Cancelled => write!(f, "Mining was cancelled"),
            LedgerError::ChainMoved { expected, found } => write!(
                f,
                "Chain tip moved during mining: expected {expected}, found {found}"
            ),
            LedgerError::CorruptSnapshot(msg) => write!(f, "Corrupt snapshot: {msg}"),
            LedgerError::Config(msg) => write!(f, "Configuration error: {msg}"),
            LedgerError::Serialization(msg) => write!(f, "Serialization error: {msg}"),
            LedgerError::Clock(msg) => write!(f, "Clock error: {msg}"),
            LedgerError::Io(msg) => write!(f, "I/O error: {msg}"),
        }
    }
}

impl std::error::Error for LedgerError {}

impl From<std::io::Error> for LedgerError {
    fn from(err: std::io::Error) -> Self {
        LedgerError::Io(err.to_string())
    }
}

impl From<bincode::error::EncodeError> for LedgerError {
    fn from(err: bincode::error::EncodeError) -> Self {
        LedgerError::Serialization(err.to_string())
    }
}

impl From<bincode::error::DecodeError> for LedgerError {
    fn from(err: bincode::error::DecodeError) -> Self {
        LedgerError::Serialization(err.to_string())
    }
}

impl From<serde_json::Error> for LedgerError {
    fn from(err: serde_json::Error) -> Self {
        LedgerError::Serialization(err.to_string())
    }
}

impl From<toml::de::Error> for LedgerError {
    fn from(err: toml::de::Error) -> Self {
        LedgerError::Config(err.to_string())
    }
}
