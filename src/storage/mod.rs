//! Data storage
//!
//! The pending transaction pool and the snapshot format a ledger can be
//! exported to and rebuilt from.

pub mod snapshot;
pub mod transaction_pool;

pub use snapshot::ChainSnapshot;
pub use transaction_pool::TransactionPool;
