use crate::core::{Block, Transaction};
use crate::error::Result;
use crate::utils::{deserialize, serialize};

/// Everything needed to rebuild a ledger: the chain and the pending pool.
/// The crate only produces and consumes the bytes; where they are kept is up
/// to the caller.
#[derive(Debug, Clone, PartialEq, bincode::Encode, bincode::Decode)]
pub struct ChainSnapshot {
    pub chain: Vec<Block>,
    pub pending: Vec<Transaction>,
}

impl ChainSnapshot {
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        serialize(self)
    }

    /// Decodes bytes only. Whether the chain holds together is checked by
    /// `Blockchain::restore`.
    pub fn from_bytes(bytes: &[u8]) -> Result<ChainSnapshot> {
        deserialize(bytes)
    }
}
