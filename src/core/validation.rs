//! Chain validation
//!
//! The validator trusts nothing stored in a block: every hash is re-derived
//! from the block's own fields and every link is compared against the
//! predecessor's stored hash. The result is a report, never an error.

use crate::core::Block;
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FaultKind {
    /// The block's index is not its position in the chain
    IndexMismatch,
    /// `previous_hash` differs from the predecessor's hash
    BrokenLink,
    /// The stored hash is not the one derived from the block's fields
    HashMismatch,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BlockFault {
    /// Position in the chain
    pub position: usize,
    pub kind: FaultKind,
}

impl fmt::Display for BlockFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let what = match self.kind {
            FaultKind::IndexMismatch => "index does not match position",
            FaultKind::BrokenLink => "previous hash does not link to predecessor",
            FaultKind::HashMismatch => "stored hash does not match contents",
        };
        write!(f, "block {}: {what}", self.position)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ChainReport {
    blocks_checked: usize,
    faults: Vec<BlockFault>,
}

impl ChainReport {
    pub fn is_valid(&self) -> bool {
        self.faults.is_empty()
    }

    pub fn faults(&self) -> &[BlockFault] {
        &self.faults
    }

    pub fn first_fault(&self) -> Option<&BlockFault> {
        self.faults.first()
    }

    pub fn blocks_checked(&self) -> usize {
        self.blocks_checked
    }

    /// Positions of every block with at least one fault, ascending
    pub fn invalid_positions(&self) -> Vec<usize> {
        let mut positions: Vec<usize> = self.faults.iter().map(|f| f.position).collect();
        positions.dedup();
        positions
    }
}

/// Walks the whole chain and collects every fault. The genesis block has no
/// predecessor, so it is only checked for its index and its own hash.
pub fn validate_chain(chain: &[Block]) -> ChainReport {
    let mut faults = Vec::new();

    for (position, block) in chain.iter().enumerate() {
        if block.index() != position as u64 {
            faults.push(BlockFault {
                position,
                kind: FaultKind::IndexMismatch,
            });
        }
        if position > 0 && block.previous_hash() != chain[position - 1].hash() {
            faults.push(BlockFault {
                position,
                kind: FaultKind::BrokenLink,
            });
        }
        if !block.has_valid_hash() {
            faults.push(BlockFault {
                position,
                kind: FaultKind::HashMismatch,
            });
        }
    }

    ChainReport {
        blocks_checked: chain.len(),
        faults,
    }
}
