use crate::core::transaction::put_str;
use crate::core::Transaction;
use crate::utils::{deserialize, serialize, sha256_context, sha256_hex};
use crate::error::Result;
use ring::digest::Context;
use serde::{Deserialize, Serialize};

/// `previous_hash` of the genesis block
pub const GENESIS_PREVIOUS_HASH: &str =
    "0000000000000000000000000000000000000000000000000000000000000000";

/// Canonical preimage of everything except the nonce. The nonce is always the
/// last field, so the miner can absorb this prefix once and vary only the tail.
fn preimage_prefix(
    index: u64,
    timestamp: i64,
    transactions: &[Transaction],
    previous_hash: &str,
) -> Vec<u8> {
    let mut data_bytes = vec![];
    data_bytes.extend(index.to_be_bytes());
    data_bytes.extend(timestamp.to_be_bytes());
    data_bytes.extend((transactions.len() as u64).to_be_bytes());
    for transaction in transactions {
        transaction.write_canonical(&mut data_bytes);
    }
    put_str(&mut data_bytes, previous_hash);
    data_bytes
}

/// Hash of a block's fields: SHA-256 over the canonical encoding, as 64
/// lowercase hex characters. Every integrity check in the ledger reduces to
/// this function.
pub fn derive_hash(
    index: u64,
    timestamp: i64,
    transactions: &[Transaction],
    previous_hash: &str,
    nonce: u64,
) -> String {
    let mut data = preimage_prefix(index, timestamp, transactions, previous_hash);
    data.extend(nonce.to_be_bytes());
    sha256_hex(&data)
}

/// A block whose nonce is still free. Only [`BlockSkeleton::seal`] turns it
/// into a [`Block`].
#[derive(Debug, Clone, PartialEq)]
pub struct BlockSkeleton {
    index: u64,
    timestamp: i64,
    transactions: Vec<Transaction>,
    previous_hash: String,
}

impl BlockSkeleton {
    pub fn new(
        index: u64,
        timestamp: i64,
        transactions: Vec<Transaction>,
        previous_hash: impl Into<String>,
    ) -> Self {
        BlockSkeleton {
            index,
            timestamp,
            transactions,
            previous_hash: previous_hash.into(),
        }
    }

    pub fn index(&self) -> u64 {
        self.index
    }

    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    pub fn previous_hash(&self) -> &str {
        &self.previous_hash
    }

    pub fn hash_with_nonce(&self, nonce: u64) -> String {
        derive_hash(
            self.index,
            self.timestamp,
            &self.transactions,
            &self.previous_hash,
            nonce,
        )
    }

    /// SHA-256 state that has absorbed every field but the nonce
    pub(crate) fn hashing_context(&self) -> Context {
        sha256_context(&preimage_prefix(
            self.index,
            self.timestamp,
            &self.transactions,
            &self.previous_hash,
        ))
    }

    /// Fixes the nonce. The hash is always re-derived from the fields here,
    /// never taken from the caller.
    pub fn seal(self, nonce: u64) -> Block {
        let hash = self.hash_with_nonce(nonce);
        Block {
            index: self.index,
            timestamp: self.timestamp,
            hash,
            previous_hash: self.previous_hash,
            nonce,
            transactions: self.transactions,
        }
    }
}

// Field order is the JSON order clients see
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, bincode::Encode, bincode::Decode)]
pub struct Block {
    index: u64,
    timestamp: i64,
    hash: String,
    previous_hash: String,
    nonce: u64,
    transactions: Vec<Transaction>,
}

impl Block {
    /// The index-0 block: no transactions, nonce 0, all-zero previous hash.
    /// Its hash is derived like any other block's.
    pub fn genesis(timestamp: i64) -> Block {
        BlockSkeleton::new(0, timestamp, Vec::new(), GENESIS_PREVIOUS_HASH).seal(0)
    }

    pub fn deserialize(bytes: &[u8]) -> Result<Block> {
        deserialize::<Block>(bytes)
    }

    pub fn serialize(&self) -> Result<Vec<u8>> {
        serialize(self)
    }

    pub fn index(&self) -> u64 {
        self.index
    }

    pub fn timestamp(&self) -> i64 {
        self.timestamp
    }

    pub fn hash(&self) -> &str {
        self.hash.as_str()
    }

    pub fn previous_hash(&self) -> &str {
        self.previous_hash.as_str()
    }

    pub fn nonce(&self) -> u64 {
        self.nonce
    }

    pub fn transactions(&self) -> &[Transaction] {
        self.transactions.as_slice()
    }

    pub fn is_genesis(&self) -> bool {
        self.index == 0
    }

    /// Re-derives the hash from the stored fields, ignoring the stored hash
    pub fn recompute_hash(&self) -> String {
        derive_hash(
            self.index,
            self.timestamp,
            &self.transactions,
            &self.previous_hash,
            self.nonce,
        )
    }

    pub fn has_valid_hash(&self) -> bool {
        self.recompute_hash() == self.hash
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_transactions() -> Vec<Transaction> {
        vec![
            Transaction::new("alice", "bob", 10.0),
            Transaction::new("bob", "carol", 2.5),
        ]
    }

    #[test]
    fn test_derive_hash_is_deterministic() {
        let txs = sample_transactions();
        let first = derive_hash(3, 1_700_000_000, &txs, GENESIS_PREVIOUS_HASH, 42);
        let second = derive_hash(3, 1_700_000_000, &txs, GENESIS_PREVIOUS_HASH, 42);
        assert_eq!(first, second);
        assert_eq!(first.len(), 64);
        assert!(first.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn test_every_field_feeds_the_hash() {
        let txs = sample_transactions();
        let base = derive_hash(1, 100, &txs, "abc", 7);

        assert_ne!(base, derive_hash(2, 100, &txs, "abc", 7));
        assert_ne!(base, derive_hash(1, 101, &txs, "abc", 7));
        assert_ne!(base, derive_hash(1, 100, &txs[..1], "abc", 7));
        assert_ne!(base, derive_hash(1, 100, &txs, "abd", 7));
        assert_ne!(base, derive_hash(1, 100, &txs, "abc", 8));

        let mut reordered = txs.clone();
        reordered.reverse();
        assert_ne!(base, derive_hash(1, 100, &reordered, "abc", 7));
    }

    #[test]
    fn test_genesis_block_shape() {
        let genesis = Block::genesis(1_700_000_000);
        assert_eq!(genesis.index(), 0);
        assert_eq!(genesis.nonce(), 0);
        assert_eq!(genesis.previous_hash(), GENESIS_PREVIOUS_HASH);
        assert!(genesis.transactions().is_empty());
        assert!(genesis.is_genesis());
        assert!(genesis.has_valid_hash());
    }

    #[test]
    fn test_seal_uses_derive_hash() {
        let skeleton = BlockSkeleton::new(1, 100, sample_transactions(), "prev");
        let expected = skeleton.hash_with_nonce(99);
        let block = skeleton.seal(99);
        assert_eq!(block.hash(), expected);
        assert_eq!(block.nonce(), 99);
        assert!(block.has_valid_hash());
    }

    #[test]
    fn test_hashing_context_matches_derive_hash() {
        let skeleton = BlockSkeleton::new(5, 123, sample_transactions(), "prev");
        let mut context = skeleton.hashing_context();
        context.update(&31u64.to_be_bytes());
        let hex = data_encoding::HEXLOWER.encode(context.finish().as_ref());
        assert_eq!(hex, skeleton.hash_with_nonce(31));
    }

    #[test]
    fn test_json_shape() {
        let block = BlockSkeleton::new(1, 1_700_000_000, sample_transactions(), "prev").seal(3);
        let value = serde_json::to_value(&block).unwrap();
        let keys: Vec<&str> = value
            .as_object()
            .unwrap()
            .keys()
            .map(|k| k.as_str())
            .collect();
        for key in ["index", "timestamp", "hash", "previous_hash", "nonce", "transactions"] {
            assert!(keys.contains(&key), "missing {key}");
        }
        assert_eq!(value["timestamp"], 1_700_000_000);
        assert_eq!(value["transactions"][0]["sender"], "alice");
    }

    #[test]
    fn test_tampered_json_breaks_hash() {
        let block = BlockSkeleton::new(1, 100, sample_transactions(), "prev").seal(0);
        let mut value = serde_json::to_value(&block).unwrap();
        value["transactions"][0]["amount"] = serde_json::json!(1000.0);
        let tampered: Block = serde_json::from_value(value).unwrap();
        assert!(!tampered.has_valid_hash());
    }
}
