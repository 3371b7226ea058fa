//! Test utilities for ledger testing

use crate::config::Config;
use crate::core::{Blockchain, Transaction};

const PARTIES: [&str; 3] = ["alice", "bob", "carol"];

/// Difficulty 1 keeps mining to a handful of hashes
pub fn test_config() -> Config {
    Config::with_difficulty(1)
}

pub fn create_test_ledger() -> Blockchain {
    Blockchain::new(&test_config()).expect("test ledger should build")
}

/// A deterministic, valid transfer between two of the test parties
pub fn sample_transaction(n: u32) -> Transaction {
    let sender = PARTIES[n as usize % PARTIES.len()];
    let recipient = PARTIES[(n as usize + 1) % PARTIES.len()];
    Transaction::new(sender, recipient, f64::from(n) + 1.0)
}

/// Submits `per_block` transactions and mines, `blocks` times
pub fn mine_test_blocks(ledger: &Blockchain, blocks: u32, per_block: u32) {
    let mut n = 0;
    for _ in 0..blocks {
        for _ in 0..per_block {
            ledger
                .submit(sample_transaction(n))
                .expect("sample transactions are valid");
            n += 1;
        }
        ledger.mine_block().expect("mining at difficulty 1 succeeds");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_transactions_are_valid() {
        for n in 0..10 {
            assert!(crate::core::validate_transaction(&sample_transaction(n)).is_ok());
        }
    }

    #[test]
    fn test_mine_test_blocks() {
        let ledger = create_test_ledger();
        mine_test_blocks(&ledger, 3, 2);
        assert_eq!(ledger.len(), 4);
        assert!(ledger.pending().is_empty());
        assert!(ledger.is_valid());
    }
}
