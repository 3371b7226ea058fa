use crate::core::Transaction;
use std::collections::VecDeque;

/// Pending transactions in submission order. The pool has no size limit and
/// no priority ordering; mining takes from the front.
///
/// The pool carries no lock of its own. The ledger keeps it behind the same
/// lock as the chain so a drain and the matching append are seen together.
#[derive(Debug, Clone, Default)]
pub struct TransactionPool {
    transactions: VecDeque<Transaction>,
}

impl TransactionPool {
    pub fn new() -> TransactionPool {
        TransactionPool::default()
    }

    pub fn submit(&mut self, tx: Transaction) {
        self.transactions.push_back(tx);
    }

    /// Takes everything, leaving the pool empty
    pub fn drain_all(&mut self) -> Vec<Transaction> {
        self.transactions.drain(..).collect()
    }

    /// Takes the oldest `limit` transactions; the rest keep their order
    pub fn drain_up_to(&mut self, limit: usize) -> Vec<Transaction> {
        let take = limit.min(self.transactions.len());
        self.transactions.drain(..take).collect()
    }

    /// Puts a previously drained batch back in front of anything submitted
    /// since, preserving the batch's own order
    pub fn restore_front(&mut self, batch: Vec<Transaction>) {
        for tx in batch.into_iter().rev() {
            self.transactions.push_front(tx);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Transaction> {
        self.transactions.iter()
    }

    pub fn snapshot(&self) -> Vec<Transaction> {
        self.transactions.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }
}
