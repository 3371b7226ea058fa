// The ledger: an in-memory chain of sealed blocks plus the pool of pending
// transactions. One RwLock covers both so a drain and its append are seen
// together; a separate gate lets only one miner search at a time.

use crate::config::Config;
use crate::core::{
    validate_chain, validate_transaction, Block, BlockSkeleton, CancellationToken, ChainReport,
    ProofOfWork, Transaction, GENESIS_PREVIOUS_HASH,
};
use crate::error::{LedgerError, Result};
use crate::storage::{ChainSnapshot, TransactionPool};
use crate::utils::current_timestamp;
use log::{debug, error, info, warn};
use std::sync::{Mutex, MutexGuard, RwLock, RwLockReadGuard, RwLockWriteGuard};

struct LedgerState {
    chain: Vec<Block>,
    pool: TransactionPool,
    // Drained for the block being mined, not yet appended. Still reported as
    // pending so that nothing disappears from view mid-mining.
    in_flight: Vec<Transaction>,
}

impl LedgerState {
    fn tip(&self) -> &Block {
        // The chain always holds at least the genesis block
        &self.chain[self.chain.len() - 1]
    }
}

pub struct Blockchain {
    state: RwLock<LedgerState>,
    mining_gate: Mutex<()>,
    pow: ProofOfWork,
    max_transactions_per_block: Option<usize>,
    block_reward: Option<f64>,
    reward_sender: String,
}

impl Blockchain {
    /// A fresh ledger holding only the genesis block, stamped with the
    /// current time
    pub fn new(config: &Config) -> Result<Blockchain> {
        Self::with_genesis_timestamp(config, current_timestamp()?)
    }

    pub fn with_genesis_timestamp(config: &Config, timestamp: i64) -> Result<Blockchain> {
        let genesis = Block::genesis(timestamp);
        info!("Created genesis block {}", genesis.hash());
        Self::from_parts(config, vec![genesis], Vec::new())
    }

    /// Rebuilds a ledger from a snapshot. The chain must be non-empty, start
    /// at a genesis block and pass full validation; every pending transaction
    /// must pass the submission gate.
    pub fn restore(snapshot: ChainSnapshot, config: &Config) -> Result<Blockchain> {
        if snapshot.chain.is_empty() {
            return Err(LedgerError::CorruptSnapshot(
                "snapshot holds no blocks".to_string(),
            ));
        }
        let genesis = &snapshot.chain[0];
        if genesis.previous_hash() != GENESIS_PREVIOUS_HASH
            || !genesis.transactions().is_empty()
            || genesis.nonce() != 0
        {
            return Err(LedgerError::CorruptSnapshot(
                "block 0 is not a genesis block".to_string(),
            ));
        }
        let report = validate_chain(&snapshot.chain);
        if let Some(fault) = report.first_fault() {
            return Err(LedgerError::CorruptSnapshot(fault.to_string()));
        }
        for (i, tx) in snapshot.pending.iter().enumerate() {
            validate_transaction(tx).map_err(|e| {
                LedgerError::CorruptSnapshot(format!("pending transaction {i}: {e}"))
            })?;
        }
        info!(
            "Restored ledger with {} blocks and {} pending transactions",
            snapshot.chain.len(),
            snapshot.pending.len()
        );
        Self::from_parts(config, snapshot.chain, snapshot.pending)
    }

    fn from_parts(
        config: &Config,
        chain: Vec<Block>,
        pending: Vec<Transaction>,
    ) -> Result<Blockchain> {
        config.validate()?;
        let mining = &config.mining;
        let mut pool = TransactionPool::new();
        for tx in pending {
            pool.submit(tx);
        }

        Ok(Blockchain {
            state: RwLock::new(LedgerState {
                chain,
                pool,
                in_flight: Vec::new(),
            }),
            mining_gate: Mutex::new(()),
            pow: ProofOfWork::new(mining.difficulty()).with_max_attempts(mining.max_attempts),
            max_transactions_per_block: mining.max_transactions_per_block,
            block_reward: mining.block_reward,
            reward_sender: mining.reward_sender.clone(),
        })
    }

    fn read_state(&self) -> RwLockReadGuard<'_, LedgerState> {
        self.state.read().unwrap_or_else(|poisoned| {
            error!("Ledger state lock was poisoned; continuing with its last state");
            poisoned.into_inner()
        })
    }

    fn write_state(&self) -> RwLockWriteGuard<'_, LedgerState> {
        self.state.write().unwrap_or_else(|poisoned| {
            error!("Ledger state lock was poisoned; continuing with its last state");
            poisoned.into_inner()
        })
    }

    fn lock_mining_gate(&self) -> MutexGuard<'_, ()> {
        self.mining_gate.lock().unwrap_or_else(|poisoned| {
            warn!("Mining gate was poisoned by an earlier run");
            poisoned.into_inner()
        })
    }

    pub fn proof_of_work(&self) -> &ProofOfWork {
        &self.pow
    }

    // When I get a new transaction, it has to pass the gate before it touches the pool
    pub fn submit(&self, tx: Transaction) -> Result<usize> {
        if let Err(e) = validate_transaction(&tx) {
            warn!("Rejected transaction: {e}");
            return Err(e);
        }
        let mut state = self.write_state();
        debug!(
            "Accepted transaction {} -> {} ({})",
            tx.sender(),
            tx.recipient(),
            tx.amount()
        );
        state.pool.submit(tx);
        Ok(state.in_flight.len() + state.pool.len())
    }

    /// Validates and queues a transfer. Returns how many transactions are
    /// pending afterwards.
    pub fn submit_transaction(&self, sender: &str, recipient: &str, amount: f64) -> Result<usize> {
        self.submit(Transaction::new(sender, recipient, amount))
    }

    // Mining without a reward, the plain path
    pub fn mine_block(&self) -> Result<Block> {
        self.mine_block_internal(None, None)
    }

    // Mining that also pays the configured reward to `beneficiary`
    pub fn mine_block_for(&self, beneficiary: &str) -> Result<Block> {
        self.mine_block_internal(Some(beneficiary), None)
    }

    pub fn mine_block_with_cancel(&self, cancel: &CancellationToken) -> Result<Block> {
        self.mine_block_internal(None, Some(cancel))
    }

    fn mine_block_internal(
        &self,
        beneficiary: Option<&str>,
        cancel: Option<&CancellationToken>,
    ) -> Result<Block> {
        let reward_tx = match (beneficiary, self.block_reward) {
            (Some(beneficiary), Some(reward)) => {
                let tx = Transaction::new(self.reward_sender.as_str(), beneficiary, reward);
                validate_transaction(&tx)?;
                Some(tx)
            }
            _ => None,
        };

        // One miner at a time; readers and submitters are not blocked by this
        let _gate = self.lock_mining_gate();

        let skeleton = {
            let mut state = self.write_state();
            if state.pool.is_empty() {
                return Err(LedgerError::NoPendingTransactions);
            }
            let timestamp = current_timestamp()?;
            let drained = match self.max_transactions_per_block {
                Some(cap) => state.pool.drain_up_to(cap),
                None => state.pool.drain_all(),
            };
            let tip = state.tip();
            let index = tip.index() + 1;
            let previous_hash = tip.hash().to_string();

            let mut transactions = drained.clone();
            transactions.extend(reward_tx);
            state.in_flight = drained;
            BlockSkeleton::new(index, timestamp, transactions, previous_hash)
        };

        info!(
            "Mining block {} with {} transactions ({})",
            skeleton.index(),
            skeleton.transactions().len(),
            self.pow.difficulty()
        );

        // The nonce search runs without the state lock
        let block = match self.pow.mine(skeleton, cancel) {
            Ok(block) => block,
            Err(e) => {
                let mut state = self.write_state();
                let batch = std::mem::take(&mut state.in_flight);
                warn!(
                    "Mining failed ({e}); returning {} transactions to the pool",
                    batch.len()
                );
                state.pool.restore_front(batch);
                return Err(e);
            }
        };

        let mut state = self.write_state();
        let tip_hash = state.tip().hash().to_string();
        if block.previous_hash() != tip_hash {
            let batch = std::mem::take(&mut state.in_flight);
            state.pool.restore_front(batch);
            return Err(LedgerError::ChainMoved {
                expected: block.previous_hash().to_string(),
                found: tip_hash,
            });
        }
        state.chain.push(block.clone());
        state.in_flight.clear();

        info!(
            "Successfully mined block {}: {} (nonce {})",
            block.index(),
            block.hash(),
            block.nonce()
        );
        Ok(block)
    }

    /// Re-derives every hash and link in the chain
    pub fn validate(&self) -> ChainReport {
        let report = validate_chain(&self.read_state().chain);
        if let Some(fault) = report.first_fault() {
            warn!(
                "Chain validation found {} faults, first: {fault}",
                report.faults().len()
            );
        }
        report
    }

    pub fn is_valid(&self) -> bool {
        self.validate().is_valid()
    }

    /// Copy of the chain, genesis first
    pub fn chain(&self) -> Vec<Block> {
        self.read_state().chain.clone()
    }

    /// Copy of every transaction not yet in a block, oldest first
    pub fn pending(&self) -> Vec<Transaction> {
        let state = self.read_state();
        state
            .in_flight
            .iter()
            .chain(state.pool.iter())
            .cloned()
            .collect()
    }

    pub fn pending_count(&self) -> usize {
        let state = self.read_state();
        state.in_flight.len() + state.pool.len()
    }

    /// Whether a call to `mine_block` has anything to take
    pub fn can_mine(&self) -> bool {
        !self.read_state().pool.is_empty()
    }

    pub fn len(&self) -> usize {
        self.read_state().chain.len()
    }

    /// Always false: the genesis block exists from construction on
    pub fn is_empty(&self) -> bool {
        self.read_state().chain.is_empty()
    }

    pub fn last_block(&self) -> Block {
        self.read_state().tip().clone()
    }

    pub fn get_block(&self, index: u64) -> Option<Block> {
        let position = usize::try_from(index).ok()?;
        self.read_state().chain.get(position).cloned()
    }

    pub fn snapshot(&self) -> ChainSnapshot {
        let state = self.read_state();
        ChainSnapshot {
            chain: state.chain.clone(),
            pending: state
                .in_flight
                .iter()
                .chain(state.pool.iter())
                .cloned()
                .collect(),
        }
    }

    #[cfg(test)]
    pub(crate) fn replace_block_for_test(&self, position: usize, block: Block) {
        self.write_state().chain[position] = block;
    }
}
