use crate::core::{Block, BlockSkeleton, Difficulty};
use crate::error::{LedgerError, Result};
use data_encoding::HEXLOWER;
use log::{debug, info};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// How many nonces are tried between two looks at the cancellation flag
pub const CANCEL_CHECK_INTERVAL: u64 = 4096;

/// Cooperative stop signal for a running nonce search. Clones share the flag.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> CancellationToken {
        CancellationToken::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

pub struct ProofOfWork {
    difficulty: Difficulty,
    max_attempts: Option<u64>,
}

impl ProofOfWork {
    pub fn new(difficulty: Difficulty) -> ProofOfWork {
        ProofOfWork {
            difficulty,
            max_attempts: None,
        }
    }

    /// Caps the search. `None` searches until a nonce is found.
    pub fn with_max_attempts(mut self, max_attempts: Option<u64>) -> ProofOfWork {
        self.max_attempts = max_attempts;
        self
    }

    pub fn difficulty(&self) -> &Difficulty {
        &self.difficulty
    }

    pub fn max_attempts(&self) -> Option<u64> {
        self.max_attempts
    }

    /// Validate proof-of-work for a sealed block: the stored hash must be the
    /// one derived from its fields, and it must satisfy `difficulty`.
    pub fn validate(block: &Block, difficulty: &Difficulty) -> bool {
        block.has_valid_hash() && difficulty.is_met_by(block.hash())
    }

    /// Linear nonce search from 0. Returns the first sealing whose hash meets
    /// the difficulty, `MiningTimeout` once `max_attempts` nonces have failed,
    /// or `Cancelled` if `cancel` fires.
    pub fn mine(
        &self,
        skeleton: BlockSkeleton,
        cancel: Option<&CancellationToken>,
    ) -> Result<Block> {
        debug!(
            "Searching nonce for block {} ({}, ~{:.0} attempts expected)",
            skeleton.index(),
            self.difficulty,
            self.difficulty.expected_attempts()
        );

        let base = skeleton.hashing_context();
        let mut nonce: u64 = 0;
        let mut attempts: u64 = 0;
        loop {
            if let Some(max) = self.max_attempts {
                if attempts >= max {
                    return Err(LedgerError::MiningTimeout { attempts });
                }
            }
            if let Some(token) = cancel {
                if attempts % CANCEL_CHECK_INTERVAL == 0 && token.is_cancelled() {
                    info!(
                        "Mining of block {} cancelled after {attempts} attempts",
                        skeleton.index()
                    );
                    return Err(LedgerError::Cancelled);
                }
            }

            let mut context = base.clone();
            context.update(&nonce.to_be_bytes());
            let digest = context.finish();
            attempts += 1;

            if self.difficulty.is_met_by_digest(digest.as_ref()) {
                let hash = HEXLOWER.encode(digest.as_ref());
                let block = skeleton.seal(nonce);
                debug_assert_eq!(block.hash(), hash);
                debug!("Found nonce {nonce} after {attempts} attempts: {hash}");
                return Ok(block);
            }
            nonce = nonce.wrapping_add(1);
        }
    }
}
