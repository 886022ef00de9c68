use std::sync::atomic::{AtomicBool, Ordering};

use chrono::Utc;
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use super::{CANCEL_POLL_INTERVAL, GENESIS_NONCE, GENESIS_PREV_HASH, INITIAL_NONCE};
use crate::canonical::{Preimage, meets_difficulty};
use crate::error::MiningAborted;
use crate::transaction::Transaction;

/// A single block in the blockchain holding a list of transactions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Block {
    pub transactions: Vec<Transaction>,
    pub prev_hash: String,
    pub hash: String,   // Cached hash of the block
    pub nonce: u64,     // Proof-of-Work nonce
    pub timestamp: i64, // Unix timestamp (UTC), informational
}

impl Block {
    /// Create the genesis block (first block in the chain). It is not mined:
    /// it carries `GENESIS_NONCE` and a hash matching its own content.
    pub fn genesis() -> Self {
        let mut block = Self::new(GENESIS_PREV_HASH.to_string(), Vec::new());
        block.nonce = GENESIS_NONCE;
        block.hash = block.compute_hash();
        block
    }

    pub fn is_genesis(&self) -> bool {
        self.prev_hash == GENESIS_PREV_HASH && self.nonce == GENESIS_NONCE
    }

    /// Create a new block (not mined yet). Call `mine()` to perform PoW.
    /// The block owns its transactions; later pool changes never reach it.
    pub fn new(prev_hash: String, transactions: Vec<Transaction>) -> Self {
        let mut block = Self {
            transactions,
            prev_hash,
            hash: String::new(),
            nonce: INITIAL_NONCE,
            timestamp: Utc::now().timestamp(),
        };
        block.hash = block.compute_hash();
        block
    }

    /// SHA-256 (hex) of prev_hash, the ordered transactions, timestamp and
    /// nonce. The `hash` field itself is excluded.
    pub fn compute_hash(&self) -> String {
        let mut p = Preimage::new("block");
        p.put_str(&self.prev_hash)
            .put_u64(self.transactions.len() as u64);
        for tx in &self.transactions {
            tx.write_canonical(&mut p);
        }
        p.put_i64(self.timestamp).put_u64(self.nonce);
        p.digest_hex()
    }

    pub fn validate_transactions(&self) -> bool {
        match self.transactions.iter().position(|tx| !tx.is_authorized()) {
            Some(i) => {
                warn!("unauthorized transaction at position {i} in block");
                false
            }
            None => true,
        }
    }

    /// Perform Proof-of-Work by finding a nonce that yields a hash
    /// starting with `difficulty` leading zeros (in hex).
    pub fn mine(&mut self, difficulty: u32) -> Result<(), MiningAborted> {
        self.mine_cancellable(difficulty, &AtomicBool::new(false))
    }

    /// Same search as [`Block::mine`], polling `cancel` every
    /// `CANCEL_POLL_INTERVAL` nonces. On cancellation `hash` is left as it was.
    pub fn mine_cancellable(
        &mut self,
        difficulty: u32,
        cancel: &AtomicBool,
    ) -> Result<(), MiningAborted> {
        if !self.validate_transactions() {
            warn!("invalid transaction found in block, mining aborted");
            return Err(MiningAborted::InvalidTransactions);
        }

        let mut attempts: u64 = 0;
        loop {
            if attempts % CANCEL_POLL_INTERVAL == 0 && cancel.load(Ordering::Relaxed) {
                debug!("nonce search cancelled after {attempts} attempts");
                return Err(MiningAborted::Cancelled);
            }
            let candidate = self.compute_hash();
            if meets_difficulty(&candidate, difficulty) {
                self.hash = candidate;
                info!(
                    "mined block: nonce={}, difficulty={}, hash={}",
                    self.nonce, difficulty, self.hash
                );
                return Ok(());
            }
            self.nonce = self.nonce.wrapping_add(1);
            attempts += 1;
        }
    }

    /// Whether the cached `hash` still matches the block content.
    pub fn has_valid_hash(&self) -> bool {
        self.hash == self.compute_hash()
    }

    pub fn meets_difficulty(&self, difficulty: u32) -> bool {
        meets_difficulty(&self.hash, difficulty)
    }
}
