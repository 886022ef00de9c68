use std::sync::atomic::AtomicBool;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::blockchain::{Block, Blockchain};
use crate::config::Config;
use crate::error::ChainTamper;
use crate::transaction::Transaction;

/// Shared application state: one ledger behind one lock.
pub struct AppState {
    pub blockchain: Mutex<Blockchain>,
    /// Set while a nonce search is in flight; only one runs at a time.
    pub mining: AtomicBool,
    /// Upper bound for a single nonce search; zero means unbounded.
    pub mining_timeout: Duration,
}

impl AppState {
    pub fn new(config: &Config) -> Self {
        Self {
            blockchain: Mutex::new(Blockchain::with_reward(
                config.difficulty,
                config.miner_reward,
            )),
            mining: AtomicBool::new(false),
            mining_timeout: config.mining_timeout,
        }
    }

    /// Lock the ledger. Every ledger mutation completes before it returns,
    /// so the state behind a poisoned lock is still consistent.
    pub fn chain(&self) -> MutexGuard<'_, Blockchain> {
        self.blockchain
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(&Config::default())
    }
}

/* ---------- TX API Models ---------- */

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct NewTxRequest {
    pub sender_public_key: String,
    pub sender_private_key: String,
    pub receiver_public_key: String,
    pub amount: u64,
}

impl NewTxRequest {
    pub fn has_missing_fields(&self) -> bool {
        self.sender_public_key.trim().is_empty()
            || self.sender_private_key.trim().is_empty()
            || self.receiver_public_key.trim().is_empty()
            || self.amount == 0
    }
}

#[derive(Serialize)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Serialize)]
pub struct PoolResponse {
    pub size: usize,
    pub transactions: Vec<Transaction>,
}

/* ---------- Chain API Models ---------- */

#[derive(Serialize)]
pub struct ChainResponse<'a> {
    pub length: usize,
    pub difficulty: u32,
    pub chain: &'a [Block],
}

#[derive(Serialize)]
pub struct ValidateResponse {
    pub valid: bool,
    pub length: usize,
    pub difficulty: u32,
    pub tamper: Option<ChainTamper>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct MineRequest {
    pub miner_public_key: String,
}

#[derive(Serialize)]
pub struct MineResponse {
    pub mined_index: usize,
    pub hash: String,
    pub nonce: u64,
    pub difficulty: u32,
    pub transactions: usize,
}

/* ---------- Wallet API Models ---------- */

#[derive(Serialize)]
pub struct NewWalletResponse {
    pub private_key: String,
    pub public_key: String,
}
