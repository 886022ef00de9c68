use log::{debug, info, warn};

use super::{BASE_REWARD, Block};
use crate::error::{ChainTamper, Error, Result, TamperKind};
use crate::transaction::Transaction;

/// In-memory blockchain with a pending-transaction pool and Proof-of-Work.
///
/// Not synchronised: callers sharing one instance put it behind a single lock
/// (see `api::AppState`).
#[derive(Debug)]
pub struct Blockchain {
    chain: Vec<Block>,
    pool: Vec<Transaction>,
    difficulty: u32,
    reward: u64,
}

impl Blockchain {
    /// Initialize a new blockchain with a genesis block.
    pub fn new(difficulty: u32) -> Self {
        Self::with_reward(difficulty, BASE_REWARD)
    }

    pub fn with_reward(difficulty: u32, reward: u64) -> Self {
        Self {
            chain: vec![Block::genesis()],
            pool: Vec::new(),
            difficulty,
            reward,
        }
    }

    /// Return the last block in the chain.
    pub fn last_block(&self) -> &Block {
        // Genesis is pushed in the constructor and blocks are never removed.
        &self.chain[self.chain.len() - 1]
    }

    pub fn blocks(&self) -> &[Block] {
        &self.chain
    }

    /// Pending transactions in arrival order.
    pub fn pool(&self) -> &[Transaction] {
        &self.pool
    }

    pub fn len(&self) -> usize {
        self.chain.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chain.is_empty()
    }

    pub fn difficulty(&self) -> u32 {
        self.difficulty
    }

    pub fn reward(&self) -> u64 {
        self.reward
    }

    /// Add an authorized transaction to the pool. Undecodable keys or
    /// signatures are reported as such, not as unauthorized.
    pub fn submit_transaction(&mut self, tx: Transaction) -> Result<()> {
        if let Err(e) = tx.check_authorization() {
            warn!("rejected transaction from {}: {}", tx.from, e);
            return Err(e);
        }
        self.pool.push(tx);
        debug!("transaction accepted into pool (size={})", self.pool.len());
        Ok(())
    }

    /// Build the next (unmined) block: the whole pool plus a reward for
    /// `miner`. Works on a copy, so the pool is left as it is.
    pub fn prepare_block(&self, miner: &str) -> Block {
        let mut staged = self.pool.clone();
        staged.push(Transaction::reward(miner, self.reward));
        Block::new(self.last_block().hash.clone(), staged)
    }

    /// Append a mined block built by [`Blockchain::prepare_block`] and drop
    /// the transactions it included from the pool.
    pub fn commit_block(&mut self, block: Block) -> Result<&Block> {
        let head = &self.last_block().hash;
        if &block.prev_hash != head {
            return Err(Error::StaleBlock {
                expected: head.clone(),
                actual: block.prev_hash,
            });
        }
        if !block.has_valid_hash() {
            return Err(Error::InvalidBlock(TamperKind::HashMismatch));
        }
        if !block.meets_difficulty(self.difficulty) {
            return Err(Error::InvalidBlock(TamperKind::InsufficientWork));
        }
        if !block.validate_transactions() {
            return Err(Error::InvalidBlock(TamperKind::InvalidTransaction));
        }

        // A prepared block is the pool snapshot plus one trailing reward. The
        // pool only grows between prepare and commit, and a block built on an
        // older head is refused above, so the snapshot is the pool prefix.
        let included = block
            .transactions
            .len()
            .saturating_sub(1)
            .min(self.pool.len());
        self.pool.drain(..included);

        info!(
            "sealed block #{} (hash={}, nonce={}, txs={}, pool left={})",
            self.chain.len(),
            block.hash,
            block.nonce,
            block.transactions.len(),
            self.pool.len()
        );
        self.chain.push(block);
        Ok(self.last_block())
    }

    /// Mine the pool into a new block paying the reward to `miner`.
    /// On failure neither the pool nor the chain changes.
    pub fn mine_next_block(&mut self, miner: &str) -> Result<&Block> {
        let mut block = self.prepare_block(miner);
        block.mine(self.difficulty)?;
        self.commit_block(block)
    }

    /// Walk the chain from genesis and report the first violation.
    pub fn verify(&self) -> std::result::Result<(), ChainTamper> {
        let genesis = &self.chain[0];
        if !genesis.has_valid_hash() {
            return Err(self.tampered(0, TamperKind::HashMismatch));
        }
        if !genesis.is_genesis() {
            return Err(self.tampered(0, TamperKind::BrokenLinkage));
        }

        for (i, pair) in self.chain.windows(2).enumerate() {
            let (prev, current) = (&pair[0], &pair[1]);
            let index = i + 1;

            if !current.has_valid_hash() {
                return Err(self.tampered(index, TamperKind::HashMismatch));
            }
            if current.prev_hash != prev.hash {
                return Err(self.tampered(index, TamperKind::BrokenLinkage));
            }
            if !current.validate_transactions() {
                return Err(self.tampered(index, TamperKind::InvalidTransaction));
            }
            if !current.meets_difficulty(self.difficulty) {
                return Err(self.tampered(index, TamperKind::InsufficientWork));
            }
        }
        Ok(())
    }

    pub fn is_valid_chain(&self) -> bool {
        self.verify().is_ok()
    }

    fn tampered(&self, index: usize, kind: TamperKind) -> ChainTamper {
        let tamper = ChainTamper { index, kind };
        warn!("chain verification failed: {tamper}");
        tamper
    }
}
