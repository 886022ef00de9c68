use serde::Serialize;
use thiserror::Error;

use crate::wallet::KeyError;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("malformed key or signature: {0}")]
    MalformedKeyOrSignature(#[from] KeyError),
    #[error("unauthorized transaction: signature missing or invalid")]
    UnauthorizedTransaction,
    #[error("mining failed: {0}")]
    MiningFailed(#[from] MiningAborted),
    #[error("stale block: expected previous hash {expected}, got {actual}")]
    StaleBlock { expected: String, actual: String },
    #[error("block rejected: {0}")]
    InvalidBlock(TamperKind),
}

/// Why a nonce search stopped without producing a block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum MiningAborted {
    #[error("block contains unauthorized transactions")]
    InvalidTransactions,
    #[error("nonce search cancelled")]
    Cancelled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Error)]
#[serde(rename_all = "snake_case")]
pub enum TamperKind {
    #[error("stored hash does not match block content")]
    HashMismatch,
    #[error("previous hash does not match predecessor")]
    BrokenLinkage,
    #[error("block holds an unauthorized transaction")]
    InvalidTransaction,
    #[error("hash does not meet the difficulty target")]
    InsufficientWork,
}

/// First violation found while walking the chain from genesis forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Error)]
#[error("block {index}: {kind}")]
pub struct ChainTamper {
    pub index: usize,
    pub kind: TamperKind,
}
