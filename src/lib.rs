//! A minimal proof-of-work ledger: signed transfers, a pending pool, blocks
//! mined against a leading-zero difficulty target, and chain verification.

pub mod api;
pub mod blockchain;
pub mod canonical;
pub mod config;
pub mod error;
pub mod transaction;
pub mod wallet;

pub use blockchain::{Block, Blockchain};
pub use error::{ChainTamper, Error, MiningAborted, Result, TamperKind};
pub use transaction::Transaction;
