pub mod block;
pub mod model;

pub use block::Block;
pub use model::Blockchain;

/// Default Proof-of-Work difficulty (number of leading zeros).
pub const DEFAULT_DIFFICULTY: u32 = 3;

/// Highest meaningful difficulty: a SHA-256 hex digest has 64 characters.
pub const MAX_DIFFICULTY: u32 = 64;

/// Reward paid to the miner of each block.
pub const BASE_REWARD: u64 = 50;

/// Predecessor marker stored in the genesis block.
pub const GENESIS_PREV_HASH: &str = "0";

/// Sentinel nonce of the genesis block, which is exempt from Proof-of-Work.
pub const GENESIS_NONCE: u64 = 0;

/// Nonce every freshly built block starts its search from.
pub const INITIAL_NONCE: u64 = 1;

/// How many nonces are tried between checks of the cancellation flag.
pub const CANCEL_POLL_INTERVAL: u64 = 4096;
