pub mod block;
pub mod model;

pub use block::Block;
pub use model::Ledger;

/// Proof-of-Work difficulty: required count of leading zero hex chars.
pub const DEFAULT_DIFFICULTY: u32 = 4;

/// Reward credited to the miner after each sealed block, in Tamag.
pub const MINER_REWARD: i64 = 50;

/// Identity that originates reward transactions.
pub const SYSTEM_SENDER: &str = "Sistem";

/// Entities permitted to originate a transaction. Sender identity is just
/// a label checked against this list; there is no signing.
pub const ALLOWED_ENTITIES: [&str; 8] = [
    "Ülgen",
    "Erlik Han",
    "Kayra Han",
    "Asena",
    "Börteçine",
    "Sistem",
    "Gök Kurt",
    "Alp Er Tunga",
];

/// Sentinel `previous_hash` of the genesis block.
pub const GENESIS_PREV_HASH: &str = "0";
