use std::sync::Mutex;

use serde::{Deserialize, Serialize};

use crate::blockchain::{Block, DEFAULT_DIFFICULTY, Ledger};
use crate::transaction::Transaction;

/// Shared application state: the node's single in-memory ledger behind one
/// mutual-exclusion boundary. Submission, mining and consensus replacement
/// each hold the lock for the whole logical operation.
pub struct AppState {
    pub ledger: Mutex<Ledger>,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            ledger: Mutex::new(Ledger::new(DEFAULT_DIFFICULTY)),
        }
    }
}

/* ---------- Chain API Models ---------- */

#[derive(Serialize)]
pub struct ChainResponse {
    pub length: usize,
    pub chain: Vec<Block>,
}

/// Strict mirror of `ChainResponse` for snapshots fetched from peers.
/// Unknown, missing or mistyped fields reject the whole snapshot.
#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ChainSnapshot {
    pub length: usize,
    pub chain: Vec<Block>,
}

#[derive(Serialize)]
pub struct ValidateResponse {
    pub valid: bool,
    pub length: usize,
}

/* ---------- Mining API Models ---------- */

#[derive(Deserialize)]
pub struct MineRequest {
    pub miner_address: String,
}

#[derive(Serialize)]
pub struct MineResponse {
    pub mined_index: u64,
    pub hash: String,
    pub nonce: u64,
    pub transactions: usize,
}

/* ---------- TX API Models ---------- */

#[derive(Deserialize)]
pub struct NewTxRequest {
    pub sender: String,
    pub recipient: String,
    pub amount: i64,
    pub label: String,
}

#[derive(Serialize)]
pub struct NewTxResponse {
    pub queued: usize,
}

#[derive(Serialize)]
pub struct PendingResponse {
    pub size: usize,
    pub transactions: Vec<Transaction>,
}

/* ---------- Node API Models ---------- */

#[derive(Deserialize)]
pub struct RegisterNodesRequest {
    pub nodes: Vec<String>,
}

#[derive(Serialize)]
pub struct RegisterNodesResponse {
    pub nodes: Vec<String>,
}

#[derive(Serialize)]
pub struct ResolveResponse {
    pub replaced: bool,
    pub length: usize,
}

/* ---------- Info API Models ---------- */

#[derive(Serialize)]
pub struct InfoResponse {
    pub allowed_entities: Vec<String>,
    pub difficulty: u32,
    pub miner_reward: i64,
    pub peers: Vec<String>,
}
