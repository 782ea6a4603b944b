use chrono::{NaiveDateTime, Timelike, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use super::GENESIS_PREV_HASH;
use crate::transaction::Transaction;

/// Wire format for block timestamps: date + time + microseconds.
/// The same rendering feeds the hash preimage, so a block reconstructed
/// from its wire form hashes identically to the original.
pub mod ts_format {
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer, de};

    pub const FORMAT: &str = "%Y-%m-%d %H:%M:%S%.6f";

    pub fn serialize<S>(ts: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&ts.format(FORMAT).to_string())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        NaiveDateTime::parse_from_str(&s, FORMAT).map_err(de::Error::custom)
    }
}

/// A single block in the chain holding an ordered list of transactions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Block {
    pub index: u64,
    #[serde(with = "ts_format")]
    pub timestamp: NaiveDateTime,
    pub transactions: Vec<Transaction>,
    pub previous_hash: String,
    pub nonce: u64, // Proof-of-Work search counter
    pub hash: String,
}

/// Current UTC time truncated to microseconds, the precision the wire
/// format carries. Blocks must never hold sub-microsecond nanos or they
/// would no longer equal their own wire round-trip.
fn now_wire_precision() -> NaiveDateTime {
    let now = Utc::now().naive_utc();
    now.with_nanosecond(now.nanosecond() / 1000 * 1000)
        .expect("truncating nanoseconds keeps them in range")
}

impl Block {
    /// The canonical genesis block. Every node computes the same one:
    /// fixed timestamp, fixed founding transaction, nonce 0, no
    /// Proof-of-Work requirement.
    pub fn genesis() -> Self {
        let timestamp =
            NaiveDateTime::parse_from_str("2024-03-21 00:00:00.000000", ts_format::FORMAT)
                .expect("genesis timestamp literal");
        let mut block = Self {
            index: 0,
            timestamp,
            transactions: vec![Transaction::new(
                "Kayra Han",
                "Kök Tamır",
                1000,
                "Tüm Varlıkların Yaratılışı",
            )],
            previous_hash: GENESIS_PREV_HASH.to_string(),
            nonce: 0,
            hash: String::new(),
        };
        block.hash = block.compute_hash();
        block
    }

    /// Create a candidate block (not sealed yet). Call `mine()` to perform PoW.
    pub fn new(index: u64, previous_hash: String, transactions: Vec<Transaction>) -> Self {
        let mut block = Self {
            index,
            timestamp: now_wire_precision(),
            transactions,
            previous_hash,
            nonce: 0,
            hash: String::new(),
        };
        block.hash = block.compute_hash();
        block
    }

    /// Compute the SHA-256 hash of this block from its fields (excluding
    /// the `hash` field itself). Transactions are serialized as JSON in
    /// queue order and included in the preimage.
    pub fn compute_hash(&self) -> String {
        let txs_json = serde_json::to_string(&self.transactions).expect("serialize txs");
        let preimage = format!(
            "{}:{}:{}:{}:{}",
            self.index,
            self.timestamp.format(ts_format::FORMAT),
            self.previous_hash,
            self.nonce,
            txs_json
        );
        let mut hasher = Sha256::new();
        hasher.update(preimage.as_bytes());
        hex::encode(hasher.finalize())
    }

    /// Perform Proof-of-Work: increment the nonce until the hash starts
    /// with `difficulty` zero hex chars. Unbounded, blocking search; the
    /// expected attempt count grows as 16^difficulty.
    pub fn mine(&mut self, difficulty: u32) {
        let target_prefix = "0".repeat(difficulty as usize);
        loop {
            self.hash = self.compute_hash();
            if self.hash.starts_with(&target_prefix) {
                break;
            }
            self.nonce = self.nonce.wrapping_add(1);
        }
    }

    /// Validate that the stored `hash` matches the block's content and
    /// satisfies the PoW difficulty. (Does NOT validate chain linkage.)
    pub fn is_valid(&self, difficulty: u32) -> bool {
        if self.hash != self.compute_hash() {
            return false;
        }
        self.hash
            .chars()
            .take(difficulty as usize)
            .all(|c| c == '0')
    }
}
