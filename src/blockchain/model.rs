use std::collections::HashSet;

use log::{debug, info, warn};

use super::{ALLOWED_ENTITIES, Block, MINER_REWARD, SYSTEM_SENDER};
use crate::transaction::Transaction;

/// In-memory ledger owned by one node: the committed chain, the pending
/// transaction queue, the sender allow-list and the known peer set.
#[derive(Debug)]
pub struct Ledger {
    pub chain: Vec<Block>,
    pub pending_transactions: Vec<Transaction>,
    pub difficulty: u32,
    pub miner_reward: i64,
    pub allowed_entities: Vec<String>,
    pub nodes: HashSet<String>,
}

impl Ledger {
    /// Initialize a new ledger rooted at the canonical genesis block.
    pub fn new(difficulty: u32) -> Self {
        Self {
            chain: vec![Block::genesis()],
            pending_transactions: Vec::new(),
            difficulty,
            miner_reward: MINER_REWARD,
            allowed_entities: ALLOWED_ENTITIES.iter().map(|e| e.to_string()).collect(),
            nodes: HashSet::new(),
        }
    }

    /// Return the last block in the chain.
    pub fn last_block(&self) -> &Block {
        self.chain
            .last()
            .expect("ledger always holds at least the genesis block")
    }

    pub fn len(&self) -> usize {
        self.chain.len()
    }

    /// Register a peer address. The peer set only ever grows.
    pub fn add_node(&mut self, address: &str) {
        self.nodes.insert(address.to_string());
    }

    /// Queue a transaction for the next mined block. Rejected without
    /// mutation when the sender is not on the allow-list; the queue is
    /// FIFO and unbounded, with no deduplication.
    pub fn add_transaction(&mut self, transaction: Transaction) -> Result<(), &'static str> {
        if !self.allowed_entities.contains(&transaction.sender) {
            return Err("sender is not on the allow-list");
        }
        self.pending_transactions.push(transaction);
        Ok(())
    }

    /// Mine the entire pending queue into one new block. Returns `None`
    /// without touching any state when the queue is empty. On success the
    /// sealed block is appended and the queue is replaced with a single
    /// reward transaction crediting `miner_address`.
    pub fn mine_pending_transactions(&mut self, miner_address: &str) -> Option<&Block> {
        if self.pending_transactions.is_empty() {
            debug!("mine: pending queue is empty, nothing to do");
            return None;
        }

        let transactions = std::mem::take(&mut self.pending_transactions);
        let mut block = Block::new(
            self.chain.len() as u64,
            self.last_block().hash.clone(),
            transactions,
        );

        info!("mine: searching proof for block #{}", block.index);
        block.mine(self.difficulty);
        info!(
            "mine: sealed block #{} (hash={}, nonce={})",
            block.index, block.hash, block.nonce
        );

        self.chain.push(block);
        self.pending_transactions = vec![Transaction::new(
            SYSTEM_SENDER,
            miner_address,
            self.miner_reward,
            "Kut Bulma Ödülü",
        )];
        Some(self.last_block())
    }

    /// Full validation of a candidate chain, short-circuiting on the
    /// first failure: non-empty, rooted at the canonical genesis, every
    /// link continuous, and every non-genesis block's stored hash both
    /// recomputes from its content and carries the required proof prefix.
    pub fn valid_chain(&self, chain: &[Block]) -> bool {
        let Some(first) = chain.first() else {
            warn!("valid_chain: empty candidate");
            return false;
        };

        if *first != Block::genesis() {
            warn!("valid_chain: candidate is not rooted at the genesis block");
            return false;
        }

        for i in 1..chain.len() {
            let block = &chain[i];
            let prev = &chain[i - 1];

            if block.previous_hash != prev.hash {
                warn!("valid_chain: broken link at block #{}", block.index);
                return false;
            }

            if !block.is_valid(self.difficulty) {
                warn!("valid_chain: invalid proof at block #{}", block.index);
                return false;
            }
        }
        true
    }

    /// Longest-valid-chain rule over already-fetched peer snapshots:
    /// adopt a candidate iff it is strictly longer than the best seen so
    /// far (seeded with the local length) and passes `valid_chain`.
    /// Replacement is wholesale; the pending queue is not reconciled
    /// against the adopted history. Returns whether a replacement
    /// occurred.
    pub fn resolve_conflicts(&mut self, candidates: Vec<Vec<Block>>) -> bool {
        let mut longest: Option<Vec<Block>> = None;
        let mut max_length = self.chain.len();

        for candidate in candidates {
            if candidate.len() > max_length && self.valid_chain(&candidate) {
                max_length = candidate.len();
                longest = Some(candidate);
            }
        }

        match longest {
            Some(chain) => {
                info!("consensus: adopting a longer chain (length {max_length})");
                self.chain = chain;
                true
            }
            None => {
                debug!("consensus: local chain is already authoritative");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Ledger;
    use crate::blockchain::{Block, MINER_REWARD, SYSTEM_SENDER};
    use crate::transaction::Transaction;

    const TEST_DIFFICULTY: u32 = 2;

    fn ledger() -> Ledger {
        Ledger::new(TEST_DIFFICULTY)
    }

    #[test]
    fn allowed_sender_is_queued() {
        let mut lg = ledger();
        lg.add_transaction(Transaction::new("Ülgen", "Erlik Han", 100, "Göğ-Yer Dengesi"))
            .unwrap();
        assert_eq!(lg.pending_transactions.len(), 1);
    }

    #[test]
    fn disallowed_sender_is_rejected_without_mutation() {
        let mut lg = ledger();
        let err = lg.add_transaction(Transaction::new("Loki", "Asena", 50, "dolandırıcılık"));
        assert!(err.is_err());
        assert!(lg.pending_transactions.is_empty());
        assert!(
            lg.chain
                .iter()
                .all(|b| b.transactions.iter().all(|t| t.sender != "Loki"))
        );
    }

    #[test]
    fn mining_empty_queue_is_a_no_op() {
        let mut lg = ledger();
        assert!(lg.mine_pending_transactions("Kawa").is_none());
        assert_eq!(lg.len(), 1);
        assert!(lg.pending_transactions.is_empty());
    }

    #[test]
    fn mining_commits_queue_in_order_and_resets_to_reward() {
        let mut lg = ledger();
        let txs = [
            Transaction::new("Ülgen", "Erlik Han", 100, "Göğ-Yer Dengesi"),
            Transaction::new("Asena", "Börteçine", 200, "Bozkır Antlaşması"),
            Transaction::new("Kayra Han", "Gök Kurt", 500, "Ergenekon Çıkışı"),
        ];
        for tx in &txs {
            lg.add_transaction(tx.clone()).unwrap();
        }
        assert_eq!(lg.pending_transactions.len(), 3);

        let block = lg.mine_pending_transactions("Kawa").unwrap().clone();

        assert_eq!(lg.len(), 2);
        assert_eq!(block.index, 1);
        assert_eq!(block.transactions, txs);
        assert_eq!(block.previous_hash, lg.chain[0].hash);
        assert!(block.hash.starts_with("00"));

        assert_eq!(
            lg.pending_transactions,
            vec![Transaction::new(
                SYSTEM_SENDER,
                "Kawa",
                MINER_REWARD,
                "Kut Bulma Ödülü"
            )]
        );
    }

    #[test]
    fn mined_chain_passes_validation() {
        let mut lg = ledger();
        for _ in 0..2 {
            lg.add_transaction(Transaction::new("Asena", "Gök Kurt", 10, "armağan"))
                .unwrap();
            lg.mine_pending_transactions("Kawa");
        }

        assert!(lg.valid_chain(&lg.chain));
        assert_eq!(lg.chain[0], Block::genesis());
        for i in 1..lg.chain.len() {
            assert_eq!(lg.chain[i].previous_hash, lg.chain[i - 1].hash);
        }
    }

    #[test]
    fn validation_rejects_empty_and_wrong_root() {
        let lg = ledger();
        assert!(!lg.valid_chain(&[]));

        let mut forged = Block::genesis();
        forged.transactions[0].amount = 9999;
        forged.hash = forged.compute_hash();
        assert!(!lg.valid_chain(&[forged]));
    }

    #[test]
    fn validation_rejects_broken_link() {
        let mut lg = ledger();
        lg.add_transaction(Transaction::new("Ülgen", "Asena", 1, "bağ"))
            .unwrap();
        lg.mine_pending_transactions("Kawa");

        let mut chain = lg.chain.clone();
        chain[1].previous_hash = "0".repeat(64);
        assert!(!lg.valid_chain(&chain));
    }

    #[test]
    fn validation_rejects_tampered_block_content() {
        let mut lg = ledger();
        lg.add_transaction(Transaction::new("Ülgen", "Asena", 1, "bağ"))
            .unwrap();
        lg.mine_pending_transactions("Kawa");

        // Stored hash keeps its proof prefix but no longer matches content.
        let mut chain = lg.chain.clone();
        chain[1].transactions[0].amount = 1_000_000;
        assert!(!lg.valid_chain(&chain));
    }

    #[test]
    fn consensus_adopts_strictly_longer_valid_chain() {
        let mut a = ledger();
        let mut b = ledger();

        a.add_transaction(Transaction::new("Kayra Han", "Gök Kurt", 500, "Ergenekon Çıkışı"))
            .unwrap();
        a.mine_pending_transactions("Kawa");

        assert!(b.resolve_conflicts(vec![a.chain.clone()]));
        assert_eq!(b.chain, a.chain);
        assert_eq!(b.len(), a.len());
    }

    #[test]
    fn consensus_ignores_equal_length_and_invalid_chains() {
        let mut a = ledger();
        let mut b = ledger();

        // Equal length: never adopted.
        assert!(!b.resolve_conflicts(vec![a.chain.clone()]));

        // Longer but tampered: discarded entirely.
        a.add_transaction(Transaction::new("Asena", "Börteçine", 200, "Bozkır Antlaşması"))
            .unwrap();
        a.mine_pending_transactions("Kawa");
        let mut tampered = a.chain.clone();
        tampered[1].transactions[0].amount = -7;

        let local_before = b.chain.clone();
        assert!(!b.resolve_conflicts(vec![tampered]));
        assert_eq!(b.chain, local_before);
    }

    #[test]
    fn consensus_picks_longest_among_multiple_candidates() {
        let mut a = ledger();
        let mut b = ledger();
        let mut local = ledger();

        a.add_transaction(Transaction::new("Ülgen", "Asena", 1, "bağ")).unwrap();
        a.mine_pending_transactions("Kawa");

        b.add_transaction(Transaction::new("Ülgen", "Asena", 1, "bağ")).unwrap();
        b.mine_pending_transactions("Kawa");
        b.add_transaction(Transaction::new("Asena", "Gök Kurt", 2, "armağan"))
            .unwrap();
        b.mine_pending_transactions("Kawa");

        assert!(local.resolve_conflicts(vec![a.chain.clone(), b.chain.clone()]));
        assert_eq!(local.chain, b.chain);
    }
}
