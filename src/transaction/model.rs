use serde::{Deserialize, Serialize};

/// A single transfer record: who sent how much Tamag to whom, and the
/// mythological event being recorded. Immutable once queued; becomes part
/// of exactly one block when mined.
///
/// `amount` is deliberately signed and unvalidated — the ledger records
/// what it is told, it does not enforce an economic model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Transaction {
    pub sender: String,
    pub recipient: String,
    pub amount: i64,
    pub label: String,
}

impl Transaction {
    pub fn new(sender: &str, recipient: &str, amount: i64, label: &str) -> Self {
        Self {
            sender: sender.to_string(),
            recipient: recipient.to_string(),
            amount,
            label: label.to_string(),
        }
    }
}
