//! Domain types shared across the assessment pipeline.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A single blockchain transaction under assessment.
///
/// Created by the caller and never mutated by the engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    /// Caller-supplied transaction id (hash or synthetic).
    pub id: String,
    /// Sender address.
    pub sender: String,
    /// Recipient address.
    pub recipient: String,
    /// Transfer value in native token units.
    pub value: f64,
    /// Gas limit/used for the transaction.
    pub gas: u64,
    /// Unix timestamp (seconds).
    pub timestamp: i64,
}

impl Transaction {
    pub fn new(
        id: impl Into<String>,
        sender: impl Into<String>,
        recipient: impl Into<String>,
        value: f64,
        gas: u64,
        timestamp: i64,
    ) -> Self {
        Self {
            id: id.into(),
            sender: sender.into(),
            recipient: recipient.into(),
            value,
            gas,
            timestamp,
        }
    }
}

/// Aggregate context about the sender's wallet, supplied by the caller.
///
/// Read-only to the engine. Every field is optional: a missing average
/// degrades the corresponding feature to its documented default instead of
/// failing the assessment.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WalletHistory {
    /// Average historical transfer value of the sender.
    pub avg_tx_value: Option<f64>,
    /// Average historical gas of the sender.
    pub avg_gas: Option<f64>,
    /// Per-recipient interaction counter keyed by address.
    pub interactions: HashMap<String, u32>,
}

impl WalletHistory {
    pub fn new(avg_tx_value: f64, avg_gas: f64) -> Self {
        Self {
            avg_tx_value: Some(avg_tx_value),
            avg_gas: Some(avg_gas),
            interactions: HashMap::new(),
        }
    }

    pub fn with_interaction(mut self, address: impl Into<String>, count: u32) -> Self {
        self.interactions.insert(address.into(), count);
        self
    }

    /// Times the sender has interacted with `address` before, 0 if unknown.
    pub fn interaction_count(&self, address: &str) -> u32 {
        self.interactions.get(address).copied().unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interaction_lookup() {
        let history = WalletHistory::new(0.5, 21000.0).with_interaction("0xabc991", 2);

        assert_eq!(history.interaction_count("0xabc991"), 2);
        assert_eq!(history.interaction_count("0xunknown"), 0);
    }

    #[test]
    fn test_default_history_is_empty() {
        let history = WalletHistory::default();
        assert!(history.avg_tx_value.is_none());
        assert!(history.avg_gas.is_none());
        assert_eq!(history.interaction_count("0xany"), 0);
    }
}
