//! Input validation for incoming transactions.

use crate::core::domain::Transaction;
use crate::core::errors::{EngineError, Result};

/// Validate the required fields of a transaction before assessment.
///
/// A transaction failing here is rejected immediately with
/// `InvalidTransaction`; nothing downstream runs.
pub fn validate_transaction(tx: &Transaction) -> Result<()> {
    if tx.sender.trim().is_empty() {
        return Err(EngineError::InvalidTransaction(
            "sender address is empty".to_string(),
        ));
    }
    if tx.recipient.trim().is_empty() {
        return Err(EngineError::InvalidTransaction(
            "recipient address is empty".to_string(),
        ));
    }
    if !tx.value.is_finite() {
        return Err(EngineError::InvalidTransaction(format!(
            "value is not a finite number: {}",
            tx.value
        )));
    }
    if tx.value < 0.0 {
        return Err(EngineError::InvalidTransaction(format!(
            "value is negative: {}",
            tx.value
        )));
    }
    Ok(())
}
