// A transfer between two opaque parties. Nothing here is signed; sender and
// recipient are plain labels and the amount is checked only at submission.

use crate::error::{LedgerError, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, bincode::Encode, bincode::Decode)]
pub struct Transaction {
    sender: String,
    recipient: String,
    amount: f64,
}

impl Transaction {
    /// Builds a transaction without validating it. Anything that should be
    /// trusted by the ledger goes through [`validate_transaction`] first.
    pub fn new(sender: impl Into<String>, recipient: impl Into<String>, amount: f64) -> Self {
        Transaction {
            sender: sender.into(),
            recipient: recipient.into(),
            amount,
        }
    }

    pub fn sender(&self) -> &str {
        &self.sender
    }

    pub fn recipient(&self) -> &str {
        &self.recipient
    }

    pub fn amount(&self) -> f64 {
        self.amount
    }

    /// Appends the canonical encoding of this transaction to `buf`:
    /// length-prefixed sender, length-prefixed recipient, amount bits.
    pub(crate) fn write_canonical(&self, buf: &mut Vec<u8>) {
        put_str(buf, &self.sender);
        put_str(buf, &self.recipient);
        buf.extend(self.amount.to_bits().to_be_bytes());
    }
}

/// Length-prefixed UTF-8, so that ("ab", "c") and ("a", "bc") never collide
pub(crate) fn put_str(buf: &mut Vec<u8>, value: &str) {
    buf.extend((value.len() as u64).to_be_bytes());
    buf.extend(value.as_bytes());
}

/// The submission gate. Rejects blank parties and amounts that are not
/// positive finite numbers; once past this point a transaction is trusted
/// verbatim.
pub fn validate_transaction(tx: &Transaction) -> Result<()> {
    if tx.sender.trim().is_empty() {
        return Err(LedgerError::InvalidTransaction(
            "sender must not be blank".to_string(),
        ));
    }
    if tx.recipient.trim().is_empty() {
        return Err(LedgerError::InvalidTransaction(
            "recipient must not be blank".to_string(),
        ));
    }
    if !tx.amount.is_finite() {
        return Err(LedgerError::InvalidTransaction(format!(
            "amount must be finite, got {}",
            tx.amount
        )));
    }
    if tx.amount <= 0.0 {
        return Err(LedgerError::InvalidTransaction(format!(
            "amount must be positive, got {}",
            tx.amount
        )));
    }
    Ok(())
}
