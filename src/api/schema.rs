use crate::core::{Block, Transaction};
use crate::error::{LedgerError, Result};
use serde::{Deserialize, Serialize};

/// One request to the ledger, as a JSON object tagged by `op`:
///
/// ```json
/// {"op": "submit_transaction", "sender": "alice", "recipient": "bob", "amount": 10}
/// {"op": "mine_block"}
/// {"op": "list_chain"}
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Request {
    ListChain,
    ListPending,
    CheckValidity,
    MineBlock {
        #[serde(default)]
        miner: Option<String>,
    },
    SubmitTransaction {
        sender: String,
        recipient: String,
        amount: AmountInput,
    },
}

/// Amounts arrive either as JSON numbers or as numeric strings from form
/// posts. Both end up as `f64` before the submission gate sees them.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum AmountInput {
    Number(f64),
    Text(String),
}

impl AmountInput {
    pub fn to_f64(&self) -> Result<f64> {
        match self {
            AmountInput::Number(value) => Ok(*value),
            AmountInput::Text(raw) => raw.trim().parse::<f64>().map_err(|_| {
                LedgerError::InvalidTransaction(format!("amount {raw:?} is not a number"))
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ValidityResponse {
    pub valid: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SubmittedResponse {
    pub pending: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorBody {
    pub kind: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorBody,
}

impl ErrorResponse {
    pub fn new(kind: impl Into<String>, message: impl Into<String>) -> ErrorResponse {
        ErrorResponse {
            error: ErrorBody {
                kind: kind.into(),
                message: message.into(),
            },
        }
    }
}

impl From<&LedgerError> for ErrorResponse {
    fn from(err: &LedgerError) -> Self {
        ErrorResponse::new(err.kind(), err.to_string())
    }
}

/// Each variant serializes as its bare payload
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Response {
    Chain(Vec<Block>),
    Pending(Vec<Transaction>),
    Validity(ValidityResponse),
    Mined(Block),
    Submitted(SubmittedResponse),
    Error(ErrorResponse),
}

impl Response {
    pub fn is_error(&self) -> bool {
        matches!(self, Response::Error(_))
    }
}
