use crate::api::schema::{ErrorResponse, Request, Response, SubmittedResponse, ValidityResponse};
use crate::core::{Block, Blockchain, Transaction};
use crate::error::Result;
use log::{debug, error, warn};
use std::sync::Arc;

/// Adapts transport requests to ledger operations. The transport owns the
/// handler (and through it the ledger); nothing here is global.
#[derive(Clone)]
pub struct ApiHandler {
    ledger: Arc<Blockchain>,
}

impl ApiHandler {
    pub fn new(ledger: Arc<Blockchain>) -> ApiHandler {
        ApiHandler { ledger }
    }

    pub fn ledger(&self) -> &Arc<Blockchain> {
        &self.ledger
    }

    pub fn list_chain(&self) -> Vec<Block> {
        self.ledger.chain()
    }

    pub fn list_pending(&self) -> Vec<Transaction> {
        self.ledger.pending()
    }

    pub fn check_validity(&self) -> ValidityResponse {
        ValidityResponse {
            valid: self.ledger.is_valid(),
        }
    }

    pub fn mine_block(&self, miner: Option<&str>) -> Result<Block> {
        match miner {
            Some(miner) => self.ledger.mine_block_for(miner),
            None => self.ledger.mine_block(),
        }
    }

    pub fn submit_transaction(
        &self,
        sender: &str,
        recipient: &str,
        amount: f64,
    ) -> Result<SubmittedResponse> {
        let pending = self.ledger.submit_transaction(sender, recipient, amount)?;
        Ok(SubmittedResponse { pending })
    }

    pub fn handle(&self, request: Request) -> Response {
        debug!("Handling {request:?}");
        let result = match request {
            Request::ListChain => Ok(Response::Chain(self.list_chain())),
            Request::ListPending => Ok(Response::Pending(self.list_pending())),
            Request::CheckValidity => Ok(Response::Validity(self.check_validity())),
            Request::MineBlock { miner } => self.mine_block(miner.as_deref()).map(Response::Mined),
            Request::SubmitTransaction {
                sender,
                recipient,
                amount,
            } => amount
                .to_f64()
                .and_then(|amount| self.submit_transaction(&sender, &recipient, amount))
                .map(Response::Submitted),
        };
        result.unwrap_or_else(|e| Response::Error(ErrorResponse::from(&e)))
    }

    /// One JSON request in, one JSON response out. Malformed requests get a
    /// `bad_request` error body rather than an `Err`.
    pub fn handle_json(&self, raw: &str) -> String {
        let response = match serde_json::from_str::<Request>(raw) {
            Ok(request) => self.handle(request),
            Err(e) => {
                warn!("Malformed request: {e}");
                Response::Error(ErrorResponse::new("bad_request", e.to_string()))
            }
        };
        serde_json::to_string(&response).unwrap_or_else(|e| {
            error!("Failed to encode response: {e}");
            r#"{"error":{"kind":"serialization","message":"response could not be encoded"}}"#
                .to_string()
        })
    }
}
