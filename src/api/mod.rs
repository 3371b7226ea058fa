//! Request/response surface for a transport layer
//!
//! Explicit JSON schemas for the five ledger operations and a handler that
//! dispatches them. HTTP routing and rendering live outside this crate; the
//! bundled CLI drives the same handler over JSON lines.

pub mod handler;
pub mod schema;

pub use handler::ApiHandler;
pub use schema::{
    AmountInput, ErrorBody, ErrorResponse, Request, Response, SubmittedResponse,
    ValidityResponse,
};
