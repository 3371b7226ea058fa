use data_encoding::HEXLOWER;
use ring::digest::{Context, SHA256};

use crate::error::{LedgerError, Result};
use std::time::{SystemTime, UNIX_EPOCH};

/// Seconds since the Unix epoch. Block timestamps are stored in seconds;
/// clients scale them to milliseconds themselves.
pub fn current_timestamp() -> Result<i64> {
    let secs = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_err(|e| LedgerError::Clock(format!("System time error: {e}")))?
        .as_secs();

    i64::try_from(secs).map_err(|_| LedgerError::Clock("Timestamp overflow".to_string()))
}

pub fn sha256_digest(data: &[u8]) -> Vec<u8> {
    let mut context = Context::new(&SHA256);
    context.update(data);
    let digest = context.finish();
    digest.as_ref().to_vec()
}

/// SHA-256 rendered as 64 lowercase hex characters
pub fn sha256_hex(data: &[u8]) -> String {
    HEXLOWER.encode(&sha256_digest(data))
}

/// A SHA-256 context that has already absorbed `prefix`. Cloning it lets the
/// miner hash many preimages sharing the same prefix without re-reading it.
pub fn sha256_context(prefix: &[u8]) -> Context {
    let mut context = Context::new(&SHA256);
    context.update(prefix);
    context
}
