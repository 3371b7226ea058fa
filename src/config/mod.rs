//! Configuration management
//!
//! Mining settings for a ledger instance, read from TOML with `LEDGER_*`
//! environment overrides. There is no global config: each ledger is built
//! from the `Config` it is given.

pub mod settings;

pub use settings::{Config, MiningConfig};
