use crate::core::{Difficulty, DifficultyMode, MAX_HEX_ZEROS, MAX_TARGET_BITS};
use crate::error::{LedgerError, Result};
use log::info;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::Path;

const DIFFICULTY_KEY: &str = "LEDGER_DIFFICULTY";
const MAX_ATTEMPTS_KEY: &str = "LEDGER_MAX_ATTEMPTS";

const DEFAULT_DIFFICULTY: u32 = 2;
const DEFAULT_REWARD_SENDER: &str = "Network";

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub mining: MiningConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MiningConfig {
    pub difficulty: u32,
    pub difficulty_mode: DifficultyMode,
    /// Give up with `MiningTimeout` after this many nonces
    pub max_attempts: Option<u64>,
    /// Seal at most this many pool transactions per block
    pub max_transactions_per_block: Option<usize>,
    /// Reward paid to the beneficiary of `mine_block_for`
    pub block_reward: Option<f64>,
    pub reward_sender: String,
}

impl Default for MiningConfig {
    fn default() -> Self {
        MiningConfig {
            difficulty: DEFAULT_DIFFICULTY,
            difficulty_mode: DifficultyMode::HexZeros,
            max_attempts: None,
            max_transactions_per_block: None,
            block_reward: None,
            reward_sender: DEFAULT_REWARD_SENDER.to_string(),
        }
    }
}

impl MiningConfig {
    pub fn difficulty(&self) -> Difficulty {
        Difficulty::from_mode(self.difficulty_mode, self.difficulty)
    }
}

impl Config {
    /// Defaults with environment overrides applied
    pub fn new() -> Result<Config> {
        let mut config = Config::default();
        config.apply_env()?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_toml_str(raw: &str) -> Result<Config> {
        let config: Config = toml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads a TOML file, then lets the environment override it
    pub fn load(path: impl AsRef<Path>) -> Result<Config> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|e| {
            LedgerError::Config(format!("Failed to read {}: {e}", path.display()))
        })?;
        let mut config: Config = toml::from_str(&raw)?;
        config.apply_env()?;
        config.validate()?;
        info!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    pub fn apply_env(&mut self) -> Result<()> {
        self.apply_overrides(|key| env::var(key).ok())
    }

    /// Applies `LEDGER_*` overrides from any key lookup
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(raw) = lookup(DIFFICULTY_KEY) {
            self.mining.difficulty = raw.trim().parse().map_err(|e| {
                LedgerError::Config(format!("{DIFFICULTY_KEY}={raw} is not a valid number: {e}"))
            })?;
        }
        if let Some(raw) = lookup(MAX_ATTEMPTS_KEY) {
            let attempts: u64 = raw.trim().parse().map_err(|e| {
                LedgerError::Config(format!("{MAX_ATTEMPTS_KEY}={raw} is not a valid number: {e}"))
            })?;
            self.mining.max_attempts = Some(attempts);
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        let mining = &self.mining;
        let limit = match mining.difficulty_mode {
            DifficultyMode::HexZeros => MAX_HEX_ZEROS,
            DifficultyMode::TargetBits => MAX_TARGET_BITS,
        };
        if mining.difficulty > limit {
            return Err(LedgerError::Config(format!(
                "difficulty {} exceeds the maximum of {limit}",
                mining.difficulty
            )));
        }
        if mining.max_transactions_per_block == Some(0) {
            return Err(LedgerError::Config(
                "max_transactions_per_block must be at least 1".to_string(),
            ));
        }
        if let Some(reward) = mining.block_reward {
            if !reward.is_finite() || reward <= 0.0 {
                return Err(LedgerError::Config(format!(
                    "block_reward must be a positive number, got {reward}"
                )));
            }
            if mining.reward_sender.trim().is_empty() {
                return Err(LedgerError::Config(
                    "reward_sender must not be blank when a reward is set".to_string(),
                ));
            }
        }
        Ok(())
    }

    /// Convenience for a default config with another hex-zero difficulty
    pub fn with_difficulty(difficulty: u32) -> Config {
        let mut config = Config::default();
        config.mining.difficulty = difficulty;
        config
    }
}
