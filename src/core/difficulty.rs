use data_encoding::HEXLOWER;
use num_bigint::BigUint;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Upper bounds: a SHA-256 digest has 64 hex digits and 256 bits
pub const MAX_HEX_ZEROS: u32 = 64;
pub const MAX_TARGET_BITS: u32 = 256;

/// How the configured difficulty number is interpreted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DifficultyMode {
    #[default]
    HexZeros,
    TargetBits,
}

/// Proof-of-work predicate over a block hash
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Difficulty {
    /// The hex rendering of the hash starts with this many `'0'` characters
    LeadingHexZeros(u32),
    /// The hash, read as a 256-bit big-endian integer, is below `2^(256 - bits)`
    TargetBits { bits: u32, target: BigUint },
}

impl Difficulty {
    pub fn leading_hex_zeros(zeros: u32) -> Difficulty {
        Difficulty::LeadingHexZeros(zeros.min(MAX_HEX_ZEROS))
    }

    pub fn target_bits(bits: u32) -> Difficulty {
        let bits = bits.min(MAX_TARGET_BITS);
        let target = BigUint::from(1u8) << (MAX_TARGET_BITS - bits);
        Difficulty::TargetBits { bits, target }
    }

    pub fn from_mode(mode: DifficultyMode, value: u32) -> Difficulty {
        match mode {
            DifficultyMode::HexZeros => Difficulty::leading_hex_zeros(value),
            DifficultyMode::TargetBits => Difficulty::target_bits(value),
        }
    }

    /// Rough number of hash evaluations a search needs on average
    pub fn expected_attempts(&self) -> f64 {
        match self {
            Difficulty::LeadingHexZeros(zeros) => 16f64.powi(*zeros as i32),
            Difficulty::TargetBits { bits, .. } => 2f64.powi(*bits as i32),
        }
    }

    /// Checks a raw 32-byte digest
    pub fn is_met_by_digest(&self, digest: &[u8]) -> bool {
        match self {
            Difficulty::LeadingHexZeros(zeros) => {
                let full_bytes = (*zeros / 2) as usize;
                if digest.len() < full_bytes || digest[..full_bytes].iter().any(|b| *b != 0) {
                    return false;
                }
                if zeros % 2 == 1 {
                    // the odd hex digit is the high nibble of the next byte
                    return digest.get(full_bytes).is_some_and(|b| *b < 0x10);
                }
                true
            }
            Difficulty::TargetBits { target, .. } => BigUint::from_bytes_be(digest) < *target,
        }
    }

    /// Checks a hash in its stored hex form. Malformed hex never satisfies.
    pub fn is_met_by(&self, hash_hex: &str) -> bool {
        match self {
            Difficulty::LeadingHexZeros(zeros) => {
                hash_hex.len() >= *zeros as usize
                    && hash_hex.bytes().take(*zeros as usize).all(|c| c == b'0')
            }
            Difficulty::TargetBits { .. } => match HEXLOWER.decode(hash_hex.as_bytes()) {
                Ok(digest) => self.is_met_by_digest(&digest),
                Err(_) => false,
            },
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Difficulty::LeadingHexZeros(zeros) => write!(f, "{zeros} leading hex zeros"),
            Difficulty::TargetBits { bits, .. } => write!(f, "{bits} target bits"),
        }
    }
}
