//! # Vote Configuration

use qv_01_key_generation::MAX_KEY_SIZE_BITS;
use shared_crypto::kdf::MIN_KEY_MATERIAL_BYTES;

use crate::domain::VoteError;

/// Vote casting configuration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VoteConfig {
    /// Size of the key requested per ballot.
    pub key_size_bits: u32,

    /// Attempts at drawing a receipt token not already issued.
    pub receipt_attempts: u32,
}

impl Default for VoteConfig {
    fn default() -> Self {
        Self {
            key_size_bits: 256,
            receipt_attempts: 4,
        }
    }
}

impl VoteConfig {
    /// Create a config for testing.
    pub fn for_testing() -> Self {
        Self::default()
    }

    /// Check the key size and retry budget.
    pub fn validate(&self) -> Result<(), VoteError> {
        let min = (MIN_KEY_MATERIAL_BYTES * 8) as u32;
        if self.key_size_bits < min || self.key_size_bits > MAX_KEY_SIZE_BITS {
            return Err(VoteError::InvalidConfig(format!(
                "key_size_bits {} outside [{}, {}]",
                self.key_size_bits, min, MAX_KEY_SIZE_BITS
            )));
        }
        if self.receipt_attempts == 0 {
            return Err(VoteError::InvalidConfig(
                "receipt_attempts must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
