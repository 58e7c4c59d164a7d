//! # Pipeline Configuration

use qv_01_key_generation::MAX_KEY_SIZE_BITS;
use shared_crypto::kdf::MIN_KEY_MATERIAL_BYTES;
use std::time::Duration;

use crate::domain::PipelineError;

/// Transaction pipeline configuration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PipelineConfig {
    /// Size of the key requested per run.
    pub key_size_bits: u32,

    /// Deadline for each remote mirror call.
    pub sync_timeout_ms: u64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            key_size_bits: 256,
            sync_timeout_ms: 3_000,
        }
    }
}

impl PipelineConfig {
    /// Create a config for testing.
    pub fn for_testing() -> Self {
        Self {
            key_size_bits: 256,
            sync_timeout_ms: 100,
        }
    }

    /// Smallest key the payload sealing accepts.
    pub fn min_key_size_bits() -> u32 {
        (MIN_KEY_MATERIAL_BYTES * 8) as u32
    }

    /// Check the key size against the sealing floor and the generator ceiling.
    pub fn validate(&self) -> Result<(), PipelineError> {
        let min = Self::min_key_size_bits();
        if self.key_size_bits < min || self.key_size_bits > MAX_KEY_SIZE_BITS {
            return Err(PipelineError::InvalidConfig(format!(
                "key_size_bits {} outside [{}, {}]",
                self.key_size_bits, min, MAX_KEY_SIZE_BITS
            )));
        }
        Ok(())
    }

    /// Mirror call deadline.
    pub fn sync_timeout(&self) -> Duration {
        Duration::from_millis(self.sync_timeout_ms)
    }
}
