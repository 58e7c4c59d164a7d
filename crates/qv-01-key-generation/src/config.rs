//! # Key Generation Configuration

use std::time::Duration;

use crate::domain::MAX_KEY_SIZE_BITS;

/// Key generation configuration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KeyGenConfig {
    /// Upper bound on a single key request, in bits.
    pub max_key_size_bits: u32,

    /// Deadline for one key-source call, in milliseconds.
    /// An elapsed deadline is reported as a network failure.
    pub provider_timeout_ms: u64,
}

impl Default for KeyGenConfig {
    fn default() -> Self {
        Self {
            max_key_size_bits: MAX_KEY_SIZE_BITS,
            provider_timeout_ms: 10_000,
        }
    }
}

impl KeyGenConfig {
    /// Create a config for testing (short deadline).
    pub fn for_testing() -> Self {
        Self {
            max_key_size_bits: MAX_KEY_SIZE_BITS,
            provider_timeout_ms: 200,
        }
    }

    /// Provider deadline as a `Duration`.
    pub fn provider_timeout(&self) -> Duration {
        Duration::from_millis(self.provider_timeout_ms)
    }
}
