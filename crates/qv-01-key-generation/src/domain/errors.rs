//! # Domain Errors
//!
//! Error types for key generation.

use shared_types::ErrorKind;
use thiserror::Error;

/// Key generation error types.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum KeyGenError {
    /// Requested size is zero or above the configured maximum.
    #[error("Invalid key size: {size_bits} bits (must be 1..={max} bits)")]
    InvalidKeySize {
        /// Requested size
        size_bits: u32,
        /// Configured upper bound
        max: u32,
    },

    /// Provider endpoint unreachable.
    #[error("Key provider unreachable: {0}")]
    Network(String),

    /// Provider did not answer within the deadline.
    #[error("Key provider timed out after {timeout_ms} ms")]
    Timeout {
        /// Deadline that elapsed
        timeout_ms: u64,
    },

    /// Provider answered with something unusable.
    #[error("Key provider error: {0}")]
    Provider(String),

    /// Local randomness could not be drawn.
    #[error("Entropy source failure: {0}")]
    EntropySource(String),
}

impl KeyGenError {
    /// Shared classification of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            KeyGenError::InvalidKeySize { .. } => ErrorKind::Validation,
            KeyGenError::Network(_) | KeyGenError::Timeout { .. } => ErrorKind::Network,
            KeyGenError::Provider(_) => ErrorKind::Provider,
            KeyGenError::EntropySource(_) => ErrorKind::Unknown,
        }
    }
}
