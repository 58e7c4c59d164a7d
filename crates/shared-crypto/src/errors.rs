//! Crypto error types.

use thiserror::Error;

/// Cryptographic operation errors.
#[derive(Debug, Error)]
pub enum CryptoError {
    /// Encryption failed
    #[error("Encryption failed: {0}")]
    EncryptionFailed(String),

    /// Decryption failed (wrong key, tampered ciphertext or wrong associated data)
    #[error("Decryption failed: {0}")]
    DecryptionFailed(String),

    /// Invalid nonce length
    #[error("Invalid nonce length: expected {expected}, got {actual}")]
    InvalidNonceLength {
        /// Expected nonce length in bytes
        expected: usize,
        /// Actual nonce length in bytes
        actual: usize,
    },

    /// Key material too short to derive from
    #[error("Key material too short: need at least {min} bytes, got {actual}")]
    KeyMaterialTooShort {
        /// Minimum accepted length in bytes
        min: usize,
        /// Actual length in bytes
        actual: usize,
    },
}
