//! # Domain Errors
//!
//! Error types for vault storage.

use shared_types::ErrorKind;
use thiserror::Error;

/// Key-value backend errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KVStoreError {
    /// I/O error during read/write.
    #[error("KV store I/O error: {message}")]
    Io {
        /// Underlying error text
        message: String,
    },

    /// Data corruption in the store.
    #[error("KV store corruption: {message}")]
    Corruption {
        /// What was found
        message: String,
    },
}

/// Vault storage errors.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StoreError {
    /// Backend failure.
    #[error("Storage backend error: {0}")]
    Backend(#[from] KVStoreError),

    /// A stored value could not be encoded or decoded.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// A write would break an ownership or uniqueness rule.
    #[error("Integrity violation: {0}")]
    Integrity(String),
}

impl StoreError {
    /// Shared classification; storage failures are always `Unknown`.
    pub fn kind(&self) -> ErrorKind {
        ErrorKind::Unknown
    }
}

impl From<bincode::Error> for StoreError {
    fn from(err: bincode::Error) -> Self {
        StoreError::Serialization(err.to_string())
    }
}
