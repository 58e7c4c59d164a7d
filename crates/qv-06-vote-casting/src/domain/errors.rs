//! # Domain Errors

use qv_01_key_generation::KeyGenError;
use qv_03_vault_storage::StoreError;
use shared_crypto::CryptoError;
use shared_types::ErrorKind;
use thiserror::Error;

/// Vote casting errors.
#[derive(Debug, Error)]
pub enum VoteError {
    /// Ballot or election definition rejected.
    #[error("Invalid vote: {0}")]
    Validation(String),

    /// No such election.
    #[error("Unknown election: {0}")]
    UnknownElection(String),

    /// Coordinator misconfigured.
    #[error("Invalid vote configuration: {0}")]
    InvalidConfig(String),

    /// Eavesdropper detected; nothing was stored.
    #[error("Security abort: {message}")]
    SecurityAbort {
        /// Measured QBER
        qber: f64,
        /// Detector verdict, including the QBER percentage
        message: String,
    },

    /// Key could not be obtained.
    #[error("Key generation failed: {0}")]
    KeyGeneration(#[from] KeyGenError),

    /// Local store refused the write.
    #[error("Storage failure: {0}")]
    Storage(#[from] StoreError),

    /// Ballot could not be sealed or opened.
    #[error("Sealing failure: {0}")]
    Crypto(#[from] CryptoError),

    /// Ballot could not be encoded.
    #[error("Ballot encoding failure: {0}")]
    Encoding(String),
}

impl VoteError {
    /// Shared classification of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            VoteError::Validation(_) | VoteError::UnknownElection(_) | VoteError::InvalidConfig(_) => {
                ErrorKind::Validation
            }
            VoteError::SecurityAbort { .. } => ErrorKind::SecurityAbort,
            VoteError::KeyGeneration(e) => e.kind(),
            VoteError::Storage(e) => e.kind(),
            VoteError::Crypto(_) | VoteError::Encoding(_) => ErrorKind::Unknown,
        }
    }
}
