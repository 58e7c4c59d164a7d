//! # Domain Errors

use qv_01_key_generation::KeyGenError;
use qv_03_vault_storage::StoreError;
use shared_crypto::CryptoError;
use shared_types::{ErrorKind, RequestError};
use thiserror::Error;

/// Transaction pipeline errors.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Request rejected before any key work.
    #[error("Invalid request: {0}")]
    Validation(#[from] RequestError),

    /// Coordinator misconfigured.
    #[error("Invalid pipeline configuration: {0}")]
    InvalidConfig(String),

    /// Eavesdropper detected; the run was aborted.
    #[error("Security abort: {message}")]
    SecurityAbort {
        /// Measured QBER
        qber: f64,
        /// Detector verdict, including the QBER percentage
        message: String,
        /// False when the ABORTED audit record could not be written
        audit_stored: bool,
    },

    /// Key could not be obtained.
    #[error("Key generation failed: {0}")]
    KeyGeneration(#[from] KeyGenError),

    /// Local store refused the write.
    #[error("Storage failure: {0}")]
    Storage(#[from] StoreError),

    /// Payload could not be sealed or opened.
    #[error("Sealing failure: {0}")]
    Crypto(#[from] CryptoError),

    /// Payload could not be encoded.
    #[error("Payload encoding failure: {0}")]
    Encoding(String),
}

impl PipelineError {
    /// Shared classification of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            PipelineError::Validation(e) => e.kind(),
            PipelineError::InvalidConfig(_) => ErrorKind::Validation,
            PipelineError::SecurityAbort { .. } => ErrorKind::SecurityAbort,
            PipelineError::KeyGeneration(e) => e.kind(),
            PipelineError::Storage(e) => e.kind(),
            PipelineError::Crypto(_) | PipelineError::Encoding(_) => ErrorKind::Unknown,
        }
    }

    /// False only for an abort whose audit record was lost.
    pub fn audit_stored(&self) -> bool {
        !matches!(
            self,
            PipelineError::SecurityAbort {
                audit_stored: false,
                ..
            }
        )
    }

    /// QBER of an aborted run.
    pub fn qber(&self) -> Option<f64> {
        match self {
            PipelineError::SecurityAbort { qber, .. } => Some(*qber),
            _ => None,
        }
    }
}
