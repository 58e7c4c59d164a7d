//! # Domain Errors

use shared_types::ErrorKind;
use thiserror::Error;

/// Remote mirror errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MirrorError {
    /// Backend unreachable.
    #[error("Mirror unreachable: {0}")]
    Network(String),

    /// Backend did not answer in time.
    #[error("Mirror call timed out after {timeout_ms} ms")]
    Timeout {
        /// Deadline that elapsed
        timeout_ms: u64,
    },

    /// Backend answered with a non-success status.
    #[error("Mirror rejected {endpoint}: HTTP {status}")]
    Rejected {
        /// Endpoint path
        endpoint: &'static str,
        /// HTTP status code
        status: u16,
    },

    /// The value cannot be expressed as a DTO.
    #[error("Invalid mirror payload: {0}")]
    InvalidPayload(String),
}

impl MirrorError {
    /// Shared classification of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            MirrorError::Network(_) | MirrorError::Timeout { .. } => ErrorKind::Network,
            MirrorError::Rejected { .. } => ErrorKind::Provider,
            MirrorError::InvalidPayload(_) => ErrorKind::Unknown,
        }
    }
}
