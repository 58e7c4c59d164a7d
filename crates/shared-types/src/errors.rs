//! # Error Types
//!
//! Defines the error taxonomy used across subsystems. Each subsystem keeps its
//! own `thiserror` enum and classifies it into an [`ErrorKind`] through a
//! `kind()` method, so coordinators can decide what to persist and what to
//! report without matching on foreign variants.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Coarse error classes shared by every pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorKind {
    /// Malformed or incomplete request; rejected before any key work.
    Validation,
    /// External endpoint unreachable or timed out.
    Network,
    /// External endpoint answered with something unusable.
    Provider,
    /// Eavesdropper detected (QBER over threshold).
    SecurityAbort,
    /// Anything else; the original message is preserved.
    Unknown,
}

impl ErrorKind {
    /// Upper-case tag used in logs and metrics labels.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Validation => "VALIDATION",
            ErrorKind::Network => "NETWORK",
            ErrorKind::Provider => "PROVIDER",
            ErrorKind::SecurityAbort => "SECURITY_ABORT",
            ErrorKind::Unknown => "UNKNOWN",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Request validation failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RequestError {
    /// A field required by the scenario is absent.
    #[error("Missing required field `{field}` for {scenario}")]
    MissingField {
        /// Field name
        field: &'static str,
        /// Scenario tag
        scenario: &'static str,
    },

    /// A field is present but unusable.
    #[error("Invalid field `{field}`: {reason}")]
    InvalidField {
        /// Field name
        field: &'static str,
        /// Why it was rejected
        reason: String,
    },
}

impl RequestError {
    /// Always [`ErrorKind::Validation`].
    pub fn kind(&self) -> ErrorKind {
        ErrorKind::Validation
    }
}
