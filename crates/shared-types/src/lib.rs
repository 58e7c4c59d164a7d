//! # Shared Types Crate
//!
//! This crate contains the data model spoken by every Quantum-Vault subsystem:
//! key descriptors, detection verdicts, transaction and ballot records, and the
//! progress notifications a pipeline run pushes to its caller.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: All cross-subsystem types are defined here.
//! - **One Threshold**: The interception bound (`QBER_THRESHOLD`) and the
//!   decision built on it live in [`security`] and nowhere else.
//! - **No Secrets in Logs**: `KeySecret` redacts itself in `Debug` output and
//!   zeroises its buffer on drop.

pub mod entities;
pub mod errors;
pub mod progress;
pub mod security;

pub use entities::*;
pub use errors::*;
pub use progress::*;
pub use security::*;
