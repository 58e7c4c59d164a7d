//! # QV-05 Transaction Pipeline
//!
//! Runs a payment or medical-record access behind a fresh quantum key.
//!
//! **Subsystem ID:** 5  
//! **Architecture:** Hexagonal (DDD + Ports/Adapters)
//!
//! ## Stages
//!
//! ```text
//! QUANTUM: INIT → KEY_GEN → EVE_CHECK ─┬─→ ABORT            (audit record, no key)
//!                                      └─→ ENCRYPT → PERSIST_RECORD → PERSIST_KEY → SYNC → DONE
//! NORMAL:  INIT → PERSIST_RECORD → SYNC → DONE                (no key)
//! any stage ──────────────────────────→ FAILED                (audit record, best effort)
//! ```
//!
//! ## Guarantees
//!
//! | Guarantee | Enforced by |
//! |-----------|-------------|
//! | Progress never decreases, one terminal step | `StepEmitter` |
//! | Record and key land together, record first | `VaultRepository::commit_transaction` |
//! | Intercepted runs persist no key | abort path writes an audit record only |
//! | Mirror trouble never fails a run | bounded `SYNC`, failures logged and counted |
//!
//! Validation failures are rejected before `INIT`: no step, no row.
//!
//! ## Module Structure
//!
//! ```text
//! qv-05-transaction-pipeline/
//! ├── domain/          # PipelineError, sealed operation payload
//! ├── ports/           # TransactionPipelineApi (inbound), collaborators (outbound)
//! ├── service.rs       # TransactionCoordinator
//! └── config.rs        # PipelineConfig
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod domain;
pub mod ports;
pub mod service;

// Re-exports
pub use config::PipelineConfig;
pub use domain::{open_payload, seal_payload, OperationPayload, PipelineError};
pub use ports::TransactionPipelineApi;
pub use service::TransactionCoordinator;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
