//! # QV-04 Remote Mirror
//!
//! Best-effort copy of committed records to a remote backend.
//!
//! **Subsystem ID:** 4  
//! **Architecture:** Hexagonal (DDD + Ports/Adapters)
//!
//! The local vault is authoritative. Mirror failures are reported to the
//! caller, which logs and drops them; nothing here retries or rolls back.
//!
//! ## Endpoints
//!
//! | Call | HTTP | Body |
//! |------|------|------|
//! | `create_transaction` | `POST {base}/transactions` | [`TransactionDto`] (camelCase) |
//! | `create_key_metadata` | `POST {base}/quantum_keys` | [`KeyMetadataDto`] (snake_case, no key bits) |
//!
//! ## Module Structure
//!
//! ```text
//! qv-04-remote-mirror/
//! ├── domain/          # DTOs, MirrorError
//! ├── ports/           # RemoteMirror (outbound)
//! ├── adapters/        # HTTP, in-memory and no-op mirrors
//! └── config.rs        # MirrorConfig
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod adapters;
pub mod config;
pub mod domain;
pub mod ports;

// Re-exports
pub use adapters::{HttpRemoteMirror, InMemoryRemoteMirror, MirrorBehavior, NoopRemoteMirror};
pub use config::MirrorConfig;
pub use domain::{KeyMetadataDto, MirrorError, TransactionDto};
pub use ports::RemoteMirror;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
