//! # QV-03 Vault Storage
//!
//! The authoritative local store for transaction records, keys, ballots and
//! election definitions.
//!
//! **Subsystem ID:** 3  
//! **Architecture:** Hexagonal (DDD + Ports/Adapters)
//!
//! ## Domain Invariants
//!
//! | ID | Invariant | Description |
//! |----|-----------|-------------|
//! | 1 | Atomic Commit | A record and its key are written in one batch, record first |
//! | 2 | Key Ownership | A key row names the record or ballot that owns it |
//! | 3 | Success Only | Keys are only stored for successful records and cast ballots |
//! | 4 | Immutable Records | A stored record or ballot is never overwritten |
//! | 5 | Unique Receipts | A receipt token maps to exactly one ballot |
//!
//! ## Key Layout
//!
//! ```text
//! tx/{transaction_id}                         → TransactionRecord
//! mode/{MODE}/{created_micros}/{transaction_id} → transaction_id
//! key/{key_id}                                → KeyMaterial
//! txkey/{owner_id}/{key_id}                   → key_id
//! vote/{vote_id}                              → VoteRecord
//! receipt/{receipt_token}                     → vote_id
//! election/{election_id}                      → Election
//! ```
//!
//! Values are `bincode`-encoded.
//!
//! ## Module Structure
//!
//! ```text
//! qv-03-vault-storage/
//! ├── domain/          # StoreError, key layout, reconcile report
//! ├── ports/           # VaultRepository (inbound) + KeyValueStore (outbound)
//! ├── adapters/        # In-memory and file-backed key-value stores
//! ├── service.rs       # VaultStore
//! └── config.rs        # StorageConfig
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod adapters;
pub mod config;
pub mod domain;
pub mod ports;
pub mod service;

// Re-exports
pub use adapters::{FileBackedKVStore, InMemoryKVStore};
pub use config::StorageConfig;
pub use domain::{KVStoreError, KeyPrefix, ReconcileReport, StoreError};
pub use ports::{BatchOperation, FaultyKVStore, KeyValueStore, ScanResult, VaultRepository};
pub use service::VaultStore;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
