//! # Quantum-Vault Runtime
//!
//! Wires the subsystems together and drives them from the command line.
//!
//! ## Modular Structure
//!
//! - `container/` - Configuration and the subsystem container
//! - `cli` - Command definitions and their execution
//!
//! ## Startup Sequence
//!
//! 1. Load configuration from `QV_*` environment variables
//! 2. Initialize logging and metrics
//! 3. Build the container (store, key source, detector, mirror, coordinators)
//! 4. Reconcile the store (drop orphan keys left by an interrupted run)
//! 5. Execute the requested command
//!
//! ## Subsystems
//!
//! 1. Key Generation (qv-01) - simulated or provider-issued keys
//! 2. Eavesdropper Detection (qv-02) - QBER verdict
//! 3. Vault Storage (qv-03) - records, keys, ballots
//! 4. Remote Mirror (qv-04) - best-effort backend copy
//! 5. Transaction Pipeline (qv-05) - payments and record access
//! 6. Vote Casting (qv-06) - sealed ballots and receipts

pub mod cli;
pub mod container;

pub use cli::{Cli, Command};
pub use container::{ConfigError, ContainerError, KeySourceConfig, VaultConfig, VaultContainer};
