//! # QV-01 Key Generation
//!
//! Issues the symmetric keys that gate every sensitive operation.
//!
//! **Subsystem ID:** 1  
//! **Architecture:** Hexagonal (DDD + Ports/Adapters)
//!
//! ## Purpose
//!
//! Produce a [`KeyMaterial`](shared_types::KeyMaterial) of the requested size
//! together with a channel quality score (`quantum_entropy`) that the
//! eavesdropper detector consumes. Generation is pure: nothing is persisted
//! here.
//!
//! ## Key Sources
//!
//! | Source | Provider | `is_real` | Notes |
//! |--------|----------|-----------|-------|
//! | [`SimulatedKeySource`] | `SIMULATION` | false | OS randomness, entropy in [0.90, 0.99] |
//! | [`HttpQkdProvider`] | `PROVIDER_A` / `PROVIDER_B` | true | `POST {base}/keys`, no internal retry |
//! | [`MockKeySource`] | configurable | configurable | tests |
//!
//! ## Module Structure
//!
//! ```text
//! qv-01-key-generation/
//! ├── domain/          # KeyGenError, size bounds, algorithm tags
//! ├── ports/           # KeyGenerationApi (inbound) + KeySource (outbound)
//! ├── adapters/        # Simulated and HTTP key sources
//! ├── application/     # KeyGenerationService (validation + timeout)
//! └── config.rs        # KeyGenConfig
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;

// Re-exports
pub use adapters::{HttpProviderConfig, HttpQkdProvider, SimulatedKeySource};
pub use application::KeyGenerationService;
pub use config::KeyGenConfig;
pub use domain::{
    key_bytes_for, validate_key_size, KeyGenError, MAX_KEY_SIZE_BITS, SIMULATION_ALGORITHM,
    SIMULATION_ENTROPY_RANGE,
};
pub use ports::{KeyGenerationApi, KeySource, MockKeySource};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
