//! # Shared Crypto - Key Derivation and Sealing
//!
//! **Status:** Production-Ready
//!
//! ## Components
//!
//! | Module | Algorithm | Use Case |
//! |--------|-----------|----------|
//! | `kdf` | BLAKE3 `derive_key` | Per-purpose sealing keys from QKD key bits |
//! | `symmetric` | XChaCha20-Poly1305 | Sealing ballots and operation payloads |
//!
//! ## Security Properties
//!
//! - **Domain separation**: every sealing key is derived with a context string,
//!   so one exchanged key never encrypts two kinds of payload with the same bits
//! - **XChaCha20**: 192-bit random nonce, constant-time, side-channel immune
//! - **Associated data**: the owning record id is bound into the tag

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod errors;
pub mod kdf;
pub mod symmetric;

// Re-exports
pub use errors::CryptoError;
pub use kdf::{derive_key, key_fingerprint, BALLOT_CONTEXT, PAYLOAD_CONTEXT};
pub use symmetric::{open, seal, Nonce, SealedPayload, SecretKey};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
