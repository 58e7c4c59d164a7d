//! # Key Derivation
//!
//! Derives purpose-bound sealing keys from exchanged key bits with BLAKE3's
//! `derive_key` mode.

use crate::symmetric::SecretKey;
use crate::CryptoError;

/// Minimum key material accepted for derivation (128 bits).
pub const MIN_KEY_MATERIAL_BYTES: usize = 16;

/// Context for ballot sealing keys.
pub const BALLOT_CONTEXT: &str = "quantum-vault 2024 ballot sealing v1";

/// Context for transaction payload sealing keys.
pub const PAYLOAD_CONTEXT: &str = "quantum-vault 2024 transaction payload sealing v1";

/// Context for key fingerprints.
const FINGERPRINT_CONTEXT: &str = "quantum-vault 2024 key fingerprint v1";

/// Derive a 256-bit sealing key from `material` under `context`.
///
/// # Errors
///
/// Returns `CryptoError::KeyMaterialTooShort` below 16 bytes of material.
pub fn derive_key(material: &[u8], context: &str) -> Result<SecretKey, CryptoError> {
    if material.len() < MIN_KEY_MATERIAL_BYTES {
        return Err(CryptoError::KeyMaterialTooShort {
            min: MIN_KEY_MATERIAL_BYTES,
            actual: material.len(),
        });
    }
    Ok(SecretKey::from_bytes(blake3::derive_key(context, material)))
}

/// Short, non-reversible identifier for key material, safe to log.
pub fn key_fingerprint(material: &[u8]) -> String {
    let digest = blake3::derive_key(FINGERPRINT_CONTEXT, material);
    hex::encode(&digest[..8])
}
