//! # Symmetric Sealing
//!
//! XChaCha20-Poly1305 with associated data.
//!
//! ## Security Properties
//!
//! - **XChaCha20-Poly1305**: 192-bit nonce, constant-time ARX design
//! - **Random nonces**: safe with XChaCha20's nonce size, no counter state
//! - **Associated data**: callers bind the owning record id so a sealed blob
//!   cannot be replayed onto another record

use crate::CryptoError;
use chacha20poly1305::{
    aead::{Aead, KeyInit, Payload},
    XChaCha20Poly1305, XNonce,
};
use zeroize::Zeroize;

/// XChaCha20 nonce length in bytes.
pub const NONCE_LEN: usize = 24;

/// Secret key (256-bit).
#[derive(Clone, Zeroize)]
#[zeroize(drop)]
pub struct SecretKey([u8; 32]);

impl SecretKey {
    /// Create from bytes.
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Get inner bytes.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

/// Nonce for encryption.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Nonce([u8; NONCE_LEN]);

impl Nonce {
    /// Create from bytes.
    pub fn from_bytes(bytes: [u8; NONCE_LEN]) -> Self {
        Self(bytes)
    }

    /// Parse from a slice.
    ///
    /// # Errors
    ///
    /// Returns `CryptoError::InvalidNonceLength` unless the slice is 24 bytes.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, CryptoError> {
        let array: [u8; NONCE_LEN] =
            bytes
                .try_into()
                .map_err(|_| CryptoError::InvalidNonceLength {
                    expected: NONCE_LEN,
                    actual: bytes.len(),
                })?;
        Ok(Self(array))
    }

    /// Generate random nonce.
    pub fn generate() -> Self {
        let mut bytes = [0u8; NONCE_LEN];
        rand::RngCore::fill_bytes(&mut rand::rngs::OsRng, &mut bytes);
        Self(bytes)
    }

    /// Get inner bytes.
    pub fn as_bytes(&self) -> &[u8; NONCE_LEN] {
        &self.0
    }
}

/// Nonce plus ciphertext (tag appended).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SealedPayload {
    /// Nonce used for this payload.
    pub nonce: Nonce,
    /// Ciphertext with the Poly1305 tag.
    pub ciphertext: Vec<u8>,
}

impl SealedPayload {
    /// Rebuild from stored parts.
    ///
    /// # Errors
    ///
    /// Returns `CryptoError::InvalidNonceLength` for a malformed nonce.
    pub fn from_parts(nonce: &[u8], ciphertext: Vec<u8>) -> Result<Self, CryptoError> {
        Ok(Self {
            nonce: Nonce::from_slice(nonce)?,
            ciphertext,
        })
    }

    /// Total sealed size in bytes.
    pub fn len(&self) -> usize {
        NONCE_LEN + self.ciphertext.len()
    }

    /// Never true; a sealed payload always carries nonce and tag.
    pub fn is_empty(&self) -> bool {
        false
    }
}

/// Seal `plaintext` under `key`, binding `aad`.
///
/// # Errors
///
/// Returns `CryptoError::EncryptionFailed` if encryption fails.
pub fn seal(key: &SecretKey, plaintext: &[u8], aad: &[u8]) -> Result<SealedPayload, CryptoError> {
    let cipher = XChaCha20Poly1305::new(key.as_bytes().into());
    let nonce = Nonce::generate();

    let ciphertext = cipher
        .encrypt(
            XNonce::from_slice(nonce.as_bytes()),
            Payload {
                msg: plaintext,
                aad,
            },
        )
        .map_err(|e| CryptoError::EncryptionFailed(e.to_string()))?;

    Ok(SealedPayload { nonce, ciphertext })
}

/// Open a payload sealed with [`seal`].
///
/// # Errors
///
/// Returns `CryptoError::DecryptionFailed` on a wrong key, tampered
/// ciphertext or mismatched associated data.
pub fn open(key: &SecretKey, sealed: &SealedPayload, aad: &[u8]) -> Result<Vec<u8>, CryptoError> {
    let cipher = XChaCha20Poly1305::new(key.as_bytes().into());

    cipher
        .decrypt(
            XNonce::from_slice(sealed.nonce.as_bytes()),
            Payload {
                msg: &sealed.ciphertext,
                aad,
            },
        )
        .map_err(|e| CryptoError::DecryptionFailed(e.to_string()))
}
