//! # Outbound Ports
//!
//! Traits for key sources (local simulation, external QKD providers).

use async_trait::async_trait;
use chrono::Utc;
use shared_types::{KeyMaterial, KeyProvider, KeySecret};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use crate::domain::{key_bytes_for, KeyGenError};

/// Key source - outbound port.
///
/// Implementations perform exactly one attempt per call; retry and deadline
/// policy belong to the caller.
#[async_trait]
pub trait KeySource: Send + Sync {
    /// Produce a key of `size_bits` bits.
    async fn issue_key(
        &self,
        size_bits: u32,
        correlation_id: &str,
    ) -> Result<KeyMaterial, KeyGenError>;

    /// Provider tag stamped on issued keys.
    fn provider(&self) -> KeyProvider;
}

// =============================================================================
// Mock Implementations for Testing
// =============================================================================

/// Mock key source for testing.
pub struct MockKeySource {
    /// Entropy stamped on every key.
    pub entropy: f64,
    /// Provider tag.
    pub provider: KeyProvider,
    /// Value of `is_real` on issued keys.
    pub is_real: bool,
    /// Error returned instead of a key, if set.
    pub failure: Option<KeyGenError>,
    /// Artificial latency before answering.
    pub delay: Option<Duration>,
    calls: AtomicUsize,
}

impl Default for MockKeySource {
    fn default() -> Self {
        Self {
            entropy: 0.95,
            provider: KeyProvider::Simulation,
            is_real: false,
            failure: None,
            delay: None,
            calls: AtomicUsize::new(0),
        }
    }
}

impl MockKeySource {
    /// Mock answering with a fixed entropy.
    pub fn with_entropy(entropy: f64) -> Self {
        Self {
            entropy,
            ..Self::default()
        }
    }

    /// Mock that always fails with `error`.
    pub fn failing(error: KeyGenError) -> Self {
        Self {
            failure: Some(error),
            ..Self::default()
        }
    }

    /// Mock that sleeps for `delay` before answering.
    pub fn slow(delay: Duration) -> Self {
        Self {
            delay: Some(delay),
            ..Self::default()
        }
    }

    /// Mock posing as a genuine external provider.
    pub fn external(provider: KeyProvider) -> Self {
        Self {
            provider,
            is_real: true,
            ..Self::default()
        }
    }

    /// Number of `issue_key` calls so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl KeySource for MockKeySource {
    async fn issue_key(
        &self,
        size_bits: u32,
        correlation_id: &str,
    ) -> Result<KeyMaterial, KeyGenError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if let Some(error) = &self.failure {
            return Err(error.clone());
        }

        let fill = correlation_id.bytes().fold(0x5Au8, |acc, b| acc ^ b);
        Ok(KeyMaterial {
            key_id: KeyMaterial::new_key_id(),
            transaction_id: None,
            size_bits,
            algorithm: "MOCK".to_string(),
            provider: self.provider,
            generated_at: Utc::now(),
            quantum_entropy: self.entropy,
            is_real: self.is_real,
            secret: KeySecret::from_bytes(vec![fill; key_bytes_for(size_bits)]),
        })
    }

    fn provider(&self) -> KeyProvider {
        self.provider
    }
}
