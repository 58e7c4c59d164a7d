//! # Simulated Key Source
//!
//! Stands in for a QKD link: key bits come from the operating system's CSPRNG
//! and the channel quality score is drawn from a healthy-link range.

use async_trait::async_trait;
use chrono::Utc;
use rand::rngs::OsRng;
use rand::{Rng, RngCore};
use shared_types::{KeyMaterial, KeyProvider, KeySecret};
use tracing::debug;

use crate::domain::{key_bytes_for, KeyGenError, SIMULATION_ALGORITHM, SIMULATION_ENTROPY_RANGE};
use crate::ports::KeySource;

/// Local simulation of a QKD key exchange.
#[derive(Debug, Default, Clone, Copy)]
pub struct SimulatedKeySource;

impl SimulatedKeySource {
    /// Create a simulated source.
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl KeySource for SimulatedKeySource {
    async fn issue_key(
        &self,
        size_bits: u32,
        correlation_id: &str,
    ) -> Result<KeyMaterial, KeyGenError> {
        let mut bytes = vec![0u8; key_bytes_for(size_bits)];
        OsRng
            .try_fill_bytes(&mut bytes)
            .map_err(|e| KeyGenError::EntropySource(e.to_string()))?;

        // Clear the unused high bits of a partial last byte.
        let tail_bits = size_bits % 8;
        if tail_bits != 0 {
            if let Some(last) = bytes.last_mut() {
                *last &= (1u8 << tail_bits) - 1;
            }
        }

        let entropy = OsRng.gen_range(SIMULATION_ENTROPY_RANGE);

        debug!(
            correlation_id,
            size_bits,
            entropy,
            "[qv-01] Simulated key exchange completed"
        );

        Ok(KeyMaterial {
            key_id: KeyMaterial::new_key_id(),
            transaction_id: None,
            size_bits,
            algorithm: SIMULATION_ALGORITHM.to_string(),
            provider: KeyProvider::Simulation,
            generated_at: Utc::now(),
            quantum_entropy: entropy,
            is_real: false,
            secret: KeySecret::from_bytes(bytes),
        })
    }

    fn provider(&self) -> KeyProvider {
        KeyProvider::Simulation
    }
}
