//! # Key Generation Service
//!
//! Validates the request, bounds the source call with a deadline and checks
//! the issued key before handing it to a coordinator.

use async_trait::async_trait;
use quantum_telemetry::{metric_inc, KEYS_GENERATED};
use shared_types::{KeyMaterial, KeyProvider};
use std::sync::Arc;
use tracing::{debug, warn};

use crate::adapters::SimulatedKeySource;
use crate::config::KeyGenConfig;
use crate::domain::{key_bytes_for, validate_key_size, KeyGenError};
use crate::ports::{KeyGenerationApi, KeySource};

/// Key Generation Service - issues keys through a pluggable source.
pub struct KeyGenerationService {
    /// Configuration.
    config: KeyGenConfig,
    /// Underlying key source.
    source: Arc<dyn KeySource>,
}

impl KeyGenerationService {
    /// Create a service over `source`.
    pub fn new(config: KeyGenConfig, source: Arc<dyn KeySource>) -> Self {
        Self { config, source }
    }

    /// Service over the local simulation.
    pub fn simulated(config: KeyGenConfig) -> Self {
        Self::new(config, Arc::new(SimulatedKeySource::new()))
    }

    /// Configuration in use.
    pub fn config(&self) -> &KeyGenConfig {
        &self.config
    }
}

#[async_trait]
impl KeyGenerationApi for KeyGenerationService {
    async fn generate_key(
        &self,
        size_bits: u32,
        correlation_id: &str,
    ) -> Result<KeyMaterial, KeyGenError> {
        validate_key_size(size_bits, self.config.max_key_size_bits)?;

        let deadline = self.config.provider_timeout();
        let key = match tokio::time::timeout(
            deadline,
            self.source.issue_key(size_bits, correlation_id),
        )
        .await
        {
            Ok(result) => result?,
            Err(_) => {
                warn!(
                    correlation_id,
                    provider = %self.source.provider(),
                    timeout_ms = self.config.provider_timeout_ms,
                    "[qv-01] Key source deadline elapsed"
                );
                return Err(KeyGenError::Timeout {
                    timeout_ms: self.config.provider_timeout_ms,
                });
            }
        };

        if key.secret.len() != key_bytes_for(size_bits) || key.size_bits != size_bits {
            return Err(KeyGenError::Provider(format!(
                "source returned {} bytes for a {}-bit request",
                key.secret.len(),
                size_bits
            )));
        }

        metric_inc!(KEYS_GENERATED, &[key.provider.as_str()]);
        debug!(
            correlation_id,
            key_id = %key.key_id,
            size_bits,
            entropy = key.quantum_entropy,
            "[qv-01] Key issued"
        );
        Ok(key)
    }

    fn provider(&self) -> KeyProvider {
        self.source.provider()
    }
}
