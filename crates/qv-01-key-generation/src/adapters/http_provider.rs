//! # HTTP QKD Provider
//!
//! Fetches keys from an external QKD provider over HTTP.
//!
//! ```text
//! POST {base_url}/keys
//! → {"transaction_id": "...", "size_bits": 256}
//! ← {"key_id": "...", "key_hex": "...", "algorithm": "...", "quantum_entropy": 0.97}
//! ```
//!
//! Connection failures and timeouts are network errors. Non-2xx answers and
//! malformed or inconsistent bodies are provider errors. No retry is done here.

use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use shared_types::{KeyMaterial, KeyProvider, KeySecret};
use tracing::{debug, warn};

use crate::domain::{key_bytes_for, KeyGenError};
use crate::ports::KeySource;

/// HTTP provider settings.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HttpProviderConfig {
    /// Provider base URL, without the `/keys` suffix.
    pub base_url: String,
    /// Provider tag stamped on issued keys.
    pub provider: KeyProvider,
    /// Whole-request timeout.
    pub request_timeout: Duration,
    /// TCP connect timeout.
    pub connect_timeout: Duration,
}

impl Default for HttpProviderConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8700".to_string(),
            provider: KeyProvider::ProviderA,
            request_timeout: Duration::from_secs(5),
            connect_timeout: Duration::from_secs(2),
        }
    }
}

#[derive(Serialize)]
struct KeyRequest<'a> {
    transaction_id: &'a str,
    size_bits: u32,
}

#[derive(Deserialize)]
struct KeyResponse {
    key_id: String,
    key_hex: String,
    algorithm: String,
    quantum_entropy: f64,
}

/// External QKD provider client.
pub struct HttpQkdProvider {
    client: Client,
    config: HttpProviderConfig,
}

impl HttpQkdProvider {
    /// Create a provider client.
    pub fn new(config: HttpProviderConfig) -> Result<Self, KeyGenError> {
        if !config.provider.is_external() {
            return Err(KeyGenError::Provider(format!(
                "{} is not an external provider",
                config.provider
            )));
        }

        let client = Client::builder()
            .timeout(config.request_timeout)
            .connect_timeout(config.connect_timeout)
            .build()
            .map_err(|e| KeyGenError::Provider(format!("HTTP client setup failed: {}", e)))?;

        Ok(Self { client, config })
    }

    fn endpoint(&self) -> String {
        format!("{}/keys", self.config.base_url.trim_end_matches('/'))
    }

    fn build_key(&self, body: KeyResponse, size_bits: u32) -> Result<KeyMaterial, KeyGenError> {
        if body.key_id.trim().is_empty() {
            return Err(KeyGenError::Provider("empty key_id".to_string()));
        }

        let bytes = hex::decode(&body.key_hex)
            .map_err(|e| KeyGenError::Provider(format!("key_hex is not hex: {}", e)))?;
        let secret = KeySecret::from_bytes(bytes);

        let expected = key_bytes_for(size_bits);
        if secret.len() != expected {
            return Err(KeyGenError::Provider(format!(
                "key length {} bytes, expected {} for {} bits",
                secret.len(),
                expected,
                size_bits
            )));
        }

        if !body.quantum_entropy.is_finite() || !(0.0..=1.0).contains(&body.quantum_entropy) {
            return Err(KeyGenError::Provider(format!(
                "quantum_entropy {} outside [0, 1]",
                body.quantum_entropy
            )));
        }

        Ok(KeyMaterial {
            key_id: body.key_id,
            transaction_id: None,
            size_bits,
            algorithm: body.algorithm,
            provider: self.config.provider,
            generated_at: Utc::now(),
            quantum_entropy: body.quantum_entropy,
            is_real: true,
            secret,
        })
    }
}

#[async_trait]
impl KeySource for HttpQkdProvider {
    async fn issue_key(
        &self,
        size_bits: u32,
        correlation_id: &str,
    ) -> Result<KeyMaterial, KeyGenError> {
        let url = self.endpoint();

        let response = self
            .client
            .post(&url)
            .json(&KeyRequest {
                transaction_id: correlation_id,
                size_bits,
            })
            .send()
            .await
            .map_err(|e| {
                if e.is_connect() {
                    KeyGenError::Network(format!("cannot connect to {}", url))
                } else if e.is_timeout() {
                    KeyGenError::Timeout {
                        timeout_ms: self.config.request_timeout.as_millis() as u64,
                    }
                } else {
                    KeyGenError::Network(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            warn!(%url, %status, correlation_id, "[qv-01] Provider rejected key request");
            return Err(KeyGenError::Provider(format!(
                "{} answered HTTP {}",
                url, status
            )));
        }

        let body: KeyResponse = response.json().await.map_err(|e| {
            if e.is_timeout() {
                KeyGenError::Timeout {
                    timeout_ms: self.config.request_timeout.as_millis() as u64,
                }
            } else {
                KeyGenError::Provider(format!("malformed key response: {}", e))
            }
        })?;

        let key = self.build_key(body, size_bits)?;
        debug!(
            correlation_id,
            key_id = %key.key_id,
            provider = %key.provider,
            "[qv-01] Provider key received"
        );
        Ok(key)
    }

    fn provider(&self) -> KeyProvider {
        self.config.provider
    }
}
