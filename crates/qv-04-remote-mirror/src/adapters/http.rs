//! # HTTP Remote Mirror
//!
//! ```text
//! POST {base_url}/transactions   ← TransactionDto
//! POST {base_url}/quantum_keys   ← KeyMetadataDto
//! ```
//!
//! Any 2xx counts as accepted; the response body is ignored.

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use tracing::{debug, warn};

use crate::config::MirrorConfig;
use crate::domain::{KeyMetadataDto, MirrorError, TransactionDto};
use crate::ports::RemoteMirror;

const TRANSACTIONS_PATH: &str = "/transactions";
const KEYS_PATH: &str = "/quantum_keys";

/// Remote mirror speaking JSON over HTTP.
pub struct HttpRemoteMirror {
    client: Client,
    base_url: String,
    timeout_ms: u64,
}

impl HttpRemoteMirror {
    /// Create a mirror client for `base_url`.
    pub fn new(base_url: impl Into<String>, config: &MirrorConfig) -> Result<Self, MirrorError> {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        if base_url.is_empty() {
            return Err(MirrorError::InvalidPayload("empty base URL".to_string()));
        }

        let client = Client::builder()
            .timeout(config.request_timeout())
            .connect_timeout(config.connect_timeout())
            .build()
            .map_err(|e| MirrorError::Network(format!("HTTP client setup failed: {}", e)))?;

        Ok(Self {
            client,
            base_url,
            timeout_ms: config.request_timeout_ms,
        })
    }

    /// Base URL without trailing slash.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn post<T: Serialize + Sync>(
        &self,
        path: &'static str,
        body: &T,
    ) -> Result<(), MirrorError> {
        let url = format!("{}{}", self.base_url, path);

        let response = self
            .client
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    MirrorError::Timeout {
                        timeout_ms: self.timeout_ms,
                    }
                } else {
                    MirrorError::Network(format!("{}: {}", url, e))
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            warn!(%url, %status, "[qv-04] Mirror rejected row");
            return Err(MirrorError::Rejected {
                endpoint: path,
                status: status.as_u16(),
            });
        }

        debug!(%url, "[qv-04] Row mirrored");
        Ok(())
    }
}

#[async_trait]
impl RemoteMirror for HttpRemoteMirror {
    async fn create_transaction(&self, dto: &TransactionDto) -> Result<(), MirrorError> {
        self.post(TRANSACTIONS_PATH, dto).await
    }

    async fn create_key_metadata(&self, dto: &KeyMetadataDto) -> Result<(), MirrorError> {
        self.post(KEYS_PATH, dto).await
    }

    fn name(&self) -> &'static str {
        "http"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::test_server::{serve_silently, serve_status};
    use axum::http::{Method, StatusCode};
    use shared_types::{ErrorKind, TransactionRecord, TransactionRequest, TransactionStatus};

    fn dto() -> TransactionDto {
        let request = TransactionRequest::banking_payment("user-7", 90, "Bob");
        TransactionDto::from(&TransactionRecord::from_request(
            "tx-7",
            &request,
            TransactionStatus::Success,
            false,
            Some(0.01),
        ))
    }

    fn key_dto() -> KeyMetadataDto {
        KeyMetadataDto {
            key_id: "qk-7".to_string(),
            transaction_id: "tx-7".to_string(),
            key_size: 256,
            algorithm: "BB84-SIM".to_string(),
            provider: "SIMULATION".to_string(),
            quantum_entropy: 0.95,
            is_real: false,
            generated_at: "2024-01-01T00:00:00.000Z".to_string(),
        }
    }

    #[tokio::test]
    async fn test_posts_both_rows() {
        let (base, mut requests) = serve_status(StatusCode::CREATED).await;
        let mirror = HttpRemoteMirror::new(format!("{}/", base), &MirrorConfig::for_testing())
            .unwrap();

        mirror.create_transaction(&dto()).await.unwrap();
        mirror.create_key_metadata(&key_dto()).await.unwrap();

        let first = requests.recv().await.unwrap();
        assert_eq!(first.method, Method::POST);
        assert_eq!(first.path, "/transactions");
        assert!(first.body.contains(r#""transactionId":"tx-7""#));

        let second = requests.recv().await.unwrap();
        assert_eq!(second.path, "/quantum_keys");
        assert!(second.body.contains(r#""key_id":"qk-7""#));
    }

    #[tokio::test]
    async fn test_server_error_is_rejected() {
        let (base, _requests) = serve_status(StatusCode::INTERNAL_SERVER_ERROR).await;
        let mirror = HttpRemoteMirror::new(base, &MirrorConfig::for_testing()).unwrap();

        let err = mirror.create_transaction(&dto()).await.unwrap_err();
        assert_eq!(
            err,
            MirrorError::Rejected {
                endpoint: "/transactions",
                status: 500
            }
        );
        assert_eq!(err.kind(), ErrorKind::Provider);
    }

    #[tokio::test]
    async fn test_silent_backend_is_network_error() {
        let base = serve_silently().await;
        let mirror = HttpRemoteMirror::new(base, &MirrorConfig::for_testing()).unwrap();

        let err = mirror.create_key_metadata(&key_dto()).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Network);
    }

    #[test]
    fn test_empty_base_url_rejected() {
        assert!(HttpRemoteMirror::new("", &MirrorConfig::default()).is_err());
    }
}
