//! # Inbound Ports
//!
//! API trait the coordinators call to obtain keys.

use async_trait::async_trait;
use shared_types::{KeyMaterial, KeyProvider};

use crate::domain::KeyGenError;

/// Key Generation API - inbound port.
#[async_trait]
pub trait KeyGenerationApi: Send + Sync {
    /// Issue a key of `size_bits` bits.
    ///
    /// `correlation_id` is the transaction or vote the key is requested for;
    /// it is forwarded to external providers and used in logs. The returned
    /// key is not yet bound to it.
    async fn generate_key(
        &self,
        size_bits: u32,
        correlation_id: &str,
    ) -> Result<KeyMaterial, KeyGenError>;

    /// Provider tag of the underlying source.
    fn provider(&self) -> KeyProvider;
}
