//! # Wire DTOs
//!
//! Shapes the remote backend accepts. Key bits never appear here.

use chrono::SecondsFormat;
use serde::{Deserialize, Serialize};
use shared_types::{KeyMaterial, TransactionRecord};

use super::errors::MirrorError;

/// Transaction row as the backend stores it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionDto {
    /// Transaction id.
    pub transaction_id: String,
    /// Requesting user.
    pub user_id: String,
    /// Payment amount; absent for record access.
    pub amount: Option<u64>,
    /// Scenario tag (`BANKING_PAYMENT` / `MEDICAL_RECORD_ACCESS`).
    #[serde(rename = "type")]
    pub kind: String,
    /// Status tag (`SUCCESS` / `ABORTED` / `FAILED`).
    pub status: String,
    /// True iff the run was aborted by the detector.
    pub interception_detected: bool,
    /// Payment beneficiary.
    pub beneficiary_name: Option<String>,
    /// Creation time, RFC 3339.
    pub created_at: String,
}

impl From<&TransactionRecord> for TransactionDto {
    fn from(record: &TransactionRecord) -> Self {
        Self {
            transaction_id: record.transaction_id.clone(),
            user_id: record.user_id.clone(),
            amount: record.amount,
            kind: record.scenario.as_str().to_string(),
            status: record.status.as_str().to_string(),
            interception_detected: record.intercepted,
            beneficiary_name: record.beneficiary.clone(),
            created_at: record.created_at.to_rfc3339_opts(SecondsFormat::Millis, true),
        }
    }
}

/// Key descriptor as the backend stores it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyMetadataDto {
    /// Key id.
    pub key_id: String,
    /// Owning transaction or ballot.
    pub transaction_id: String,
    /// Key size in bits.
    pub key_size: u32,
    /// Algorithm tag.
    pub algorithm: String,
    /// Provider tag.
    pub provider: String,
    /// Channel quality score.
    pub quantum_entropy: f64,
    /// True for genuine provider keys.
    pub is_real: bool,
    /// Issue time, RFC 3339.
    pub generated_at: String,
}

impl TryFrom<&KeyMaterial> for KeyMetadataDto {
    type Error = MirrorError;

    fn try_from(key: &KeyMaterial) -> Result<Self, Self::Error> {
        let owner = key.transaction_id.clone().ok_or_else(|| {
            MirrorError::InvalidPayload(format!("key {} has no owner", key.key_id))
        })?;
        Ok(Self {
            key_id: key.key_id.clone(),
            transaction_id: owner,
            key_size: key.size_bits,
            algorithm: key.algorithm.clone(),
            provider: key.provider.as_str().to_string(),
            quantum_entropy: key.quantum_entropy,
            is_real: key.is_real,
            generated_at: key.generated_at.to_rfc3339_opts(SecondsFormat::Millis, true),
        })
    }
}
