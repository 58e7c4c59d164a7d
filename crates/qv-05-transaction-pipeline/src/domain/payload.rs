//! # Operation Payload
//!
//! The instruction a run carries (payment or record access), sealed under a
//! key derived from the run's quantum key. The transaction id is the
//! associated data, so a sealed payload cannot be replayed under another run.

use serde::{Deserialize, Serialize};
use shared_crypto::{derive_key, open, seal, SealedPayload, PAYLOAD_CONTEXT};
use shared_types::{KeyMaterial, Scenario, SealedEnvelope, TransactionRequest};

use super::errors::PipelineError;

/// Plaintext instruction of one run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OperationPayload {
    /// Owning transaction.
    pub transaction_id: String,
    /// Business scenario.
    pub scenario: Scenario,
    /// Requesting user.
    pub user_id: String,
    /// Payment amount.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<u64>,
    /// Payment beneficiary.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub beneficiary: Option<String>,
    /// Patient whose record is accessed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub patient_id: Option<String>,
    /// Stated reason for the access.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub access_reason: Option<String>,
}

impl OperationPayload {
    /// Payload for `request` under `transaction_id`.
    pub fn from_request(transaction_id: impl Into<String>, request: &TransactionRequest) -> Self {
        Self {
            transaction_id: transaction_id.into(),
            scenario: request.scenario,
            user_id: request.user_id.clone(),
            amount: request.amount,
            beneficiary: request.beneficiary.clone(),
            patient_id: request.patient_id.clone(),
            access_reason: request.access_reason.clone(),
        }
    }
}

/// Seal `payload` under `key`.
pub fn seal_payload(
    key: &KeyMaterial,
    payload: &OperationPayload,
) -> Result<SealedEnvelope, PipelineError> {
    let plaintext =
        serde_json::to_vec(payload).map_err(|e| PipelineError::Encoding(e.to_string()))?;
    let sealing_key = derive_key(key.secret.as_bytes(), PAYLOAD_CONTEXT)?;
    let sealed = seal(
        &sealing_key,
        &plaintext,
        payload.transaction_id.as_bytes(),
    )?;
    Ok(SealedEnvelope {
        nonce: sealed.nonce.as_bytes().to_vec(),
        ciphertext: sealed.ciphertext,
    })
}

/// Open a payload sealed for `transaction_id`.
pub fn open_payload(
    key: &KeyMaterial,
    transaction_id: &str,
    sealed: &SealedEnvelope,
) -> Result<OperationPayload, PipelineError> {
    let sealed = SealedPayload::from_parts(&sealed.nonce, sealed.ciphertext.clone())?;
    let sealing_key = derive_key(key.secret.as_bytes(), PAYLOAD_CONTEXT)?;
    let plaintext = open(&sealing_key, &sealed, transaction_id.as_bytes())?;
    serde_json::from_slice(&plaintext).map_err(|e| PipelineError::Encoding(e.to_string()))
}
