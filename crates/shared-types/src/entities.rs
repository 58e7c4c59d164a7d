//! # Core Domain Entities
//!
//! Defines the entities exchanged between the key, detection, storage and
//! coordinator subsystems.
//!
//! ## Clusters
//!
//! - **Keys**: `KeyMaterial`, `KeySecret`, `KeyProvider`
//! - **Detection**: `DetectionResult`
//! - **Transactions**: `TransactionRequest`, `TransactionRecord`
//! - **Ballots**: `Election`, `VoteRecord`, `VoteReceipt`

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use uuid::Uuid;
use zeroize::Zeroize;

use crate::errors::RequestError;
use crate::security::{format_qber_percent, is_intercepted};

// =============================================================================
// CLUSTER A: KEYS
// =============================================================================

/// Raw key bits.
///
/// Zeroised on drop, redacted in `Debug`, hex-encoded when serialised so the
/// local store can keep it. Never part of a remote DTO.
#[derive(Clone, PartialEq, Eq, Zeroize)]
#[zeroize(drop)]
pub struct KeySecret(Vec<u8>);

impl KeySecret {
    /// Wrap key bytes.
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    /// Borrow the key bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Number of key bytes.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True when no bytes are held.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for KeySecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "KeySecret([REDACTED; {} bytes])", self.0.len())
    }
}

impl Serialize for KeySecret {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&hex::encode(&self.0))
    }
}

impl<'de> Deserialize<'de> for KeySecret {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let encoded = String::deserialize(deserializer)?;
        hex::decode(encoded)
            .map(KeySecret)
            .map_err(serde::de::Error::custom)
    }
}

/// Where a key came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum KeyProvider {
    /// Local pseudorandom simulation of a QKD channel.
    Simulation,
    /// First external QKD provider.
    ProviderA,
    /// Second external QKD provider.
    ProviderB,
}

impl KeyProvider {
    /// Tag used in DTOs and metric labels.
    pub fn as_str(&self) -> &'static str {
        match self {
            KeyProvider::Simulation => "SIMULATION",
            KeyProvider::ProviderA => "PROVIDER_A",
            KeyProvider::ProviderB => "PROVIDER_B",
        }
    }

    /// True for genuine external providers.
    pub fn is_external(&self) -> bool {
        !matches!(self, KeyProvider::Simulation)
    }
}

impl fmt::Display for KeyProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A generated symmetric key and its quality metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyMaterial {
    /// Opaque identifier (`qk-<uuid>` for locally issued keys).
    pub key_id: String,
    /// Owning transaction or vote id; set by the coordinator before persisting.
    pub transaction_id: Option<String>,
    /// Requested key size in bits (> 0).
    pub size_bits: u32,
    /// Algorithm tag, e.g. `BB84-SIM`.
    pub algorithm: String,
    /// Issuing provider.
    pub provider: KeyProvider,
    /// Issue time.
    pub generated_at: DateTime<Utc>,
    /// Synthetic channel quality score in [0, 1].
    pub quantum_entropy: f64,
    /// True only when issued by a genuine external provider.
    pub is_real: bool,
    /// Key bits.
    pub secret: KeySecret,
}

impl KeyMaterial {
    /// Fresh locally issued key identifier.
    pub fn new_key_id() -> String {
        format!("qk-{}", Uuid::new_v4())
    }

    /// Attach the key to the record that owns it.
    pub fn bind_to(&mut self, owner_id: impl Into<String>) {
        self.transaction_id = Some(owner_id.into());
    }

    /// True when the key is bound to `owner_id`.
    pub fn is_bound_to(&self, owner_id: &str) -> bool {
        self.transaction_id.as_deref() == Some(owner_id)
    }
}

// =============================================================================
// CLUSTER B: DETECTION
// =============================================================================

/// Eavesdropper-detection verdict for one key exchange.
///
/// Transient: only `qber` and the verdict are copied onto persisted records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectionResult {
    /// Quantum bit error rate in [0, 1].
    pub qber: f64,
    /// `qber > QBER_THRESHOLD`.
    pub is_intercepted: bool,
    /// Human-readable verdict including the QBER percentage.
    pub message: String,
    /// Key size inspected.
    pub sample_bits: u32,
    /// `round(qber * sample_bits)`.
    pub estimated_error_bits: u64,
}

impl DetectionResult {
    /// Build a verdict from a raw QBER sample.
    ///
    /// The sample is clamped to [0, 1]; a non-finite sample is treated as a
    /// fully disturbed channel.
    pub fn from_qber(raw_qber: f64, sample_bits: u32) -> Self {
        let qber = if raw_qber.is_finite() {
            raw_qber.clamp(0.0, 1.0)
        } else {
            1.0
        };
        let intercepted = is_intercepted(qber);
        let message = if intercepted {
            format!(
                "Eavesdropper detected: QBER {} exceeds the 11% security bound",
                format_qber_percent(qber)
            )
        } else {
            format!(
                "Channel secure: QBER {} within the 11% security bound",
                format_qber_percent(qber)
            )
        };
        Self {
            qber,
            is_intercepted: intercepted,
            message,
            sample_bits,
            estimated_error_bits: (qber * f64::from(sample_bits)).round() as u64,
        }
    }
}

// =============================================================================
// CLUSTER C: TRANSACTIONS
// =============================================================================

/// Business scenario a transaction belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Scenario {
    /// Payment to a beneficiary.
    BankingPayment,
    /// Access to a patient's medical record.
    MedicalRecordAccess,
}

impl Scenario {
    /// Tag used in DTOs and logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            Scenario::BankingPayment => "BANKING_PAYMENT",
            Scenario::MedicalRecordAccess => "MEDICAL_RECORD_ACCESS",
        }
    }
}

/// Channel mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OperationMode {
    /// Classical channel; no key exchange.
    Normal,
    /// Quantum-key gated channel.
    Quantum,
}

impl OperationMode {
    /// Tag used in DTOs, logs and storage index keys.
    pub fn as_str(&self) -> &'static str {
        match self {
            OperationMode::Normal => "NORMAL",
            OperationMode::Quantum => "QUANTUM",
        }
    }
}

/// A request to run one secured operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionRequest {
    /// Business scenario.
    pub scenario: Scenario,
    /// Channel mode.
    pub mode: OperationMode,
    /// Authenticated user, supplied by the session layer.
    pub user_id: String,
    /// Payment amount, required iff `BankingPayment`.
    pub amount: Option<u64>,
    /// Payment beneficiary, required iff `BankingPayment`.
    pub beneficiary: Option<String>,
    /// Patient id, required iff `MedicalRecordAccess`.
    pub patient_id: Option<String>,
    /// Access justification, required iff `MedicalRecordAccess`.
    pub access_reason: Option<String>,
    /// Demo hook forcing an eavesdropper onto the channel.
    pub simulate_attack: bool,
}

impl TransactionRequest {
    /// Quantum-mode payment request.
    pub fn banking_payment(
        user_id: impl Into<String>,
        amount: u64,
        beneficiary: impl Into<String>,
    ) -> Self {
        Self {
            scenario: Scenario::BankingPayment,
            mode: OperationMode::Quantum,
            user_id: user_id.into(),
            amount: Some(amount),
            beneficiary: Some(beneficiary.into()),
            patient_id: None,
            access_reason: None,
            simulate_attack: false,
        }
    }

    /// Quantum-mode medical-record access request.
    pub fn medical_record_access(
        user_id: impl Into<String>,
        patient_id: impl Into<String>,
        access_reason: impl Into<String>,
    ) -> Self {
        Self {
            scenario: Scenario::MedicalRecordAccess,
            mode: OperationMode::Quantum,
            user_id: user_id.into(),
            amount: None,
            beneficiary: None,
            patient_id: Some(patient_id.into()),
            access_reason: Some(access_reason.into()),
            simulate_attack: false,
        }
    }

    /// Override the channel mode.
    pub fn with_mode(mut self, mode: OperationMode) -> Self {
        self.mode = mode;
        self
    }

    /// Force (or clear) a simulated eavesdropper.
    pub fn with_simulated_attack(mut self, simulate_attack: bool) -> Self {
        self.simulate_attack = simulate_attack;
        self
    }

    /// Check the fields the scenario requires.
    pub fn validate(&self) -> Result<(), RequestError> {
        if self.user_id.trim().is_empty() {
            return Err(RequestError::MissingField {
                field: "user_id",
                scenario: self.scenario.as_str(),
            });
        }

        match self.scenario {
            Scenario::BankingPayment => {
                let amount = self.amount.ok_or(RequestError::MissingField {
                    field: "amount",
                    scenario: self.scenario.as_str(),
                })?;
                if amount == 0 {
                    return Err(RequestError::InvalidField {
                        field: "amount",
                        reason: "must be greater than zero".to_string(),
                    });
                }
                require_text(&self.beneficiary, "beneficiary", self.scenario)?;
            }
            Scenario::MedicalRecordAccess => {
                require_text(&self.patient_id, "patient_id", self.scenario)?;
                require_text(&self.access_reason, "access_reason", self.scenario)?;
            }
        }
        Ok(())
    }
}

fn require_text(
    value: &Option<String>,
    field: &'static str,
    scenario: Scenario,
) -> Result<(), RequestError> {
    match value {
        None => Err(RequestError::MissingField {
            field,
            scenario: scenario.as_str(),
        }),
        Some(text) if text.trim().is_empty() => Err(RequestError::InvalidField {
            field,
            reason: "must not be blank".to_string(),
        }),
        Some(_) => Ok(()),
    }
}

/// Terminal outcome of a transaction run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionStatus {
    /// Committed on a clean channel.
    Success,
    /// Aborted after an interception; kept as an audit record.
    Aborted,
    /// Failed for a non-security reason.
    Failed,
}

impl TransactionStatus {
    /// Tag used in DTOs and logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionStatus::Success => "SUCCESS",
            TransactionStatus::Aborted => "ABORTED",
            TransactionStatus::Failed => "FAILED",
        }
    }
}

/// Persisted outcome of one transaction run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionRecord {
    /// Unique id, also the AEAD associated data for the sealed payload.
    pub transaction_id: String,
    /// Terminal status.
    pub status: TransactionStatus,
    /// True iff the run was aborted by the detector.
    pub intercepted: bool,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last modification time.
    pub last_updated: DateTime<Utc>,
    /// Requesting user.
    pub user_id: String,
    /// Business scenario.
    pub scenario: Scenario,
    /// Channel mode.
    pub mode: OperationMode,
    /// Payment amount.
    pub amount: Option<u64>,
    /// Payment beneficiary.
    pub beneficiary: Option<String>,
    /// Patient id.
    pub patient_id: Option<String>,
    /// Access justification.
    pub access_reason: Option<String>,
    /// Measured QBER (quantum mode only).
    pub qber: Option<f64>,
    /// Diagnostic message for `Failed` records.
    pub failure_reason: Option<String>,
    /// Operation payload sealed under the run's key (`Success` only).
    #[serde(default)]
    pub sealed_payload: Option<SealedEnvelope>,
}

impl TransactionRecord {
    /// Fresh transaction identifier.
    pub fn new_transaction_id() -> String {
        format!("tx-{}", Uuid::new_v4())
    }

    /// Build a terminal record for `request`.
    pub fn from_request(
        transaction_id: impl Into<String>,
        request: &TransactionRequest,
        status: TransactionStatus,
        intercepted: bool,
        qber: Option<f64>,
    ) -> Self {
        let now = Utc::now();
        Self {
            transaction_id: transaction_id.into(),
            status,
            intercepted,
            created_at: now,
            last_updated: now,
            user_id: request.user_id.clone(),
            scenario: request.scenario,
            mode: request.mode,
            amount: request.amount,
            beneficiary: request.beneficiary.clone(),
            patient_id: request.patient_id.clone(),
            access_reason: request.access_reason.clone(),
            qber,
            failure_reason: None,
            sealed_payload: None,
        }
    }

    /// Attach a diagnostic message.
    pub fn with_failure_reason(mut self, reason: impl Into<String>) -> Self {
        self.failure_reason = Some(reason.into());
        self
    }

    /// Attach the sealed operation payload.
    pub fn with_sealed_payload(mut self, sealed: SealedEnvelope) -> Self {
        self.sealed_payload = Some(sealed);
        self
    }

    /// Bump `last_updated`; the only mutation allowed after creation.
    pub fn touch(&mut self) {
        self.last_updated = Utc::now();
    }
}

// =============================================================================
// CLUSTER D: BALLOTS
// =============================================================================

/// One selectable option on an election.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElectionOption {
    /// Option identifier.
    pub option_id: String,
    /// Display label.
    pub label: String,
}

/// An election definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Election {
    /// Election identifier.
    pub election_id: String,
    /// Display title.
    pub title: String,
    /// Options a voter may choose from.
    pub options: Vec<ElectionOption>,
    /// Voting opens.
    pub opens_at: DateTime<Utc>,
    /// Voting closes.
    pub closes_at: DateTime<Utc>,
}

impl Election {
    /// True if `option_id` is on the ballot.
    pub fn has_option(&self, option_id: &str) -> bool {
        self.options.iter().any(|o| o.option_id == option_id)
    }

    /// True if `at` falls inside `[opens_at, closes_at)`.
    pub fn is_open_at(&self, at: DateTime<Utc>) -> bool {
        at >= self.opens_at && at < self.closes_at
    }
}

/// AEAD output stored with a ballot or a committed transaction.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SealedEnvelope {
    /// 24-byte XChaCha20 nonce.
    pub nonce: Vec<u8>,
    /// Ciphertext with Poly1305 tag.
    pub ciphertext: Vec<u8>,
}

impl fmt::Debug for SealedEnvelope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SealedEnvelope")
            .field("nonce", &hex::encode(&self.nonce))
            .field("ciphertext_len", &self.ciphertext.len())
            .finish()
    }
}

/// Persisted ballot. The chosen option only exists inside `sealed_ballot`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VoteRecord {
    /// Vote identifier.
    pub vote_id: String,
    /// Election the ballot belongs to.
    pub election_id: String,
    /// Key the ballot is sealed under.
    pub key_id: String,
    /// Voter-facing receipt token.
    pub receipt_token: String,
    /// Sealed ballot.
    pub sealed_ballot: SealedEnvelope,
    /// Cast time.
    pub created_at: DateTime<Utc>,
    /// Mirrors `KeyMaterial::is_real`.
    pub quantum_secured: bool,
    /// QBER measured when the key was exchanged.
    pub qber: f64,
}

impl VoteRecord {
    /// Fresh vote identifier.
    pub fn new_vote_id() -> String {
        format!("vote-{}", Uuid::new_v4())
    }

    /// Voter-facing receipt for this ballot.
    pub fn receipt(&self) -> VoteReceipt {
        VoteReceipt {
            vote_id: self.vote_id.clone(),
            election_id: self.election_id.clone(),
            receipt_token: self.receipt_token.clone(),
            created_at: self.created_at,
            quantum_secured: self.quantum_secured,
            key_id: self.key_id.clone(),
            qber: self.qber,
        }
    }
}

/// Receipt returned to a voter after a successful cast.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VoteReceipt {
    /// Vote identifier.
    pub vote_id: String,
    /// Election identifier.
    pub election_id: String,
    /// `#QV-` + 8 uppercase hex digits.
    pub receipt_token: String,
    /// Cast time.
    pub created_at: DateTime<Utc>,
    /// Mirrors `KeyMaterial::is_real`.
    pub quantum_secured: bool,
    /// Key the ballot is sealed under.
    pub key_id: String,
    /// QBER measured for the exchange.
    pub qber: f64,
}
