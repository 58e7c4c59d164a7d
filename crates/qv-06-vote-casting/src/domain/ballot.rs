//! # Ballot Sealing
//!
//! A ballot is sealed under a key derived from its own quantum key, with the
//! vote id as associated data. Receipt tokens come from the OS generator.

use rand::rngs::OsRng;
use rand::RngCore;
use serde::{Deserialize, Serialize};
use shared_crypto::{derive_key, open, seal, SealedPayload, BALLOT_CONTEXT};
use shared_types::{format_receipt_token, KeyMaterial, SealedEnvelope};

use super::errors::VoteError;

/// Plaintext ballot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ballot {
    /// Election voted in.
    pub election_id: String,
    /// Chosen option.
    pub option_id: String,
    /// Owning vote.
    pub vote_id: String,
}

/// Seal `ballot` under `key`.
pub fn seal_ballot(key: &KeyMaterial, ballot: &Ballot) -> Result<SealedEnvelope, VoteError> {
    let plaintext = serde_json::to_vec(ballot).map_err(|e| VoteError::Encoding(e.to_string()))?;
    let sealing_key = derive_key(key.secret.as_bytes(), BALLOT_CONTEXT)?;
    let sealed = seal(&sealing_key, &plaintext, ballot.vote_id.as_bytes())?;
    Ok(SealedEnvelope {
        nonce: sealed.nonce.as_bytes().to_vec(),
        ciphertext: sealed.ciphertext,
    })
}

/// Open the ballot of `vote_id`.
pub fn open_ballot(
    key: &KeyMaterial,
    vote_id: &str,
    sealed: &SealedEnvelope,
) -> Result<Ballot, VoteError> {
    let payload = SealedPayload::from_parts(&sealed.nonce, sealed.ciphertext.clone())?;
    let sealing_key = derive_key(key.secret.as_bytes(), BALLOT_CONTEXT)?;
    let plaintext = open(&sealing_key, &payload, vote_id.as_bytes())?;
    serde_json::from_slice(&plaintext).map_err(|e| VoteError::Encoding(e.to_string()))
}

/// Fresh `#QV-XXXXXXXX` token from 32 OS-random bits.
pub fn generate_receipt_token() -> String {
    format_receipt_token(OsRng.next_u32())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use shared_types::{is_valid_receipt_token, KeyProvider, KeySecret};

    fn key(fill: u8) -> KeyMaterial {
        KeyMaterial {
            key_id: "qk-v".to_string(),
            transaction_id: Some("vote-1".to_string()),
            size_bits: 256,
            algorithm: "BB84-SIM".to_string(),
            provider: KeyProvider::Simulation,
            generated_at: Utc::now(),
            quantum_entropy: 0.93,
            is_real: false,
            secret: KeySecret::from_bytes(vec![fill; 32]),
        }
    }

    fn ballot() -> Ballot {
        Ballot {
            election_id: "e-1".to_string(),
            option_id: "opt-b".to_string(),
            vote_id: "vote-1".to_string(),
        }
    }

    #[test]
    fn test_ballot_opens_with_its_key_only() {
        let sealed = seal_ballot(&key(3), &ballot()).unwrap();
        assert_eq!(sealed.nonce.len(), 24);
        assert_eq!(open_ballot(&key(3), "vote-1", &sealed).unwrap(), ballot());
        assert!(open_ballot(&key(4), "vote-1", &sealed).is_err());
        assert!(open_ballot(&key(3), "vote-2", &sealed).is_err());
    }

    #[test]
    fn test_truncated_nonce_rejected() {
        let mut sealed = seal_ballot(&key(3), &ballot()).unwrap();
        sealed.nonce.truncate(12);
        assert!(matches!(
            open_ballot(&key(3), "vote-1", &sealed),
            Err(VoteError::Crypto(_))
        ));
    }

    #[test]
    fn test_receipt_token_shape() {
        for _ in 0..64 {
            assert!(is_valid_receipt_token(&generate_receipt_token()));
        }
    }
}
