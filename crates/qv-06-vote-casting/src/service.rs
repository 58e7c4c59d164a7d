//! # Vote Coordinator
//!
//! Single-shot pipeline: a ballot is either sealed and committed together with
//! its key, or nothing is written at all.

use async_trait::async_trait;
use chrono::Utc;
use quantum_telemetry::{metric_inc, time_pipeline, INTERCEPTIONS, PIPELINE_RUNS, VOTES_CAST};
use qv_01_key_generation::KeyGenerationApi;
use qv_02_eve_detection::EveDetectionApi;
use qv_03_vault_storage::{StoreError, VaultRepository};
use shared_types::{
    is_valid_receipt_token, Election, NullSink, PipelineStage, ProgressSink, StepEmitter,
    VoteReceipt, VoteRecord,
};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

use crate::config::VoteConfig;
use crate::domain::{
    check_ballot, generate_receipt_token, open_ballot, seal_ballot, validate_election, Ballot,
    ElectionTally, VoteError,
};
use crate::ports::VoteCastingApi;

const PIPELINE: &str = "vote";

/// Vote Coordinator - key-gated ballot casting.
pub struct VoteCoordinator {
    keys: Arc<dyn KeyGenerationApi>,
    detector: Arc<dyn EveDetectionApi>,
    store: Arc<dyn VaultRepository>,
    config: VoteConfig,
}

impl VoteCoordinator {
    /// Create a coordinator over its collaborators.
    pub fn new(
        keys: Arc<dyn KeyGenerationApi>,
        detector: Arc<dyn EveDetectionApi>,
        store: Arc<dyn VaultRepository>,
        config: VoteConfig,
    ) -> Result<Self, VoteError> {
        config.validate()?;
        Ok(Self {
            keys,
            detector,
            store,
            config,
        })
    }

    /// Number of committed ballots.
    pub async fn vote_count(&self) -> Result<usize, VoteError> {
        Ok(self.store.vote_count().await?)
    }

    async fn load_election(&self, election_id: &str) -> Result<Election, VoteError> {
        self.store
            .get_election(election_id)
            .await?
            .ok_or_else(|| VoteError::UnknownElection(election_id.to_string()))
    }

    async fn unused_receipt_token(&self) -> Result<String, VoteError> {
        for _ in 0..self.config.receipt_attempts {
            let token = generate_receipt_token();
            if self.store.find_vote_by_receipt(&token).await?.is_none() {
                return Ok(token);
            }
            debug!("[qv-06] Receipt token collision, drawing again");
        }
        Err(VoteError::Storage(StoreError::Integrity(format!(
            "no unused receipt token after {} attempts",
            self.config.receipt_attempts
        ))))
    }

    async fn run(
        &self,
        vote_id: &str,
        election: &Election,
        option_id: &str,
        simulate_eve: bool,
        emitter: &mut StepEmitter<'_>,
    ) -> Result<VoteReceipt, VoteError> {
        emitter.emit(
            PipelineStage::KeyGen,
            format!("Requesting a {}-bit ballot key", self.config.key_size_bits),
        );
        let mut key = self
            .keys
            .generate_key(self.config.key_size_bits, vote_id)
            .await?;

        emitter.emit(
            PipelineStage::EveCheck,
            format!("Key {} issued (entropy {:.3})", key.key_id, key.quantum_entropy),
        );
        let detection = self
            .detector
            .detect(key.quantum_entropy, key.size_bits, simulate_eve);
        if detection.is_intercepted {
            metric_inc!(INTERCEPTIONS, &[PIPELINE]);
            warn!(
                vote_id,
                election_id = %election.election_id,
                qber = detection.qber,
                "[qv-06] Ballot discarded: {}",
                detection.message
            );
            emitter.emit(PipelineStage::Abort, detection.message.clone());
            return Err(VoteError::SecurityAbort {
                qber: detection.qber,
                message: detection.message,
            });
        }

        key.bind_to(vote_id);
        let ballot = Ballot {
            election_id: election.election_id.clone(),
            option_id: option_id.to_string(),
            vote_id: vote_id.to_string(),
        };
        let sealed_ballot = seal_ballot(&key, &ballot)?;
        emitter.emit(
            PipelineStage::Encrypt,
            format!("Ballot sealed ({} bytes)", sealed_ballot.ciphertext.len()),
        );

        let vote = VoteRecord {
            vote_id: vote_id.to_string(),
            election_id: election.election_id.clone(),
            key_id: key.key_id.clone(),
            receipt_token: self.unused_receipt_token().await?,
            sealed_ballot,
            created_at: Utc::now(),
            quantum_secured: key.is_real,
            qber: detection.qber,
        };
        self.store.commit_vote(&vote, &key).await?;
        emitter.emit(PipelineStage::PersistRecord, format!("Ballot {} committed", vote_id));
        emitter.emit(PipelineStage::PersistKey, format!("Key {} committed", key.key_id));

        emitter.emit(PipelineStage::Done, vote.receipt_token.clone());
        Ok(vote.receipt())
    }
}

#[async_trait]
impl VoteCastingApi for VoteCoordinator {
    async fn cast_vote(
        &self,
        election_id: &str,
        option_id: &str,
        simulate_eve: bool,
    ) -> Result<VoteReceipt, VoteError> {
        self.cast_vote_observed(election_id, option_id, simulate_eve, &mut NullSink)
            .await
    }

    async fn cast_vote_observed(
        &self,
        election_id: &str,
        option_id: &str,
        simulate_eve: bool,
        sink: &mut dyn ProgressSink,
    ) -> Result<VoteReceipt, VoteError> {
        let election = match self.load_election(election_id).await {
            Ok(election) => election,
            Err(e) => {
                metric_inc!(PIPELINE_RUNS, &[PIPELINE, "rejected"]);
                return Err(e);
            }
        };
        if let Err(e) = check_ballot(&election, option_id, Utc::now()) {
            metric_inc!(PIPELINE_RUNS, &[PIPELINE, "rejected"]);
            return Err(e);
        }

        let _timer = time_pipeline!(PIPELINE);
        let vote_id = VoteRecord::new_vote_id();
        let mut emitter = StepEmitter::new(sink);
        emitter.emit(
            PipelineStage::Init,
            format!("Ballot {} for {}", vote_id, election.election_id),
        );

        let result = self
            .run(&vote_id, &election, option_id, simulate_eve, &mut emitter)
            .await;

        match &result {
            Ok(receipt) => {
                metric_inc!(VOTES_CAST);
                metric_inc!(PIPELINE_RUNS, &[PIPELINE, "success"]);
                info!(
                    vote_id = %receipt.vote_id,
                    election_id = %receipt.election_id,
                    quantum_secured = receipt.quantum_secured,
                    "[qv-06] Ballot cast"
                );
            }
            Err(VoteError::SecurityAbort { .. }) => {
                metric_inc!(PIPELINE_RUNS, &[PIPELINE, "aborted"]);
            }
            Err(e) => {
                metric_inc!(PIPELINE_RUNS, &[PIPELINE, "failed"]);
                error!(vote_id = %vote_id, kind = %e.kind(), error = %e, "[qv-06] Ballot failed");
                emitter.emit(PipelineStage::Failed, format!("{}: {}", e.kind(), e));
            }
        }
        result
    }

    async fn register_election(&self, election: Election) -> Result<(), VoteError> {
        validate_election(&election)?;
        if !self
            .store
            .votes_for_election(&election.election_id)
            .await?
            .is_empty()
        {
            return Err(VoteError::Validation(format!(
                "election {} already has ballots",
                election.election_id
            )));
        }
        self.store.put_election(&election).await?;
        info!(
            election_id = %election.election_id,
            options = election.options.len(),
            "[qv-06] Election registered"
        );
        Ok(())
    }

    async fn elections(&self) -> Result<Vec<Election>, VoteError> {
        Ok(self.store.elections().await?)
    }

    async fn verify_receipt(&self, token: &str) -> Result<Option<VoteReceipt>, VoteError> {
        if !is_valid_receipt_token(token) {
            return Ok(None);
        }
        Ok(self
            .store
            .find_vote_by_receipt(token)
            .await?
            .map(|vote| vote.receipt()))
    }

    async fn tally(&self, election_id: &str) -> Result<ElectionTally, VoteError> {
        let election = self.load_election(election_id).await?;
        let mut tally = ElectionTally::empty(&election);

        for vote in self.store.votes_for_election(election_id).await? {
            let Some(key) = self.store.get_key(&vote.key_id).await? else {
                warn!(vote_id = %vote.vote_id, "[qv-06] Ballot key missing");
                tally.rejected += 1;
                continue;
            };
            let counted = match open_ballot(&key, &vote.vote_id, &vote.sealed_ballot) {
                Ok(ballot) if ballot.election_id == election_id && ballot.vote_id == vote.vote_id => {
                    tally.count(&ballot.option_id)
                }
                Ok(_) => false,
                Err(e) => {
                    warn!(vote_id = %vote.vote_id, error = %e, "[qv-06] Ballot does not open");
                    false
                }
            };
            if !counted {
                tally.rejected += 1;
            }
        }

        debug!(
            election_id,
            valid = tally.valid(),
            rejected = tally.rejected,
            "[qv-06] Tally complete"
        );
        Ok(tally)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use qv_01_key_generation::{KeyGenConfig, KeyGenerationService, MockKeySource};
    use qv_02_eve_detection::{EveDetector, FixedQberStrategy};
    use qv_03_vault_storage::{InMemoryKVStore, VaultStore};
    use shared_types::{ElectionOption, ErrorKind, KeyProvider, StepRecorder};

    struct Harness {
        coordinator: VoteCoordinator,
        store: Arc<VaultStore<InMemoryKVStore>>,
    }

    fn harness_with(source: MockKeySource, qber: f64) -> Harness {
        let store = Arc::new(VaultStore::in_memory());
        let coordinator = VoteCoordinator::new(
            Arc::new(KeyGenerationService::new(
                KeyGenConfig::for_testing(),
                Arc::new(source),
            )),
            Arc::new(EveDetector::new(Arc::new(FixedQberStrategy::new(qber)))),
            store.clone(),
            VoteConfig::for_testing(),
        )
        .unwrap();
        Harness { coordinator, store }
    }

    fn election(id: &str) -> Election {
        let now = Utc::now();
        Election {
            election_id: id.to_string(),
            title: "City council".to_string(),
            options: ["green", "blue", "red"]
                .iter()
                .map(|o| ElectionOption {
                    option_id: o.to_string(),
                    label: o.to_uppercase(),
                })
                .collect(),
            opens_at: now - Duration::days(1),
            closes_at: now + Duration::days(1),
        }
    }

    async fn ready(qber: f64) -> Harness {
        let h = harness_with(MockKeySource::default(), qber);
        h.coordinator.register_election(election("e-1")).await.unwrap();
        h
    }

    #[tokio::test]
    async fn test_clean_vote_returns_receipt() {
        let h = ready(0.02).await;
        let mut recorder = StepRecorder::new();

        let receipt = h
            .coordinator
            .cast_vote_observed("e-1", "blue", false, &mut recorder)
            .await
            .unwrap();

        assert!(is_valid_receipt_token(&receipt.receipt_token));
        assert!(!receipt.quantum_secured);
        assert_eq!(h.coordinator.vote_count().await.unwrap(), 1);
        assert_eq!(
            h.store.keys_for_transaction(&receipt.vote_id).await.unwrap().len(),
            1
        );
        assert_eq!(recorder.stages().last(), Some(&PipelineStage::Done));
        assert_eq!(recorder.steps().iter().filter(|s| s.is_terminal).count(), 1);
    }

    #[tokio::test]
    async fn test_eve_discards_ballot() {
        let h = ready(0.25).await;
        let mut recorder = StepRecorder::new();

        let err = h
            .coordinator
            .cast_vote_observed("e-1", "blue", true, &mut recorder)
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::SecurityAbort);
        assert!(err.to_string().contains("25.00%"));
        assert_eq!(h.coordinator.vote_count().await.unwrap(), 0);
        assert_eq!(h.store.key_count().await.unwrap(), 0);
        assert_eq!(recorder.stages().last(), Some(&PipelineStage::Abort));
    }

    #[tokio::test]
    async fn test_unknown_election_and_option() {
        let h = ready(0.02).await;
        let mut recorder = StepRecorder::new();

        let err = h
            .coordinator
            .cast_vote_observed("nope", "blue", false, &mut recorder)
            .await
            .unwrap_err();
        assert!(matches!(err, VoteError::UnknownElection(_)));

        let err = h.coordinator.cast_vote("e-1", "purple", false).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert!(recorder.steps().is_empty());
    }

    #[tokio::test]
    async fn test_closed_election_rejected() {
        let h = harness_with(MockKeySource::default(), 0.02);
        let mut closed = election("e-old");
        closed.opens_at = Utc::now() - Duration::days(10);
        closed.closes_at = Utc::now() - Duration::days(9);
        h.coordinator.register_election(closed).await.unwrap();

        let err = h.coordinator.cast_vote("e-old", "red", false).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
    }

    #[tokio::test]
    async fn test_verify_receipt() {
        let h = ready(0.02).await;
        let receipt = h.coordinator.cast_vote("e-1", "green", false).await.unwrap();

        let found = h
            .coordinator
            .verify_receipt(&receipt.receipt_token)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found, receipt);

        assert!(h.coordinator.verify_receipt("#QV-ZZZZZZZZ").await.unwrap().is_none());
        assert!(h.coordinator.verify_receipt("garbage").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_tally_opens_sealed_ballots() {
        let h = ready(0.02).await;
        for option in ["green", "blue", "blue", "red", "blue"] {
            h.coordinator.cast_vote("e-1", option, false).await.unwrap();
        }

        let tally = h.coordinator.tally("e-1").await.unwrap();
        assert_eq!(tally.counts["blue"], 3);
        assert_eq!(tally.counts["green"], 1);
        assert_eq!(tally.counts["red"], 1);
        assert_eq!(tally.rejected, 0);
        assert_eq!(tally.leader(), Some("blue"));
    }

    #[tokio::test]
    async fn test_tally_rejects_tampered_ballot() {
        let h = ready(0.02).await;
        let receipt = h.coordinator.cast_vote("e-1", "red", false).await.unwrap();

        let mut vote = h.store.get_vote(&receipt.vote_id).await.unwrap().unwrap();
        let key = h.store.get_key(&vote.key_id).await.unwrap().unwrap();
        vote.sealed_ballot.ciphertext[0] ^= 0xFF;
        vote.vote_id = "vote-forged".to_string();
        vote.receipt_token = "#QV-00000001".to_string();
        let mut forged_key = key.clone();
        forged_key.key_id = "qk-forged".to_string();
        forged_key.bind_to("vote-forged");
        vote.key_id = forged_key.key_id.clone();
        h.store.commit_vote(&vote, &forged_key).await.unwrap();

        let tally = h.coordinator.tally("e-1").await.unwrap();
        assert_eq!(tally.counts["red"], 1);
        assert_eq!(tally.rejected, 1);
    }

    #[tokio::test]
    async fn test_real_provider_marks_quantum_secured() {
        let h = harness_with(MockKeySource::external(KeyProvider::ProviderA), 0.01);
        h.coordinator.register_election(election("e-1")).await.unwrap();
        let receipt = h.coordinator.cast_vote("e-1", "green", false).await.unwrap();
        assert!(receipt.quantum_secured);
    }

    #[tokio::test]
    async fn test_key_failure_emits_failed() {
        let h = harness_with(
            MockKeySource::failing(qv_01_key_generation::KeyGenError::Network(
                "offline".to_string(),
            )),
            0.01,
        );
        h.coordinator.register_election(election("e-1")).await.unwrap();
        let mut recorder = StepRecorder::new();

        let err = h
            .coordinator
            .cast_vote_observed("e-1", "green", false, &mut recorder)
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Network);
        assert_eq!(recorder.stages().last(), Some(&PipelineStage::Failed));
        assert_eq!(h.coordinator.vote_count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_invalid_election_not_stored() {
        let h = harness_with(MockKeySource::default(), 0.01);
        let mut empty = election("e-2");
        empty.options.clear();
        assert!(h.coordinator.register_election(empty).await.is_err());
        assert!(h.coordinator.elections().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_election_locked_once_voted() {
        let h = ready(0.02).await;
        let mut renamed = election("e-1");
        renamed.title = "Renamed before voting".to_string();
        h.coordinator.register_election(renamed).await.unwrap();

        h.coordinator.cast_vote("e-1", "green", false).await.unwrap();

        let mut changed = election("e-1");
        changed.options.retain(|o| o.option_id != "green");
        let err = h.coordinator.register_election(changed).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert!(err.to_string().contains("already has ballots"));

        let tally = h.coordinator.tally("e-1").await.unwrap();
        assert_eq!(tally.valid(), 1);
        assert_eq!(tally.rejected, 0);
    }
}
