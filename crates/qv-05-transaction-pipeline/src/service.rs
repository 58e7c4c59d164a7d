//! # Transaction Coordinator
//!
//! Drives one request through key generation, eavesdropper detection,
//! sealing, persistence and mirroring. Collaborators are injected at
//! construction; runs share nothing else.

use async_trait::async_trait;
use quantum_telemetry::{
    log_run_event, metric_inc, time_pipeline, INTERCEPTIONS, PIPELINE_RUNS, SYNC_FAILURES,
};
use qv_04_remote_mirror::{KeyMetadataDto, TransactionDto};
use shared_crypto::key_fingerprint;
use shared_types::{
    ChannelSink, KeyMaterial, OperationMode, PipelineStage, ProcessStep, ProgressSink,
    StepEmitter, TransactionRecord, TransactionRequest, TransactionStatus,
};
use std::future::Future;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_stream::wrappers::UnboundedReceiverStream;
use tracing::{debug, error, info, warn};

use crate::config::PipelineConfig;
use crate::domain::{seal_payload, OperationPayload, PipelineError};
use crate::ports::{
    EveDetectionApi, KeyGenerationApi, RemoteMirror, TransactionPipelineApi, VaultRepository,
};

const PIPELINE: &str = "transaction";

/// Transaction Coordinator - the commit/abort state machine.
#[derive(Clone)]
pub struct TransactionCoordinator {
    keys: Arc<dyn KeyGenerationApi>,
    detector: Arc<dyn EveDetectionApi>,
    store: Arc<dyn VaultRepository>,
    mirror: Arc<dyn RemoteMirror>,
    config: PipelineConfig,
}

impl TransactionCoordinator {
    /// Create a coordinator over its collaborators.
    pub fn new(
        keys: Arc<dyn KeyGenerationApi>,
        detector: Arc<dyn EveDetectionApi>,
        store: Arc<dyn VaultRepository>,
        mirror: Arc<dyn RemoteMirror>,
        config: PipelineConfig,
    ) -> Result<Self, PipelineError> {
        config.validate()?;
        info!(
            provider = %keys.provider(),
            mirror = mirror.name(),
            key_size_bits = config.key_size_bits,
            "[qv-05] Transaction coordinator ready"
        );
        Ok(Self {
            keys,
            detector,
            store,
            mirror,
            config,
        })
    }

    /// Configuration in use.
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Run `request` on a background task, streaming its steps.
    ///
    /// The stream ends after the terminal step. Dropping it does not cancel
    /// the run; the handle yields the outcome.
    pub fn process_transaction_stream(
        &self,
        request: TransactionRequest,
    ) -> (
        UnboundedReceiverStream<ProcessStep>,
        JoinHandle<Result<TransactionRecord, PipelineError>>,
    ) {
        let (tx, rx) = mpsc::unbounded_channel();
        let coordinator = self.clone();
        let handle = tokio::spawn(async move {
            let mut sink = ChannelSink::new(tx);
            coordinator.process_transaction(request, &mut sink).await
        });
        (UnboundedReceiverStream::new(rx), handle)
    }

    // =========================================================================
    // RUN PATHS
    // =========================================================================

    async fn run_normal(
        &self,
        transaction_id: &str,
        request: &TransactionRequest,
        emitter: &mut StepEmitter<'_>,
    ) -> Result<TransactionRecord, PipelineError> {
        let record = TransactionRecord::from_request(
            transaction_id,
            request,
            TransactionStatus::Success,
            false,
            None,
        );

        if let Err(e) = self.store.commit_transaction(&record, None).await {
            return Err(self
                .fail(transaction_id, request, None, e.into(), emitter)
                .await);
        }
        emitter.emit(
            PipelineStage::PersistRecord,
            format!("Record {} committed", transaction_id),
        );

        emitter.emit(
            PipelineStage::Sync,
            format!("Pushing to the {} mirror", self.mirror.name()),
        );
        self.sync(&record, None).await;

        emitter.emit(PipelineStage::Done, "Completed over the classical channel");
        Ok(record)
    }

    async fn run_quantum(
        &self,
        transaction_id: &str,
        request: &TransactionRequest,
        emitter: &mut StepEmitter<'_>,
    ) -> Result<TransactionRecord, PipelineError> {
        emitter.emit(
            PipelineStage::KeyGen,
            format!(
                "Requesting a {}-bit key from {}",
                self.config.key_size_bits,
                self.keys.provider()
            ),
        );
        let mut key = match self
            .keys
            .generate_key(self.config.key_size_bits, transaction_id)
            .await
        {
            Ok(key) => key,
            Err(e) => {
                return Err(self
                    .fail(transaction_id, request, None, e.into(), emitter)
                    .await)
            }
        };

        emitter.emit(
            PipelineStage::EveCheck,
            format!(
                "Key {} issued (entropy {:.3})",
                key.key_id, key.quantum_entropy
            ),
        );
        let detection =
            self.detector
                .detect(key.quantum_entropy, key.size_bits, request.simulate_attack);

        if detection.is_intercepted {
            metric_inc!(INTERCEPTIONS, &[PIPELINE]);
            let record = TransactionRecord::from_request(
                transaction_id,
                request,
                TransactionStatus::Aborted,
                true,
                Some(detection.qber),
            )
            .with_failure_reason(detection.message.clone());

            let audit_stored = match self.store.insert_audit_record(&record).await {
                Ok(()) => {
                    self.sync(&record, None).await;
                    true
                }
                Err(e) => {
                    error!(
                        transaction_id,
                        error = %e,
                        "[qv-05] Audit record for aborted run not stored"
                    );
                    false
                }
            };

            warn!(
                transaction_id,
                qber = detection.qber,
                "[qv-05] Run aborted: {}",
                detection.message
            );
            let detail = if audit_stored {
                detection.message.clone()
            } else {
                format!("{} (audit record not stored)", detection.message)
            };
            emitter.emit(PipelineStage::Abort, detail);
            return Err(PipelineError::SecurityAbort {
                qber: detection.qber,
                message: detection.message,
                audit_stored,
            });
        }

        key.bind_to(transaction_id);
        let qber = Some(detection.qber);

        let payload = OperationPayload::from_request(transaction_id, request);
        let sealed = match seal_payload(&key, &payload) {
            Ok(sealed) => sealed,
            Err(e) => return Err(self.fail(transaction_id, request, qber, e, emitter).await),
        };
        emitter.emit(
            PipelineStage::Encrypt,
            format!(
                "Payload sealed under key {} ({} bytes)",
                key_fingerprint(key.secret.as_bytes()),
                sealed.ciphertext.len()
            ),
        );

        let record = TransactionRecord::from_request(
            transaction_id,
            request,
            TransactionStatus::Success,
            false,
            qber,
        )
        .with_sealed_payload(sealed);
        if let Err(e) = self.store.commit_transaction(&record, Some(&key)).await {
            return Err(self
                .fail(transaction_id, request, qber, e.into(), emitter)
                .await);
        }
        emitter.emit(
            PipelineStage::PersistRecord,
            format!("Record {} committed", transaction_id),
        );
        emitter.emit(
            PipelineStage::PersistKey,
            format!("Key {} committed", key.key_id),
        );

        emitter.emit(
            PipelineStage::Sync,
            format!("Pushing to the {} mirror", self.mirror.name()),
        );
        self.sync(&record, Some(&key)).await;

        emitter.emit(PipelineStage::Done, detection.message);
        Ok(record)
    }

    // =========================================================================
    // FAILURE AND SYNC
    // =========================================================================

    /// Emit FAILED and store a best-effort audit record.
    async fn fail(
        &self,
        transaction_id: &str,
        request: &TransactionRequest,
        qber: Option<f64>,
        err: PipelineError,
        emitter: &mut StepEmitter<'_>,
    ) -> PipelineError {
        let record = TransactionRecord::from_request(
            transaction_id,
            request,
            TransactionStatus::Failed,
            false,
            qber,
        )
        .with_failure_reason(err.to_string());

        if let Err(e) = self.store.insert_audit_record(&record).await {
            warn!(
                transaction_id,
                error = %e,
                "[qv-05] Audit record for failed run not stored"
            );
        }

        error!(
            transaction_id,
            kind = %err.kind(),
            error = %err,
            "[qv-05] Run failed"
        );
        emitter.emit(PipelineStage::Failed, format!("{}: {}", err.kind(), err));
        err
    }

    /// Push the record, then the key descriptor. Never fails the run.
    async fn sync(&self, record: &TransactionRecord, key: Option<&KeyMaterial>) {
        let dto = TransactionDto::from(record);
        self.push(
            "transactions",
            &record.transaction_id,
            self.mirror.create_transaction(&dto),
        )
        .await;

        if let Some(key) = key {
            match KeyMetadataDto::try_from(key) {
                Ok(dto) => {
                    self.push(
                        "quantum_keys",
                        &record.transaction_id,
                        self.mirror.create_key_metadata(&dto),
                    )
                    .await
                }
                Err(e) => warn!(
                    transaction_id = %record.transaction_id,
                    error = %e,
                    "[qv-05] Key descriptor not mirrored"
                ),
            }
        }
    }

    async fn push<F>(&self, endpoint: &'static str, transaction_id: &str, call: F)
    where
        F: Future<Output = Result<(), qv_04_remote_mirror::MirrorError>>,
    {
        match tokio::time::timeout(self.config.sync_timeout(), call).await {
            Ok(Ok(())) => debug!(transaction_id, endpoint, "[qv-05] Mirrored"),
            Ok(Err(e)) => {
                metric_inc!(SYNC_FAILURES, &[endpoint]);
                log_run_event!(
                    warn,
                    "qv-05",
                    "[qv-05] Mirror push failed, continuing",
                    transaction_id,
                    endpoint,
                    kind = %e.kind(),
                    error = %e
                );
            }
            Err(_) => {
                metric_inc!(SYNC_FAILURES, &[endpoint]);
                log_run_event!(
                    warn,
                    "qv-05",
                    "[qv-05] Mirror push timed out, continuing",
                    transaction_id,
                    endpoint,
                    timeout_ms = self.config.sync_timeout_ms
                );
            }
        }
    }
}

fn outcome_label(result: &Result<TransactionRecord, PipelineError>) -> &'static str {
    match result {
        Ok(_) => "success",
        Err(PipelineError::SecurityAbort { .. }) => "aborted",
        Err(_) => "failed",
    }
}

#[async_trait]
impl TransactionPipelineApi for TransactionCoordinator {
    async fn process_transaction(
        &self,
        request: TransactionRequest,
        sink: &mut dyn ProgressSink,
    ) -> Result<TransactionRecord, PipelineError> {
        if let Err(e) = request.validate() {
            metric_inc!(PIPELINE_RUNS, &[PIPELINE, "rejected"]);
            debug!(error = %e, "[qv-05] Request rejected");
            return Err(e.into());
        }

        let _timer = time_pipeline!(PIPELINE);
        let transaction_id = TransactionRecord::new_transaction_id();
        let mut emitter = StepEmitter::new(sink);
        emitter.emit(
            PipelineStage::Init,
            format!(
                "{} {} for {}",
                request.mode.as_str(),
                request.scenario.as_str(),
                transaction_id
            ),
        );
        info!(
            transaction_id = %transaction_id,
            mode = request.mode.as_str(),
            scenario = request.scenario.as_str(),
            "[qv-05] Run started"
        );

        let result = match request.mode {
            OperationMode::Normal => {
                self.run_normal(&transaction_id, &request, &mut emitter)
                    .await
            }
            OperationMode::Quantum => {
                self.run_quantum(&transaction_id, &request, &mut emitter)
                    .await
            }
        };

        metric_inc!(PIPELINE_RUNS, &[PIPELINE, outcome_label(&result)]);
        if let Ok(record) = &result {
            info!(transaction_id = %record.transaction_id, "[qv-05] Run committed");
        }
        result
    }

    async fn transaction(
        &self,
        transaction_id: &str,
    ) -> Result<Option<TransactionRecord>, PipelineError> {
        Ok(self.store.get_transaction(transaction_id).await?)
    }

    async fn history_by_mode(
        &self,
        mode: OperationMode,
    ) -> Result<Vec<TransactionRecord>, PipelineError> {
        Ok(self.store.transactions_by_mode(mode).await?)
    }

    async fn key_for(&self, transaction_id: &str) -> Result<Option<KeyMaterial>, PipelineError> {
        let mut keys = self.store.keys_for_transaction(transaction_id).await?;
        Ok(keys.pop())
    }
}
