//! # Reference Scenarios
//!
//! 1. **Clean payment**: quantum payment commits one record and one key
//! 2. **Intercepted payment**: same request under attack leaves only an audit record
//! 3. **Incomplete payment**: missing beneficiary is rejected before any work
//! 4. **Record access**: medical record access follows the same pipeline
//! 5. **Classical channel**: NORMAL mode skips the key exchange

#[cfg(test)]
mod tests {
    use qv_05_transaction_pipeline::{open_payload, OperationPayload, TransactionPipelineApi};
    use qv_03_vault_storage::VaultRepository;
    use shared_types::{
        format_qber_percent, ErrorKind, OperationMode, PipelineStage, StepRecorder,
        TransactionRequest, TransactionStatus,
    };
    use tokio_stream::StreamExt;

    use crate::fixtures::{assert_well_formed, harness, payment_to_alice};

    // =============================================================================
    // CLEAN PAYMENT
    // =============================================================================

    #[tokio::test]
    async fn test_clean_payment_commits_record_and_key() {
        let h = harness();
        let mut recorder = StepRecorder::new();

        let record = h
            .container
            .transactions
            .process_transaction(payment_to_alice(), &mut recorder)
            .await
            .unwrap();

        assert_eq!(record.status, TransactionStatus::Success);
        assert!(!record.intercepted);
        assert!(record.qber.unwrap() <= shared_types::QBER_THRESHOLD);
        assert_well_formed(recorder.steps());
        assert_eq!(recorder.stages().last(), Some(&PipelineStage::Done));

        let store = &h.container.store;
        assert_eq!(store.transaction_count().await.unwrap(), 1);
        assert_eq!(store.key_count().await.unwrap(), 1);
        let keys = store
            .keys_for_transaction(&record.transaction_id)
            .await
            .unwrap();
        assert_eq!(keys.len(), 1);
        assert!(keys[0].is_bound_to(&record.transaction_id));
    }

    #[tokio::test]
    async fn test_clean_payment_is_mirrored_with_key_metadata() {
        let h = harness();
        let record = h
            .container
            .transactions
            .process_transaction(payment_to_alice(), &mut shared_types::NullSink)
            .await
            .unwrap();

        let mirrored = h.mirror.transactions();
        assert_eq!(mirrored.len(), 1);
        assert_eq!(mirrored[0].transaction_id, record.transaction_id);
        assert_eq!(mirrored[0].beneficiary_name.as_deref(), Some("Alice"));
        assert!(!mirrored[0].interception_detected);

        let metadata = h.mirror.key_metadata();
        assert_eq!(metadata.len(), 1);
        assert_eq!(metadata[0].transaction_id, record.transaction_id);
    }

    #[tokio::test]
    async fn test_committed_key_matches_configured_size() {
        let h = harness();
        let record = h
            .container
            .transactions
            .process_transaction(payment_to_alice(), &mut shared_types::NullSink)
            .await
            .unwrap();
        let key = h
            .container
            .transactions
            .key_for(&record.transaction_id)
            .await
            .unwrap()
            .unwrap();

        assert_eq!(key.size_bits, 256);
        assert_eq!(key.secret.len(), 32);

        let stored = h
            .container
            .store
            .get_transaction(&record.transaction_id)
            .await
            .unwrap()
            .unwrap();
        let sealed = stored.sealed_payload.unwrap();
        let opened = open_payload(&key, &record.transaction_id, &sealed).unwrap();
        assert_eq!(
            opened,
            OperationPayload::from_request(&record.transaction_id, &payment_to_alice())
        );
        assert!(open_payload(&key, "another-transaction", &sealed).is_err());
    }

    // =============================================================================
    // INTERCEPTED PAYMENT
    // =============================================================================

    #[tokio::test]
    async fn test_intercepted_payment_leaves_only_audit_record() {
        let h = harness();
        let mut recorder = StepRecorder::new();

        let err = h
            .container
            .transactions
            .process_transaction(
                payment_to_alice().with_simulated_attack(true),
                &mut recorder,
            )
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::SecurityAbort);
        let qber = err.qber().unwrap();
        assert!(qber > shared_types::QBER_THRESHOLD);
        assert!(err.to_string().contains(&format_qber_percent(qber)));
        assert_well_formed(recorder.steps());
        assert_eq!(recorder.stages().last(), Some(&PipelineStage::Abort));

        let store = &h.container.store;
        assert_eq!(store.key_count().await.unwrap(), 0);
        let history = store
            .transactions_by_mode(OperationMode::Quantum)
            .await
            .unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].status, TransactionStatus::Aborted);
        assert!(history[0].intercepted);
        assert_eq!(history[0].qber, Some(qber));
    }

    // =============================================================================
    // INCOMPLETE PAYMENT
    // =============================================================================

    #[tokio::test]
    async fn test_missing_beneficiary_is_rejected_before_any_step() {
        let h = harness();
        let mut request = payment_to_alice();
        request.beneficiary = None;
        let mut recorder = StepRecorder::new();

        let err = h
            .container
            .transactions
            .process_transaction(request, &mut recorder)
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Validation);
        assert!(recorder.steps().is_empty());
        assert_eq!(h.container.store.transaction_count().await.unwrap(), 0);
        assert_eq!(h.mirror.attempts(), 0);
    }

    // =============================================================================
    // OTHER OPERATIONS
    // =============================================================================

    #[tokio::test]
    async fn test_medical_record_access_commits() {
        let h = harness();
        let request = TransactionRequest::medical_record_access("dr-who", "patient-7", "follow-up");

        let record = h
            .container
            .transactions
            .process_transaction(request, &mut shared_types::NullSink)
            .await
            .unwrap();

        assert_eq!(record.patient_id.as_deref(), Some("patient-7"));
        assert_eq!(record.access_reason.as_deref(), Some("follow-up"));
        assert_eq!(h.container.store.key_count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_normal_mode_skips_key_exchange() {
        let h = harness();
        let mut recorder = StepRecorder::new();

        let record = h
            .container
            .transactions
            .process_transaction(
                payment_to_alice().with_mode(OperationMode::Normal),
                &mut recorder,
            )
            .await
            .unwrap();

        assert_eq!(record.status, TransactionStatus::Success);
        assert_eq!(record.qber, None);
        assert_eq!(
            recorder.stages(),
            vec![
                PipelineStage::Init,
                PipelineStage::PersistRecord,
                PipelineStage::Sync,
                PipelineStage::Done,
            ]
        );
        assert_eq!(h.container.store.key_count().await.unwrap(), 0);
        assert!(h
            .container
            .transactions
            .history_by_mode(OperationMode::Quantum)
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn test_stream_delivers_every_step_then_ends() {
        let h = harness();
        let (stream, handle) = h
            .container
            .transactions
            .process_transaction_stream(payment_to_alice());

        let steps: Vec<_> = stream.collect().await;
        let record = handle.await.unwrap().unwrap();

        assert_well_formed(&steps);
        assert_eq!(steps.len(), 8);
        assert_eq!(record.status, TransactionStatus::Success);
    }
}
