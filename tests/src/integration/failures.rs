//! # Fault Handling
//!
//! - **Provider**: unreachable or slow key sources end the run in FAILED
//! - **Storage**: a write fault ends the run in FAILED without a key row
//! - **Mirror**: sync faults never change the outcome
//! - **Restart**: a file-backed store keeps committed data across reopen

#[cfg(test)]
mod tests {
    use std::sync::atomic::Ordering;
    use std::sync::Arc;
    use std::time::Duration;

    use qv_01_key_generation::{KeyGenError, MockKeySource};
    use qv_03_vault_storage::{FaultyKVStore, InMemoryKVStore, VaultRepository, VaultStore};
    use qv_04_remote_mirror::InMemoryRemoteMirror;
    use qv_05_transaction_pipeline::TransactionPipelineApi;
    use shared_types::{
        ErrorKind, NullSink, OperationMode, PipelineStage, StepRecorder, TransactionStatus,
    };
    use vault_runtime::{VaultConfig, VaultContainer};

    use crate::fixtures::{assert_well_formed, payment_to_alice, HarnessBuilder};

    // =============================================================================
    // KEY PROVIDER
    // =============================================================================

    #[tokio::test(start_paused = true)]
    async fn test_provider_timeout_fails_with_network_kind() {
        let h = HarnessBuilder::new()
            .key_source(Arc::new(MockKeySource::slow(Duration::from_secs(30))))
            .build();
        let mut recorder = StepRecorder::new();

        let err = h
            .container
            .transactions
            .process_transaction(payment_to_alice(), &mut recorder)
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Network);
        assert_well_formed(recorder.steps());
        assert_eq!(recorder.stages().last(), Some(&PipelineStage::Failed));

        let history = h
            .container
            .store
            .transactions_by_mode(OperationMode::Quantum)
            .await
            .unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].status, TransactionStatus::Failed);
        assert!(!history[0].intercepted);
        assert!(history[0].failure_reason.is_some());
        assert_eq!(h.container.store.key_count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_provider_rejection_fails_with_provider_kind() {
        let h = HarnessBuilder::new()
            .key_source(Arc::new(MockKeySource::failing(KeyGenError::Provider(
                "HTTP 503".to_string(),
            ))))
            .build();
        let mut recorder = StepRecorder::new();

        let err = h
            .container
            .transactions
            .process_transaction(payment_to_alice(), &mut recorder)
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Provider);
        let last = recorder.steps().last().unwrap();
        assert_eq!(last.stage, PipelineStage::Failed);
        assert!(last.detail.contains("PROVIDER"));
        assert!(h.mirror.transactions().is_empty());
    }

    // =============================================================================
    // STORAGE
    // =============================================================================

    #[tokio::test]
    async fn test_storage_fault_fails_without_key_row() {
        let faulty = FaultyKVStore::new(InMemoryKVStore::new());
        let switch = faulty.switch();
        let store = Arc::new(VaultStore::new(faulty));
        let h = HarnessBuilder::new()
            .fixed_qber(0.02)
            .store(store.clone())
            .build();
        switch.store(true, Ordering::SeqCst);
        let mut recorder = StepRecorder::new();

        let err = h
            .container
            .transactions
            .process_transaction(payment_to_alice(), &mut recorder)
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Unknown);
        assert!(err.to_string().contains("injected write failure"));
        assert_eq!(recorder.stages().last(), Some(&PipelineStage::Failed));
        assert_well_formed(recorder.steps());

        switch.store(false, Ordering::SeqCst);
        assert_eq!(store.key_count().await.unwrap(), 0);
        assert_eq!(store.transaction_count().await.unwrap(), 0);
    }

    // =============================================================================
    // MIRROR
    // =============================================================================

    #[tokio::test]
    async fn test_failing_mirror_does_not_change_outcome() {
        let h = HarnessBuilder::new()
            .fixed_qber(0.02)
            .mirror(InMemoryRemoteMirror::failing())
            .build();

        let record = h
            .container
            .transactions
            .process_transaction(payment_to_alice(), &mut NullSink)
            .await
            .unwrap();

        assert_eq!(record.status, TransactionStatus::Success);
        assert_eq!(h.mirror.attempts(), 2);
        assert_eq!(h.container.store.key_count().await.unwrap(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stalled_mirror_is_abandoned_after_sync_timeout() {
        let h = HarnessBuilder::new()
            .fixed_qber(0.02)
            .mirror(InMemoryRemoteMirror::stalling(Duration::from_secs(60)))
            .build();
        let mut recorder = StepRecorder::new();

        let record = h
            .container
            .transactions
            .process_transaction(payment_to_alice(), &mut recorder)
            .await
            .unwrap();

        assert_eq!(record.status, TransactionStatus::Success);
        assert_eq!(recorder.stages().last(), Some(&PipelineStage::Done));
        assert!(h.mirror.transactions().is_empty());
    }

    // =============================================================================
    // RESTART
    // =============================================================================

    #[tokio::test]
    async fn test_file_store_keeps_history_across_restart() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = VaultConfig::for_testing();
        config.storage.data_dir = Some(dir.path().to_path_buf());

        let committed = {
            let container = VaultContainer::new(&config).unwrap();
            container
                .transactions
                .process_transaction(
                    payment_to_alice().with_mode(OperationMode::Normal),
                    &mut NullSink,
                )
                .await
                .unwrap()
        };

        let container = VaultContainer::new(&config).unwrap();
        let report = container.recover().await.unwrap();
        assert!(report.is_clean());

        let reloaded = container
            .transactions
            .transaction(&committed.transaction_id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(reloaded, committed);
    }
}
