//! # Pipeline Invariants
//!
//! Properties that hold for every run, whatever the channel does:
//! the threshold decides the outcome, keys exist only for committed records,
//! progress is ordered with one terminal step, and concurrent runs do not
//! interfere.

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use proptest::prelude::*;
    use qv_03_vault_storage::VaultRepository;
    use qv_05_transaction_pipeline::TransactionPipelineApi;
    use shared_types::{
        ErrorKind, NullSink, OperationMode, StepRecorder, TransactionRequest, TransactionStatus,
        QBER_THRESHOLD,
    };

    use crate::fixtures::{assert_well_formed, harness, payment_to_alice, HarnessBuilder};

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]

        #[test]
        fn prop_threshold_decides_outcome(qber in 0.0f64..=1.0, attack in any::<bool>()) {
            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .unwrap();
            runtime.block_on(async {
                let h = HarnessBuilder::new().fixed_qber(qber).build();
                let mut recorder = StepRecorder::new();
                let result = h
                    .container
                    .transactions
                    .process_transaction(
                        payment_to_alice().with_simulated_attack(attack),
                        &mut recorder,
                    )
                    .await;

                assert_well_formed(recorder.steps());
                let keys = h.container.store.key_count().await.unwrap();
                if qber > QBER_THRESHOLD {
                    assert_eq!(result.unwrap_err().kind(), ErrorKind::SecurityAbort);
                    assert_eq!(keys, 0);
                } else {
                    assert_eq!(result.unwrap().status, TransactionStatus::Success);
                    assert_eq!(keys, 1);
                }
            });
        }
    }

    #[tokio::test]
    async fn test_simulated_attack_never_commits_a_key() {
        let h = harness();
        for _ in 0..20 {
            let result = h
                .container
                .transactions
                .process_transaction(payment_to_alice().with_simulated_attack(true), &mut NullSink)
                .await;
            assert!(result.is_err());
        }
        assert_eq!(h.container.store.key_count().await.unwrap(), 0);
        assert_eq!(h.container.store.transaction_count().await.unwrap(), 20);
    }

    #[tokio::test]
    async fn test_every_key_belongs_to_a_successful_record() {
        let h = harness();
        for i in 0..12 {
            let request = payment_to_alice().with_simulated_attack(i % 3 == 0);
            let _ = h
                .container
                .transactions
                .process_transaction(request, &mut NullSink)
                .await;
        }

        let records = h
            .container
            .store
            .transactions_by_mode(OperationMode::Quantum)
            .await
            .unwrap();
        assert_eq!(records.len(), 12);

        let mut keys = 0;
        for record in &records {
            let owned = h
                .container
                .store
                .keys_for_transaction(&record.transaction_id)
                .await
                .unwrap();
            match record.status {
                TransactionStatus::Success => assert_eq!(owned.len(), 1),
                _ => assert!(owned.is_empty()),
            }
            keys += owned.len();
        }
        assert_eq!(h.container.store.key_count().await.unwrap(), keys);
    }

    #[tokio::test]
    async fn test_reconcile_keeps_committed_data() {
        let h = harness();
        for i in 0..6 {
            let _ = h
                .container
                .transactions
                .process_transaction(
                    payment_to_alice().with_simulated_attack(i % 2 == 0),
                    &mut NullSink,
                )
                .await;
        }
        let keys_before = h.container.store.key_count().await.unwrap();

        let report = h.container.recover().await.unwrap();

        assert!(report.is_clean());
        assert_eq!(report.keys_scanned, keys_before);
        assert_eq!(h.container.store.key_count().await.unwrap(), keys_before);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_runs_are_independent() {
        let h = harness();
        let mut handles = Vec::new();
        for i in 0..16u64 {
            let coordinator = h.container.transactions.clone();
            handles.push(tokio::spawn(async move {
                let request = TransactionRequest::banking_payment(
                    format!("user-{}", i),
                    100 + i,
                    "Alice",
                );
                let mut recorder = StepRecorder::new();
                let record = coordinator
                    .process_transaction(request, &mut recorder)
                    .await
                    .unwrap();
                assert_well_formed(recorder.steps());
                record
            }));
        }

        let mut ids = HashSet::new();
        for handle in handles {
            let record = handle.await.unwrap();
            assert!(ids.insert(record.transaction_id.clone()));
            let keys = h
                .container
                .store
                .keys_for_transaction(&record.transaction_id)
                .await
                .unwrap();
            assert_eq!(keys.len(), 1);
        }
        assert_eq!(h.container.store.transaction_count().await.unwrap(), 16);
        assert_eq!(h.container.store.key_count().await.unwrap(), 16);
        assert_eq!(h.mirror.transactions().len(), 16);
    }
}
