//! # Vote Casting Flows
//!
//! Ballots are sealed under a fresh key, stored with a receipt token and
//! counted by opening every ballot with its stored key.

#[cfg(test)]
mod tests {
    use qv_03_vault_storage::VaultRepository;
    use qv_06_vote_casting::{VoteCastingApi, VoteError};
    use shared_types::{is_valid_receipt_token, ErrorKind, PipelineStage, StepRecorder};

    use crate::fixtures::{
        assert_well_formed, harness, open_election, payment_to_alice, HarnessBuilder, VaultHarness,
    };

    async fn with_election(h: &VaultHarness) {
        h.container
            .votes
            .register_election(open_election("council", &["north", "south"]))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_clean_vote_issues_receipt_and_counts() {
        let h = harness();
        with_election(&h).await;
        let before = h.container.store.vote_count().await.unwrap();

        let receipt = h
            .container
            .votes
            .cast_vote("council", "north", false)
            .await
            .unwrap();

        assert!(is_valid_receipt_token(&receipt.receipt_token));
        assert_eq!(h.container.store.vote_count().await.unwrap(), before + 1);

        let keys = h
            .container
            .store
            .keys_for_transaction(&receipt.vote_id)
            .await
            .unwrap();
        assert_eq!(keys.len(), 1);
        assert_eq!(keys[0].key_id, receipt.key_id);
    }

    #[tokio::test]
    async fn test_eavesdropped_vote_is_not_stored() {
        let h = harness();
        with_election(&h).await;
        let mut recorder = StepRecorder::new();

        let err = h
            .container
            .votes
            .cast_vote_observed("council", "south", true, &mut recorder)
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::SecurityAbort);
        assert!(matches!(err, VoteError::SecurityAbort { .. }));
        assert_eq!(recorder.stages().last(), Some(&PipelineStage::Abort));
        assert_well_formed(recorder.steps());
        assert_eq!(h.container.store.vote_count().await.unwrap(), 0);
        assert_eq!(h.container.store.key_count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_receipt_verifies_after_cast() {
        let h = harness();
        with_election(&h).await;
        let receipt = h
            .container
            .votes
            .cast_vote("council", "south", false)
            .await
            .unwrap();

        let verified = h
            .container
            .votes
            .verify_receipt(&receipt.receipt_token)
            .await
            .unwrap();
        assert_eq!(verified, Some(receipt));
        assert_eq!(
            h.container.votes.verify_receipt("#QV-00000000").await.unwrap(),
            None
        );
    }

    #[tokio::test]
    async fn test_tally_opens_every_ballot() {
        let h = harness();
        with_election(&h).await;
        for option in ["north", "north", "south", "north"] {
            h.container
                .votes
                .cast_vote("council", option, false)
                .await
                .unwrap();
        }
        let _ = h.container.votes.cast_vote("council", "south", true).await;

        let tally = h.container.votes.tally("council").await.unwrap();
        assert_eq!(tally.counts.get("north"), Some(&3));
        assert_eq!(tally.counts.get("south"), Some(&1));
        assert_eq!(tally.rejected, 0);
        assert_eq!(tally.total(), 4);
        assert_eq!(tally.leader(), Some("north"));
    }

    #[tokio::test]
    async fn test_unknown_option_is_rejected_without_steps() {
        let h = harness();
        with_election(&h).await;
        let mut recorder = StepRecorder::new();

        let err = h
            .container
            .votes
            .cast_vote_observed("council", "east", false, &mut recorder)
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Validation);
        assert!(recorder.steps().is_empty());
    }

    #[tokio::test]
    async fn test_votes_and_payments_share_one_store() {
        use qv_05_transaction_pipeline::TransactionPipelineApi;

        let h = HarnessBuilder::new().fixed_qber(0.01).build();
        with_election(&h).await;

        h.container
            .votes
            .cast_vote("council", "north", false)
            .await
            .unwrap();
        h.container
            .transactions
            .process_transaction(payment_to_alice(), &mut shared_types::NullSink)
            .await
            .unwrap();

        assert_eq!(h.container.store.vote_count().await.unwrap(), 1);
        assert_eq!(h.container.store.transaction_count().await.unwrap(), 1);
        assert_eq!(h.container.store.key_count().await.unwrap(), 2);
    }
}
