//! # Inbound Ports
//!
//! Typed repository the coordinators persist through.

use async_trait::async_trait;
use shared_types::{Election, KeyMaterial, OperationMode, TransactionRecord, VoteRecord};

use crate::domain::{ReconcileReport, StoreError};

/// Vault repository - inbound port.
#[async_trait]
pub trait VaultRepository: Send + Sync {
    // -------------------------------------------------------------------------
    // Transactions
    // -------------------------------------------------------------------------

    /// Store an aborted or failed record without a key.
    async fn insert_audit_record(&self, record: &TransactionRecord) -> Result<(), StoreError>;

    /// Store a record and, for quantum runs, its key in one atomic batch.
    ///
    /// The key must be bound to the record and the record must be `Success`.
    async fn commit_transaction(
        &self,
        record: &TransactionRecord,
        key: Option<&KeyMaterial>,
    ) -> Result<(), StoreError>;

    /// Record by id.
    async fn get_transaction(
        &self,
        transaction_id: &str,
    ) -> Result<Option<TransactionRecord>, StoreError>;

    /// Records of one mode, newest first.
    async fn transactions_by_mode(
        &self,
        mode: OperationMode,
    ) -> Result<Vec<TransactionRecord>, StoreError>;

    /// Number of stored records.
    async fn transaction_count(&self) -> Result<usize, StoreError>;

    // -------------------------------------------------------------------------
    // Keys
    // -------------------------------------------------------------------------

    /// Key by id.
    async fn get_key(&self, key_id: &str) -> Result<Option<KeyMaterial>, StoreError>;

    /// Keys owned by a transaction or ballot.
    async fn keys_for_transaction(&self, owner_id: &str) -> Result<Vec<KeyMaterial>, StoreError>;

    /// Number of stored keys.
    async fn key_count(&self) -> Result<usize, StoreError>;

    // -------------------------------------------------------------------------
    // Ballots
    // -------------------------------------------------------------------------

    /// Store a ballot and its key in one atomic batch.
    async fn commit_vote(&self, vote: &VoteRecord, key: &KeyMaterial) -> Result<(), StoreError>;

    /// Ballot by id.
    async fn get_vote(&self, vote_id: &str) -> Result<Option<VoteRecord>, StoreError>;

    /// Ballot by receipt token.
    async fn find_vote_by_receipt(&self, token: &str) -> Result<Option<VoteRecord>, StoreError>;

    /// Ballots of one election, oldest first.
    async fn votes_for_election(&self, election_id: &str) -> Result<Vec<VoteRecord>, StoreError>;

    /// Number of stored ballots.
    async fn vote_count(&self) -> Result<usize, StoreError>;

    // -------------------------------------------------------------------------
    // Elections
    // -------------------------------------------------------------------------

    /// Create an election, or replace one no ballot has been cast in.
    async fn put_election(&self, election: &Election) -> Result<(), StoreError>;

    /// Election by id.
    async fn get_election(&self, election_id: &str) -> Result<Option<Election>, StoreError>;

    /// All elections, ordered by id.
    async fn elections(&self) -> Result<Vec<Election>, StoreError>;

    // -------------------------------------------------------------------------
    // Maintenance
    // -------------------------------------------------------------------------

    /// Delete key rows without a committed owner and dangling index entries.
    /// Running it twice in a row leaves the second report clean.
    async fn reconcile(&self) -> Result<ReconcileReport, StoreError>;
}
