//! # Vault Store
//!
//! Typed repository over a [`KeyValueStore`].
//!
//! All reads take a shared lock and all writes an exclusive one; a commit is a
//! single `atomic_batch_write`, so readers never observe a record without its
//! key or the reverse.
//!
//! Writes to a backend that blocks on I/O run through `block_in_place` on a
//! multi-threaded runtime. On a current-thread runtime they run inline.

use async_trait::async_trait;
use parking_lot::RwLock;
use serde::de::DeserializeOwned;
use serde::Serialize;
use shared_types::{
    Election, KeyMaterial, OperationMode, TransactionRecord, TransactionStatus, VoteRecord,
};
use std::collections::HashSet;
use std::path::Path;
use tokio::runtime::{Handle, RuntimeFlavor};
use tracing::{debug, info, warn};

use crate::adapters::{FileBackedKVStore, InMemoryKVStore};
use crate::domain::{
    mode_index_key, mode_index_prefix, owner_key_index, owner_key_prefix, KeyPrefix,
    ReconcileReport, StoreError,
};
use crate::ports::{BatchOperation, KeyValueStore, VaultRepository};

/// Vault repository over a key-value backend.
pub struct VaultStore<S: KeyValueStore> {
    store: RwLock<S>,
    blocking: bool,
}

impl VaultStore<InMemoryKVStore> {
    /// Volatile store.
    pub fn in_memory() -> Self {
        Self::new(InMemoryKVStore::new())
    }
}

impl VaultStore<FileBackedKVStore> {
    /// Store persisted at `path`.
    pub fn open_file<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        Ok(Self::new(FileBackedKVStore::open(path)?))
    }
}

impl<S: KeyValueStore> VaultStore<S> {
    /// Wrap a backend.
    pub fn new(store: S) -> Self {
        Self {
            blocking: store.blocks_on_write(),
            store: RwLock::new(store),
        }
    }

    /// Run `f` under the write lock, yielding the worker thread first when
    /// the backend blocks.
    fn write_with<T>(
        &self,
        f: impl FnOnce(&mut S) -> Result<T, StoreError>,
    ) -> Result<T, StoreError> {
        let run = || f(&mut *self.store.write());
        let multi_thread = Handle::try_current()
            .map(|handle| handle.runtime_flavor() == RuntimeFlavor::MultiThread)
            .unwrap_or(false);
        if self.blocking && multi_thread {
            tokio::task::block_in_place(run)
        } else {
            run()
        }
    }

    fn read<T: DeserializeOwned>(&self, key: &[u8]) -> Result<Option<T>, StoreError> {
        match self.store.read().get(key)? {
            Some(bytes) => Ok(Some(bincode::deserialize(&bytes)?)),
            None => Ok(None),
        }
    }

    fn scan<T: DeserializeOwned>(&self, prefix: &[u8]) -> Result<Vec<T>, StoreError> {
        self.store
            .read()
            .prefix_scan(prefix)?
            .into_iter()
            .map(|(_, bytes)| bincode::deserialize(&bytes).map_err(StoreError::from))
            .collect()
    }

    fn count(&self, prefix: KeyPrefix) -> Result<usize, StoreError> {
        Ok(self.store.read().prefix_scan(&prefix.scan())?.len())
    }

    fn record_ops(record: &TransactionRecord) -> Result<Vec<BatchOperation>, StoreError> {
        Ok(vec![
            BatchOperation::put(
                KeyPrefix::Transaction.key(&record.transaction_id),
                encode(record)?,
            ),
            BatchOperation::put(
                mode_index_key(
                    record.mode,
                    record.created_at.timestamp_micros(),
                    &record.transaction_id,
                ),
                record.transaction_id.as_bytes(),
            ),
        ])
    }

    fn key_ops(key: &KeyMaterial, owner_id: &str) -> Result<Vec<BatchOperation>, StoreError> {
        Ok(vec![
            BatchOperation::put(KeyPrefix::Key.key(&key.key_id), encode(key)?),
            BatchOperation::put(owner_key_index(owner_id, &key.key_id), key.key_id.as_bytes()),
        ])
    }

    /// Fail if `key` already exists; called under the write lock.
    fn ensure_absent(store: &S, key: &[u8], what: &str) -> Result<(), StoreError> {
        if store.exists(key)? {
            return Err(StoreError::Integrity(format!(
                "{} {} already stored",
                what,
                String::from_utf8_lossy(key)
            )));
        }
        Ok(())
    }
}

fn encode<T: Serialize>(value: &T) -> Result<Vec<u8>, StoreError> {
    Ok(bincode::serialize(value)?)
}

fn id_from_index(value: &[u8]) -> String {
    String::from_utf8_lossy(value).into_owned()
}

#[async_trait]
impl<S: KeyValueStore> VaultRepository for VaultStore<S> {
    async fn insert_audit_record(&self, record: &TransactionRecord) -> Result<(), StoreError> {
        if record.status == TransactionStatus::Success {
            return Err(StoreError::Integrity(format!(
                "audit record {} must not be SUCCESS",
                record.transaction_id
            )));
        }

        let ops = Self::record_ops(record)?;
        self.write_with(|store| {
            Self::ensure_absent(
                store,
                &KeyPrefix::Transaction.key(&record.transaction_id),
                "transaction",
            )?;
            Ok(store.atomic_batch_write(ops)?)
        })?;

        debug!(
            transaction_id = %record.transaction_id,
            status = record.status.as_str(),
            "[qv-03] Audit record stored"
        );
        Ok(())
    }

    async fn commit_transaction(
        &self,
        record: &TransactionRecord,
        key: Option<&KeyMaterial>,
    ) -> Result<(), StoreError> {
        let mut ops = Self::record_ops(record)?;

        if let Some(key) = key {
            if record.status != TransactionStatus::Success {
                return Err(StoreError::Integrity(format!(
                    "key {} offered for {} record {}",
                    key.key_id,
                    record.status.as_str(),
                    record.transaction_id
                )));
            }
            if !key.is_bound_to(&record.transaction_id) {
                return Err(StoreError::Integrity(format!(
                    "key {} is not bound to transaction {}",
                    key.key_id, record.transaction_id
                )));
            }
            ops.extend(Self::key_ops(key, &record.transaction_id)?);
        }

        self.write_with(|store| {
            Self::ensure_absent(
                store,
                &KeyPrefix::Transaction.key(&record.transaction_id),
                "transaction",
            )?;
            if let Some(key) = key {
                Self::ensure_absent(store, &KeyPrefix::Key.key(&key.key_id), "key")?;
            }
            Ok(store.atomic_batch_write(ops)?)
        })?;

        debug!(
            transaction_id = %record.transaction_id,
            with_key = key.is_some(),
            "[qv-03] Transaction committed"
        );
        Ok(())
    }

    async fn get_transaction(
        &self,
        transaction_id: &str,
    ) -> Result<Option<TransactionRecord>, StoreError> {
        self.read(&KeyPrefix::Transaction.key(transaction_id))
    }

    async fn transactions_by_mode(
        &self,
        mode: OperationMode,
    ) -> Result<Vec<TransactionRecord>, StoreError> {
        let store = self.store.read();
        let mut records = Vec::new();
        for (_, id) in store.prefix_scan(&mode_index_prefix(mode))?.into_iter().rev() {
            let key = KeyPrefix::Transaction.key(&id_from_index(&id));
            if let Some(bytes) = store.get(&key)? {
                records.push(bincode::deserialize(&bytes)?);
            }
        }
        Ok(records)
    }

    async fn transaction_count(&self) -> Result<usize, StoreError> {
        self.count(KeyPrefix::Transaction)
    }

    async fn get_key(&self, key_id: &str) -> Result<Option<KeyMaterial>, StoreError> {
        self.read(&KeyPrefix::Key.key(key_id))
    }

    async fn keys_for_transaction(&self, owner_id: &str) -> Result<Vec<KeyMaterial>, StoreError> {
        let store = self.store.read();
        let mut keys = Vec::new();
        for (_, key_id) in store.prefix_scan(&owner_key_prefix(owner_id))? {
            let key = KeyPrefix::Key.key(&id_from_index(&key_id));
            if let Some(bytes) = store.get(&key)? {
                keys.push(bincode::deserialize(&bytes)?);
            }
        }
        Ok(keys)
    }

    async fn key_count(&self) -> Result<usize, StoreError> {
        self.count(KeyPrefix::Key)
    }

    async fn commit_vote(&self, vote: &VoteRecord, key: &KeyMaterial) -> Result<(), StoreError> {
        if key.key_id != vote.key_id || !key.is_bound_to(&vote.vote_id) {
            return Err(StoreError::Integrity(format!(
                "key {} does not belong to vote {}",
                key.key_id, vote.vote_id
            )));
        }

        let mut ops = vec![
            BatchOperation::put(KeyPrefix::Vote.key(&vote.vote_id), encode(vote)?),
            BatchOperation::put(
                KeyPrefix::Receipt.key(&vote.receipt_token),
                vote.vote_id.as_bytes(),
            ),
        ];
        ops.extend(Self::key_ops(key, &vote.vote_id)?);

        self.write_with(|store| {
            Self::ensure_absent(store, &KeyPrefix::Vote.key(&vote.vote_id), "vote")?;
            Self::ensure_absent(
                store,
                &KeyPrefix::Receipt.key(&vote.receipt_token),
                "receipt",
            )?;
            Self::ensure_absent(store, &KeyPrefix::Key.key(&key.key_id), "key")?;
            Ok(store.atomic_batch_write(ops)?)
        })?;

        debug!(vote_id = %vote.vote_id, election_id = %vote.election_id, "[qv-03] Vote committed");
        Ok(())
    }

    async fn get_vote(&self, vote_id: &str) -> Result<Option<VoteRecord>, StoreError> {
        self.read(&KeyPrefix::Vote.key(vote_id))
    }

    async fn find_vote_by_receipt(&self, token: &str) -> Result<Option<VoteRecord>, StoreError> {
        let store = self.store.read();
        let Some(vote_id) = store.get(&KeyPrefix::Receipt.key(token))? else {
            return Ok(None);
        };
        match store.get(&KeyPrefix::Vote.key(&id_from_index(&vote_id)))? {
            Some(bytes) => Ok(Some(bincode::deserialize(&bytes)?)),
            None => Ok(None),
        }
    }

    async fn votes_for_election(&self, election_id: &str) -> Result<Vec<VoteRecord>, StoreError> {
        let mut votes: Vec<VoteRecord> = self
            .scan::<VoteRecord>(&KeyPrefix::Vote.scan())?
            .into_iter()
            .filter(|v| v.election_id == election_id)
            .collect();
        votes.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(votes)
    }

    async fn vote_count(&self) -> Result<usize, StoreError> {
        self.count(KeyPrefix::Vote)
    }

    async fn put_election(&self, election: &Election) -> Result<(), StoreError> {
        let bytes = encode(election)?;
        self.write_with(|store| {
            for (_, row) in store.prefix_scan(&KeyPrefix::Vote.scan())? {
                let vote: VoteRecord = bincode::deserialize(&row)?;
                if vote.election_id == election.election_id {
                    return Err(StoreError::Integrity(format!(
                        "election {} already has ballots",
                        election.election_id
                    )));
                }
            }
            Ok(store.put(&KeyPrefix::Election.key(&election.election_id), &bytes)?)
        })
    }

    async fn get_election(&self, election_id: &str) -> Result<Option<Election>, StoreError> {
        self.read(&KeyPrefix::Election.key(election_id))
    }

    async fn elections(&self) -> Result<Vec<Election>, StoreError> {
        self.scan(&KeyPrefix::Election.scan())
    }

    async fn reconcile(&self) -> Result<ReconcileReport, StoreError> {
        let report = self.write_with(|store| {
            let mut report = ReconcileReport::default();
            let mut ops = Vec::new();
            let mut removed_keys = HashSet::new();

            for (row_key, bytes) in store.prefix_scan(&KeyPrefix::Key.scan())? {
                report.keys_scanned += 1;
                let key: KeyMaterial = bincode::deserialize(&bytes)?;

                let committed = match key.transaction_id.as_deref() {
                    None => false,
                    Some(owner) => {
                        let record: Option<TransactionRecord> =
                            match store.get(&KeyPrefix::Transaction.key(owner))? {
                                Some(bytes) => Some(bincode::deserialize(&bytes)?),
                                None => None,
                            };
                        match record {
                            Some(record) => record.status == TransactionStatus::Success,
                            None => store.exists(&KeyPrefix::Vote.key(owner))?,
                        }
                    }
                };

                if !committed {
                    warn!(key_id = %key.key_id, owner = ?key.transaction_id, "[qv-03] Removing orphan key");
                    ops.push(BatchOperation::delete(row_key));
                    removed_keys.insert(key.key_id.clone());
                    report.orphan_keys_removed += 1;
                }
            }

            for (index_key, key_id) in store.prefix_scan(&KeyPrefix::OwnerKey.scan())? {
                let key_id = id_from_index(&key_id);
                if removed_keys.contains(&key_id) || !store.exists(&KeyPrefix::Key.key(&key_id))? {
                    ops.push(BatchOperation::delete(index_key));
                    report.dangling_indexes_removed += 1;
                }
            }

            for (index_key, tx_id) in store.prefix_scan(&KeyPrefix::ModeIndex.scan())? {
                if !store.exists(&KeyPrefix::Transaction.key(&id_from_index(&tx_id)))? {
                    ops.push(BatchOperation::delete(index_key));
                    report.dangling_indexes_removed += 1;
                }
            }

            for (index_key, vote_id) in store.prefix_scan(&KeyPrefix::Receipt.scan())? {
                if !store.exists(&KeyPrefix::Vote.key(&id_from_index(&vote_id)))? {
                    ops.push(BatchOperation::delete(index_key));
                    report.dangling_indexes_removed += 1;
                }
            }

            if !ops.is_empty() {
                store.atomic_batch_write(ops)?;
            }
            Ok(report)
        })?;

        info!(
            keys_scanned = report.keys_scanned,
            orphan_keys_removed = report.orphan_keys_removed,
            dangling_indexes_removed = report.dangling_indexes_removed,
            "[qv-03] Reconciliation complete"
        );
        Ok(report)
    }
}
