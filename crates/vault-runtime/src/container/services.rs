//! # Vault Container
//!
//! Holds every subsystem instance, wired through its ports.
//!
//! ## Initialization Order
//!
//! ```text
//! Level 0: Vault Storage, Remote Mirror (no dependencies)
//! Level 1: Key Generation, Eavesdropper Detection
//! Level 2: Transaction Pipeline, Vote Casting (depend on Level 0-1)
//! ```
//!
//! All collaborators are shared as `Arc<dyn Trait>`, so both coordinators see
//! the same store and tests can swap any of them.

use std::sync::Arc;

use quantum_telemetry::log_event;
use thiserror::Error;
use tracing::info;

use qv_01_key_generation::{
    HttpProviderConfig, HttpQkdProvider, KeyGenError, KeyGenerationApi, KeyGenerationService,
};
use qv_02_eve_detection::{EveDetectionApi, EveDetector};
use qv_03_vault_storage::{ReconcileReport, StoreError, VaultRepository, VaultStore};
use qv_04_remote_mirror::{HttpRemoteMirror, MirrorError, NoopRemoteMirror, RemoteMirror};
use qv_05_transaction_pipeline::{PipelineError, TransactionCoordinator};
use qv_06_vote_casting::{VoteCoordinator, VoteError};

use crate::container::config::{KeySourceConfig, VaultConfig};

/// Container construction errors.
#[derive(Debug, Error)]
pub enum ContainerError {
    /// The store could not be opened or reconciled.
    #[error("Storage initialization failed: {0}")]
    Storage(#[from] StoreError),

    /// The data directory could not be created.
    #[error("Cannot create data directory {path}: {message}")]
    DataDir {
        /// Directory path
        path: String,
        /// Underlying error text
        message: String,
    },

    /// The key provider client could not be built.
    #[error("Key source initialization failed: {0}")]
    KeySource(#[from] KeyGenError),

    /// The mirror client could not be built.
    #[error("Mirror initialization failed: {0}")]
    Mirror(#[from] MirrorError),

    /// The transaction pipeline rejected its configuration.
    #[error("Transaction pipeline initialization failed: {0}")]
    Pipeline(#[from] PipelineError),

    /// The vote pipeline rejected its configuration.
    #[error("Vote pipeline initialization failed: {0}")]
    Vote(#[from] VoteError),
}

/// Central container holding all subsystem instances.
pub struct VaultContainer {
    // =========================================================================
    // LEVEL 0
    // =========================================================================
    /// Vault Storage (qv-03)
    pub store: Arc<dyn VaultRepository>,

    /// Remote Mirror (qv-04)
    pub mirror: Arc<dyn RemoteMirror>,

    // =========================================================================
    // LEVEL 1
    // =========================================================================
    /// Key Generation (qv-01)
    pub keys: Arc<dyn KeyGenerationApi>,

    /// Eavesdropper Detection (qv-02)
    pub detector: Arc<dyn EveDetectionApi>,

    // =========================================================================
    // LEVEL 2
    // =========================================================================
    /// Transaction Pipeline (qv-05)
    pub transactions: TransactionCoordinator,

    /// Vote Casting (qv-06)
    pub votes: VoteCoordinator,
}

impl VaultContainer {
    /// Build every subsystem from `config`.
    pub fn new(config: &VaultConfig) -> Result<Self, ContainerError> {
        info!("Initializing subsystems...");

        let store = Self::build_store(config)?;
        let mirror = Self::build_mirror(config)?;
        info!("  [0] Storage and mirror ready (mirror: {})", mirror.name());

        let keys = Self::build_key_source(config)?;
        let detector: Arc<dyn EveDetectionApi> =
            Arc::new(EveDetector::from_config(&config.detection));
        info!("  [1] Key generation and eavesdropper detection ready");

        Self::assemble(config, store, mirror, keys, detector)
    }

    /// Build the coordinators around caller-supplied collaborators.
    pub fn assemble(
        config: &VaultConfig,
        store: Arc<dyn VaultRepository>,
        mirror: Arc<dyn RemoteMirror>,
        keys: Arc<dyn KeyGenerationApi>,
        detector: Arc<dyn EveDetectionApi>,
    ) -> Result<Self, ContainerError> {
        let transactions = TransactionCoordinator::new(
            Arc::clone(&keys),
            Arc::clone(&detector),
            Arc::clone(&store),
            Arc::clone(&mirror),
            config.pipeline.clone(),
        )?;
        let votes = VoteCoordinator::new(
            Arc::clone(&keys),
            Arc::clone(&detector),
            Arc::clone(&store),
            config.vote.clone(),
        )?;
        info!("  [2] Transaction and vote pipelines ready");

        Ok(Self {
            store,
            mirror,
            keys,
            detector,
            transactions,
            votes,
        })
    }

    /// Drop partial writes left by an interrupted run.
    pub async fn recover(&self) -> Result<ReconcileReport, ContainerError> {
        let report = self.store.reconcile().await?;
        if report.is_clean() {
            log_event!(
                info,
                "vault-runtime",
                "Store is consistent",
                keys_scanned = report.keys_scanned
            );
        } else {
            log_event!(
                warn,
                "vault-runtime",
                "Store reconciled",
                orphan_keys = report.orphan_keys_removed,
                dangling_indexes = report.dangling_indexes_removed
            );
        }
        Ok(report)
    }

    fn build_store(config: &VaultConfig) -> Result<Arc<dyn VaultRepository>, ContainerError> {
        match (&config.storage.data_dir, config.storage.file_path()) {
            (Some(dir), Some(path)) => {
                std::fs::create_dir_all(dir).map_err(|e| ContainerError::DataDir {
                    path: dir.display().to_string(),
                    message: e.to_string(),
                })?;
                info!("Opening vault store at {}", path.display());
                Ok(Arc::new(VaultStore::open_file(path)?))
            }
            _ => {
                info!("Using in-memory vault store");
                Ok(Arc::new(VaultStore::in_memory()))
            }
        }
    }

    fn build_mirror(config: &VaultConfig) -> Result<Arc<dyn RemoteMirror>, ContainerError> {
        match &config.mirror.base_url {
            Some(url) => Ok(Arc::new(HttpRemoteMirror::new(url, &config.mirror)?)),
            None => Ok(Arc::new(NoopRemoteMirror)),
        }
    }

    fn build_key_source(config: &VaultConfig) -> Result<Arc<dyn KeyGenerationApi>, ContainerError> {
        match &config.key_source {
            KeySourceConfig::Simulation => Ok(Arc::new(KeyGenerationService::simulated(
                config.key_gen.clone(),
            ))),
            KeySourceConfig::Http { base_url, provider } => {
                let timeout = std::time::Duration::from_millis(config.key_gen.provider_timeout_ms);
                let provider = HttpQkdProvider::new(HttpProviderConfig {
                    base_url: base_url.clone(),
                    provider: *provider,
                    request_timeout: timeout,
                    ..HttpProviderConfig::default()
                })?;
                Ok(Arc::new(KeyGenerationService::new(
                    config.key_gen.clone(),
                    Arc::new(provider),
                )))
            }
        }
    }
}
