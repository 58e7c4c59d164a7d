//! # Test Fixtures
//!
//! Builds a [`VaultContainer`] around real subsystems, with the mirror and,
//! where a test needs it, the key source, detector or store swapped out.

use std::sync::Arc;

use chrono::{Duration, Utc};
use qv_01_key_generation::{KeyGenConfig, KeyGenerationApi, KeyGenerationService, KeySource};
use qv_02_eve_detection::{
    DetectionConfig, DetectionStrategy, EveDetectionApi, EveDetector, FixedQberStrategy,
};
use qv_03_vault_storage::{VaultRepository, VaultStore};
use qv_04_remote_mirror::InMemoryRemoteMirror;
use shared_types::{Election, ElectionOption, ProcessStep, TransactionRequest};
use vault_runtime::{VaultConfig, VaultContainer};

/// Seed for the synthetic channel, so runs are reproducible.
pub const CHANNEL_SEED: u64 = 0x5156;

/// Container plus handles on the doubles behind it.
pub struct VaultHarness {
    /// Wired subsystems.
    pub container: VaultContainer,
    /// Mirror receiving every sync.
    pub mirror: Arc<InMemoryRemoteMirror>,
}

/// Builder for [`VaultHarness`].
pub struct HarnessBuilder {
    config: VaultConfig,
    keys: Option<Arc<dyn KeyGenerationApi>>,
    detector: Option<Arc<dyn EveDetectionApi>>,
    store: Option<Arc<dyn VaultRepository>>,
    mirror: InMemoryRemoteMirror,
}

impl HarnessBuilder {
    /// Simulated keys, seeded channel, in-memory store, accepting mirror.
    pub fn new() -> Self {
        Self {
            config: VaultConfig::for_testing(),
            keys: None,
            detector: None,
            store: None,
            mirror: InMemoryRemoteMirror::new(),
        }
    }

    /// Use `source` for key material.
    pub fn key_source(mut self, source: Arc<dyn KeySource>) -> Self {
        self.keys = Some(Arc::new(KeyGenerationService::new(
            KeyGenConfig::for_testing(),
            source,
        )));
        self
    }

    /// Use `strategy` for QBER samples.
    pub fn strategy(mut self, strategy: Arc<dyn DetectionStrategy>) -> Self {
        self.detector = Some(Arc::new(EveDetector::new(strategy)));
        self
    }

    /// Report a constant QBER.
    pub fn fixed_qber(self, qber: f64) -> Self {
        self.strategy(Arc::new(FixedQberStrategy::new(qber)))
    }

    /// Use `store` for persistence.
    pub fn store(mut self, store: Arc<dyn VaultRepository>) -> Self {
        self.store = Some(store);
        self
    }

    /// Use `mirror` for sync.
    pub fn mirror(mut self, mirror: InMemoryRemoteMirror) -> Self {
        self.mirror = mirror;
        self
    }

    /// Wire everything.
    pub fn build(self) -> VaultHarness {
        let config = self.config;
        let keys = self
            .keys
            .unwrap_or_else(|| Arc::new(KeyGenerationService::simulated(config.key_gen.clone())));
        let detector = self.detector.unwrap_or_else(|| {
            Arc::new(EveDetector::from_config(&DetectionConfig {
                seed: Some(CHANNEL_SEED),
            }))
        });
        let store = self
            .store
            .unwrap_or_else(|| Arc::new(VaultStore::in_memory()));
        let mirror = Arc::new(self.mirror);

        let container = VaultContainer::assemble(&config, store, mirror.clone(), keys, detector)
            .expect("test configuration is valid");

        VaultHarness { container, mirror }
    }
}

impl Default for HarnessBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Default harness.
pub fn harness() -> VaultHarness {
    HarnessBuilder::new().build()
}

/// Payment used by the reference scenarios.
pub fn payment_to_alice() -> TransactionRequest {
    TransactionRequest::banking_payment("user-42", 100, "Alice")
}

/// Election open for the next day.
pub fn open_election(election_id: &str, option_ids: &[&str]) -> Election {
    let now = Utc::now();
    Election {
        election_id: election_id.to_string(),
        title: format!("Election {}", election_id),
        options: option_ids
            .iter()
            .map(|id| ElectionOption {
                option_id: id.to_string(),
                label: id.to_uppercase(),
            })
            .collect(),
        opens_at: now - Duration::minutes(1),
        closes_at: now + Duration::days(1),
    }
}

/// Panics unless `steps` is non-empty, non-decreasing and ends in its only
/// terminal step.
pub fn assert_well_formed(steps: &[ProcessStep]) {
    assert!(!steps.is_empty(), "no steps emitted");
    for pair in steps.windows(2) {
        assert!(
            pair[0].progress <= pair[1].progress,
            "progress went backwards: {:?} -> {:?}",
            pair[0].stage,
            pair[1].stage
        );
    }
    assert_eq!(steps.iter().filter(|s| s.is_terminal).count(), 1);
    assert!(steps.last().map(|s| s.is_terminal).unwrap_or(false));
}
