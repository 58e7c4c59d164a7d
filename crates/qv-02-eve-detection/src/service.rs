//! # Eavesdropper Detector
//!
//! Samples a QBER through the configured strategy and applies the shared
//! interception threshold.

use quantum_telemetry::{metric_observe, QBER_RATIO};
use shared_types::DetectionResult;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::config::DetectionConfig;
use crate::domain::{sanitize_entropy, SyntheticChannelModel};
use crate::ports::{DetectionStrategy, EveDetectionApi};

/// Eavesdropper detector service.
pub struct EveDetector {
    strategy: Arc<dyn DetectionStrategy>,
}

impl EveDetector {
    /// Detector over an explicit strategy.
    pub fn new(strategy: Arc<dyn DetectionStrategy>) -> Self {
        Self { strategy }
    }

    /// Detector over the synthetic channel model.
    pub fn from_config(config: &DetectionConfig) -> Self {
        let model = match config.seed {
            Some(seed) => SyntheticChannelModel::with_seed(seed),
            None => SyntheticChannelModel::new(),
        };
        Self::new(Arc::new(model))
    }

    /// Name of the active strategy.
    pub fn strategy_name(&self) -> &'static str {
        self.strategy.name()
    }
}

impl Default for EveDetector {
    fn default() -> Self {
        Self::from_config(&DetectionConfig::default())
    }
}

impl EveDetectionApi for EveDetector {
    fn detect(
        &self,
        quantum_entropy: f64,
        size_bits: u32,
        attack_enabled: bool,
    ) -> DetectionResult {
        let entropy = sanitize_entropy(quantum_entropy);
        let raw = self
            .strategy
            .sample_qber(entropy, size_bits, attack_enabled);
        let result = DetectionResult::from_qber(raw, size_bits);

        metric_observe!(QBER_RATIO, result.qber);
        if result.is_intercepted {
            warn!(
                qber = result.qber,
                strategy = self.strategy.name(),
                attack_enabled,
                "[qv-02] Interception detected"
            );
        } else {
            debug!(
                qber = result.qber,
                strategy = self.strategy.name(),
                "[qv-02] Channel secure"
            );
        }
        result
    }
}
