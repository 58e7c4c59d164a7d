//! # Detection Configuration

/// Eavesdropper detection configuration.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DetectionConfig {
    /// Seed for the synthetic channel model; `None` draws from OS entropy.
    pub seed: Option<u64>,
}

impl DetectionConfig {
    /// Create a config for testing (reproducible samples).
    pub fn for_testing() -> Self {
        Self { seed: Some(42) }
    }
}
