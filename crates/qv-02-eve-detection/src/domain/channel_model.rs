//! # QBER Strategies
//!
//! [`SyntheticChannelModel`] draws error rates from a simple two-regime model;
//! [`FixedQberStrategy`] replays a known measurement.

use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::value_objects::{clean_qber_ceiling, ATTACK_QBER_RANGE};
use crate::ports::DetectionStrategy;

/// Two-regime synthetic channel.
///
/// - attacked: uniform in `[0.12, 0.30]`
/// - clean: uniform in `[0, ceiling(entropy)]`, at most 0.08
pub struct SyntheticChannelModel {
    rng: Mutex<StdRng>,
}

impl SyntheticChannelModel {
    /// Model seeded from OS entropy.
    pub fn new() -> Self {
        Self {
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    /// Reproducible model.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }
}

impl Default for SyntheticChannelModel {
    fn default() -> Self {
        Self::new()
    }
}

impl DetectionStrategy for SyntheticChannelModel {
    fn sample_qber(&self, entropy: f64, _size_bits: u32, attack: bool) -> f64 {
        let mut rng = self.rng.lock();
        if attack {
            rng.gen_range(ATTACK_QBER_RANGE)
        } else {
            rng.gen_range(0.0..=clean_qber_ceiling(entropy))
        }
    }

    fn name(&self) -> &'static str {
        "synthetic-channel"
    }
}

/// Strategy returning a constant QBER regardless of input.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedQberStrategy {
    qber: f64,
}

impl FixedQberStrategy {
    /// Always report `qber`.
    pub fn new(qber: f64) -> Self {
        Self { qber }
    }
}

impl DetectionStrategy for FixedQberStrategy {
    fn sample_qber(&self, _entropy: f64, _size_bits: u32, _attack: bool) -> f64 {
        self.qber
    }

    fn name(&self) -> &'static str {
        "fixed"
    }
}
