//! # Value Objects
//!
//! Parameters of the synthetic channel model.

use std::ops::RangeInclusive;

/// QBER range produced when an eavesdropper is on the channel.
///
/// The lower bound sits above the 11% interception threshold, so an attacked
/// exchange is always rejected.
pub const ATTACK_QBER_RANGE: RangeInclusive<f64> = 0.12..=0.30;

/// Highest QBER a clean channel can produce.
pub const CLEAN_QBER_CEILING: f64 = 0.08;

/// Entropy outside [0, 1] is clamped; non-finite entropy counts as 0.
pub fn sanitize_entropy(entropy: f64) -> f64 {
    if entropy.is_finite() {
        entropy.clamp(0.0, 1.0)
    } else {
        0.0
    }
}

/// Upper bound of the clean-channel QBER for a given entropy score.
///
/// `0.08 * (0.75 + 0.25 * (1 - entropy))`: a perfect channel tops out at 6%,
/// a zero-entropy channel at 8%.
pub fn clean_qber_ceiling(entropy: f64) -> f64 {
    let entropy = sanitize_entropy(entropy);
    CLEAN_QBER_CEILING * (0.75 + 0.25 * (1.0 - entropy))
}
