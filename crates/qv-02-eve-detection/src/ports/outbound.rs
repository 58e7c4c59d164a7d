//! # Outbound Ports

/// QBER sampling strategy - outbound port.
///
/// Implementations may return any float; the detector clamps it to [0, 1]
/// and treats non-finite values as a fully disturbed channel.
pub trait DetectionStrategy: Send + Sync {
    /// Sample the error rate for one exchange.
    fn sample_qber(&self, entropy: f64, size_bits: u32, attack: bool) -> f64;

    /// Strategy name for logs.
    fn name(&self) -> &'static str;
}
