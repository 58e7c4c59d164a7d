//! # Inbound Ports

use shared_types::DetectionResult;

/// Eavesdropper Detection API - inbound port.
pub trait EveDetectionApi: Send + Sync {
    /// Measure the channel for a key of `size_bits` bits with the given
    /// entropy score. `attack_enabled` puts a simulated eavesdropper on the
    /// channel.
    fn detect(&self, quantum_entropy: f64, size_bits: u32, attack_enabled: bool)
        -> DetectionResult;
}
