//! # Value Objects
//!
//! Key-size bounds and simulation parameters.

use std::ops::RangeInclusive;

use super::errors::KeyGenError;

/// Largest key a single request may ask for (64 Kibit).
pub const MAX_KEY_SIZE_BITS: u32 = 65_536;

/// Algorithm tag of simulated keys.
pub const SIMULATION_ALGORITHM: &str = "BB84-SIM";

/// Entropy score range of a simulated channel.
pub const SIMULATION_ENTROPY_RANGE: RangeInclusive<f64> = 0.90..=0.99;

/// Bytes needed to hold `size_bits` bits.
pub fn key_bytes_for(size_bits: u32) -> usize {
    size_bits.div_ceil(8) as usize
}

/// Reject zero-sized or oversized key requests.
pub fn validate_key_size(size_bits: u32, max: u32) -> Result<(), KeyGenError> {
    if size_bits == 0 || size_bits > max {
        return Err(KeyGenError::InvalidKeySize { size_bits, max });
    }
    Ok(())
}
