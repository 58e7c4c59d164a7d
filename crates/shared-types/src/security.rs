//! # Channel Security Bounds
//!
//! The interception threshold and the receipt-token format. Both are fixed
//! protocol constants shared by the transaction and vote pipelines.

// =============================================================================
// CONSTANTS
// =============================================================================

/// Maximum quantum bit error rate tolerated on a secure channel (BB84 bound).
///
/// A measured QBER strictly above this value means the channel was observed.
pub const QBER_THRESHOLD: f64 = 0.11;

/// Prefix of every ballot receipt token.
pub const RECEIPT_TOKEN_PREFIX: &str = "#QV-";

/// Number of uppercase hex digits following [`RECEIPT_TOKEN_PREFIX`].
pub const RECEIPT_TOKEN_HEX_LEN: usize = 8;

// =============================================================================
// DECISIONS
// =============================================================================

/// Interception verdict for a measured QBER.
///
/// `qber > 0.11` is intercepted; anything at or below the bound is secure.
/// NaN never compares greater, so an unmeasurable rate must be rejected by the
/// caller before it reaches this function.
pub fn is_intercepted(qber: f64) -> bool {
    qber > QBER_THRESHOLD
}

/// Render a QBER as a percentage with two decimals, e.g. `0.1842` -> `18.42%`.
pub fn format_qber_percent(qber: f64) -> String {
    format!("{:.2}%", qber * 100.0)
}

/// Build a receipt token from 32 random bits.
pub fn format_receipt_token(bits: u32) -> String {
    format!("{}{:08X}", RECEIPT_TOKEN_PREFIX, bits)
}

/// Check a token against `^#QV-[0-9A-F]{8}$`.
pub fn is_valid_receipt_token(token: &str) -> bool {
    match token.strip_prefix(RECEIPT_TOKEN_PREFIX) {
        Some(hex) => {
            hex.len() == RECEIPT_TOKEN_HEX_LEN
                && hex
                    .chars()
                    .all(|c| c.is_ascii_digit() || ('A'..='F').contains(&c))
        }
        None => false,
    }
}
