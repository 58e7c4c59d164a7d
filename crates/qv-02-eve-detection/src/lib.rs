//! # QV-02 Eavesdropper Detection
//!
//! Decides whether a key exchange was observed.
//!
//! **Subsystem ID:** 2  
//! **Architecture:** Hexagonal (DDD + Ports/Adapters)
//!
//! ## Purpose
//!
//! Turn a key's channel quality score into a quantum bit error rate (QBER) and
//! an interception verdict. Measuring an unknown quantum state disturbs it, so
//! an eavesdropper shows up as a raised error rate on the sifted key.
//!
//! ## Decision Rule
//!
//! | QBER | Verdict |
//! |------|---------|
//! | `qber > 0.11` | intercepted, the run must abort |
//! | `qber <= 0.11` | secure |
//!
//! Sampling sits behind [`DetectionStrategy`] so a physical simulator or a
//! provider-reported measurement can replace [`SyntheticChannelModel`]
//! without touching the coordinators. Detection never persists anything.
//!
//! ## Module Structure
//!
//! ```text
//! qv-02-eve-detection/
//! ├── domain/          # Channel model constants, synthetic and fixed strategies
//! ├── ports/           # EveDetectionApi (inbound) + DetectionStrategy (outbound)
//! ├── service.rs       # EveDetector
//! └── config.rs        # DetectionConfig
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod domain;
pub mod ports;
pub mod service;

// Re-exports
pub use config::DetectionConfig;
pub use domain::{
    clean_qber_ceiling, sanitize_entropy, FixedQberStrategy, SyntheticChannelModel,
    ATTACK_QBER_RANGE, CLEAN_QBER_CEILING,
};
pub use ports::{DetectionStrategy, EveDetectionApi};
pub use service::EveDetector;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
