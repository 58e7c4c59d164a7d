//! # Quantum Telemetry
//!
//! Logging and metrics for Quantum-Vault pipelines.
//!
//! ## Components
//!
//! - **Logs**: `tracing-subscriber` fmt layer, plain for terminals and JSON
//!   for log shippers, filtered by `QV_LOG_LEVEL` / `RUST_LOG`
//! - **Metrics**: Prometheus counters and histograms in a process-wide
//!   registry, exported as text through [`gather_metrics`]
//!
//! ## Usage
//!
//! ```rust,ignore
//! use quantum_telemetry::{init_telemetry, TelemetryConfig};
//!
//! fn main() {
//!     let _guard = init_telemetry(TelemetryConfig::from_env()).expect("telemetry");
//!     // pipelines now log and count
//! }
//! ```
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `QV_SERVICE_NAME` | `quantum-vault` | Service name in log lines |
//! | `QV_LOG_LEVEL` | `info` | Log level filter (falls back to `RUST_LOG`) |
//! | `QV_JSON_LOGS` | `false` | Emit JSON log lines |
//! | `QV_CONSOLE_OUTPUT` | `true` | Write logs to stdout |
//! | `QV_SUBSYSTEM_ID` | `00` | Subsystem identifier |

#![warn(missing_docs)]
#![warn(clippy::all)]

mod config;
mod logging;
pub mod metrics;
mod tracing_setup;

pub use config::TelemetryConfig;
pub use metrics::{
    gather_metrics, register_metrics, MetricsHandle, INTERCEPTIONS, KEYS_GENERATED,
    PIPELINE_DURATION, PIPELINE_RUNS, QBER_RATIO, SYNC_FAILURES, VOTES_CAST,
};
pub use tracing_setup::{init_logging, LoggingGuard};

use thiserror::Error;

/// Telemetry initialization errors
#[derive(Error, Debug)]
pub enum TelemetryError {
    /// The global subscriber could not be installed.
    #[error("Failed to initialize logging: {0}")]
    LoggingInit(String),

    /// A metric could not be registered or encoded.
    #[error("Failed to initialize Prometheus metrics: {0}")]
    MetricsInit(String),

    /// Configuration could not be interpreted.
    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// Initialize logging and register every metric.
///
/// Returns a guard that must be held for the lifetime of the application.
pub fn init_telemetry(config: TelemetryConfig) -> Result<TelemetryGuard, TelemetryError> {
    let metrics_handle = register_metrics()?;
    let logging_guard = init_logging(&config)?;

    Ok(TelemetryGuard {
        _logging: logging_guard,
        _metrics: metrics_handle,
    })
}

/// Guard that keeps telemetry active.
pub struct TelemetryGuard {
    _logging: LoggingGuard,
    _metrics: MetricsHandle,
}

impl Drop for TelemetryGuard {
    fn drop(&mut self) {
        tracing::debug!("Shutting down telemetry");
    }
}

/// Convenience macro for recording a metric increment.
#[macro_export]
macro_rules! metric_inc {
    ($metric:expr) => {
        $metric.inc()
    };
    ($metric:expr, $labels:expr) => {
        $metric.with_label_values($labels).inc()
    };
}

/// Convenience macro for recording a metric with a value.
#[macro_export]
macro_rules! metric_observe {
    ($metric:expr, $value:expr) => {
        $metric.observe($value)
    };
    ($metric:expr, $labels:expr, $value:expr) => {
        $metric.with_label_values($labels).observe($value)
    };
}
