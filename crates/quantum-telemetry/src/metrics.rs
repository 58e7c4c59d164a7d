//! Prometheus metrics for Quantum-Vault pipelines.
//!
//! All metrics follow the naming convention: `qv_<metric>_<unit>`
//!
//! ## Metric Types
//!
//! - **Counter**: Monotonically increasing value (e.g., keys_generated_total)
//! - **Histogram**: Distribution of values (e.g., qber_ratio)

use lazy_static::lazy_static;
use prometheus::{
    exponential_buckets, linear_buckets, Counter, CounterVec, Encoder, Histogram, HistogramOpts,
    HistogramVec, Opts, Registry, TextEncoder,
};
use std::sync::Arc;

use crate::TelemetryError;

lazy_static! {
    /// Global metrics registry
    pub static ref REGISTRY: Registry = Registry::new();

    // =========================================================================
    // KEY GENERATION METRICS (Subsystem 1)
    // =========================================================================

    /// Keys issued, by provider
    pub static ref KEYS_GENERATED: CounterVec = CounterVec::new(
        Opts::new("qv_keys_generated_total", "Total keys issued by a key source"),
        &["provider"]  // provider: SIMULATION/PROVIDER_A/PROVIDER_B
    ).expect("metric creation failed");

    // =========================================================================
    // DETECTION METRICS (Subsystem 2)
    // =========================================================================

    /// Measured QBER distribution
    pub static ref QBER_RATIO: Histogram = Histogram::with_opts(
        HistogramOpts::new("qv_qber_ratio", "Measured quantum bit error rate")
            .buckets(linear_buckets(0.02, 0.02, 15).expect("bucket layout"))
    ).expect("metric creation failed");

    /// Runs aborted by the detector
    pub static ref INTERCEPTIONS: CounterVec = CounterVec::new(
        Opts::new("qv_interceptions_total", "Key exchanges rejected as intercepted"),
        &["pipeline"]  // pipeline: transaction/vote
    ).expect("metric creation failed");

    // =========================================================================
    // PIPELINE METRICS (Subsystems 5, 6)
    // =========================================================================

    /// Pipeline runs by outcome
    pub static ref PIPELINE_RUNS: CounterVec = CounterVec::new(
        Opts::new("qv_pipeline_runs_total", "Pipeline runs by terminal outcome"),
        &["pipeline", "outcome"]  // outcome: success/aborted/failed/rejected
    ).expect("metric creation failed");

    /// Pipeline wall time
    pub static ref PIPELINE_DURATION: HistogramVec = HistogramVec::new(
        HistogramOpts::new("qv_pipeline_duration_seconds", "Time from request to terminal step")
            .buckets(exponential_buckets(0.001, 2.0, 14).expect("bucket layout")),
        &["pipeline"]
    ).expect("metric creation failed");

    /// Ballots committed
    pub static ref VOTES_CAST: Counter = Counter::new(
        "qv_votes_cast_total",
        "Total ballots sealed and committed"
    ).expect("metric creation failed");

    // =========================================================================
    // MIRROR METRICS (Subsystem 4)
    // =========================================================================

    /// Swallowed mirror failures
    pub static ref SYNC_FAILURES: CounterVec = CounterVec::new(
        Opts::new("qv_sync_failures_total", "Remote mirror pushes that failed or timed out"),
        &["endpoint"]  // endpoint: transactions/quantum_keys
    ).expect("metric creation failed");
}

/// Handle for the registered metrics
pub struct MetricsHandle {
    _registry: Arc<Registry>,
}

/// Register all metrics with the global registry.
///
/// Registering twice is harmless: already-registered collectors are skipped.
pub fn register_metrics() -> Result<MetricsHandle, TelemetryError> {
    let metrics: Vec<Box<dyn prometheus::core::Collector>> = vec![
        Box::new(KEYS_GENERATED.clone()),
        Box::new(QBER_RATIO.clone()),
        Box::new(INTERCEPTIONS.clone()),
        Box::new(PIPELINE_RUNS.clone()),
        Box::new(PIPELINE_DURATION.clone()),
        Box::new(VOTES_CAST.clone()),
        Box::new(SYNC_FAILURES.clone()),
    ];

    for metric in metrics {
        match REGISTRY.register(metric) {
            Ok(()) | Err(prometheus::Error::AlreadyReg) => {}
            Err(e) => return Err(TelemetryError::MetricsInit(e.to_string())),
        }
    }

    Ok(MetricsHandle {
        _registry: Arc::new(REGISTRY.clone()),
    })
}

/// Encode all metrics as Prometheus text format.
pub fn gather_metrics() -> Result<String, TelemetryError> {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();
    encoder
        .encode(&metric_families, &mut buffer)
        .map_err(|e| TelemetryError::MetricsInit(e.to_string()))?;
    String::from_utf8(buffer).map_err(|e| TelemetryError::MetricsInit(e.to_string()))
}

/// Timer guard for automatic histogram observation.
pub struct HistogramTimer {
    histogram: Histogram,
    start: std::time::Instant,
}

impl HistogramTimer {
    /// Start a new timer for the given histogram.
    pub fn new(histogram: &Histogram) -> Self {
        Self {
            histogram: histogram.clone(),
            start: std::time::Instant::now(),
        }
    }
}

impl Drop for HistogramTimer {
    fn drop(&mut self) {
        self.histogram.observe(self.start.elapsed().as_secs_f64());
    }
}

/// Start timing a pipeline run. Observation happens on drop.
#[macro_export]
macro_rules! time_pipeline {
    ($pipeline:expr) => {
        $crate::metrics::HistogramTimer::new(
            &$crate::metrics::PIPELINE_DURATION.with_label_values(&[$pipeline]),
        )
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_metrics_twice() {
        assert!(register_metrics().is_ok());
        assert!(register_metrics().is_ok());
    }

    #[test]
    fn test_counter_increment() {
        PIPELINE_RUNS
            .with_label_values(&["transaction", "success"])
            .inc();
        assert!(
            PIPELINE_RUNS
                .with_label_values(&["transaction", "success"])
                .get()
                >= 1.0
        );
    }

    #[test]
    fn test_gather_contains_registered_metric() {
        register_metrics().unwrap();
        VOTES_CAST.inc();
        let text = gather_metrics().unwrap();
        assert!(text.contains("qv_votes_cast_total"));
    }

    #[test]
    fn test_pipeline_timer() {
        let _timer = time_pipeline!("vote");
        std::thread::sleep(std::time::Duration::from_millis(1));
    }
}
