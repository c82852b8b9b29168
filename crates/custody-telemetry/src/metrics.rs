//! Prometheus metrics for the custody node.
//!
//! All metrics follow the naming convention: `cb_<area>_<metric>_<unit>`
//!
//! ## Metric Types
//!
//! - **Counter**: Monotonically increasing value (e.g., cb_ledger_deposits_total)
//! - **Gauge**: Value that can go up or down (e.g., cb_transfers_pending)
//! - **Histogram**: Distribution of values (e.g., cb_relayer_delivery_duration_seconds)

use lazy_static::lazy_static;
use prometheus::{
    exponential_buckets, Counter, CounterVec, Encoder, Gauge, Histogram, HistogramOpts, Opts,
    Registry, TextEncoder,
};

use crate::TelemetryError;

lazy_static! {
    /// Global metrics registry
    pub static ref REGISTRY: Registry = Registry::new();

    // =========================================================================
    // LEDGER METRICS
    // =========================================================================

    /// Deposits credited
    pub static ref DEPOSITS: CounterVec = CounterVec::new(
        Opts::new("cb_ledger_deposits_total", "Deposits credited to holdings"),
        &["asset"]
    ).expect("metric creation failed");

    /// Withdrawals paid out
    pub static ref WITHDRAWALS: CounterVec = CounterVec::new(
        Opts::new("cb_ledger_withdrawals_total", "Withdrawals paid out of holdings"),
        &["asset"]
    ).expect("metric creation failed");

    // =========================================================================
    // TRANSFER METRICS
    // =========================================================================

    /// Transfers initiated, by destination chain
    pub static ref TRANSFERS_INITIATED: CounterVec = CounterVec::new(
        Opts::new("cb_transfers_initiated_total", "Cross-chain transfers initiated"),
        &["target_chain"]
    ).expect("metric creation failed");

    /// Transfers acknowledged by the relayer
    pub static ref TRANSFERS_COMPLETED: Counter = Counter::new(
        "cb_transfers_completed_total",
        "Cross-chain transfers completed"
    ).expect("metric creation failed");

    /// Transfers initiated but not yet completed
    pub static ref TRANSFERS_PENDING: Gauge = Gauge::new(
        "cb_transfers_pending",
        "Transfers awaiting relayer acknowledgment"
    ).expect("metric creation failed");

    // =========================================================================
    // RELAYER METRICS
    // =========================================================================

    /// Destination-side delivery duration
    pub static ref RELAY_DURATION: Histogram = Histogram::with_opts(
        HistogramOpts::new(
            "cb_relayer_delivery_duration_seconds",
            "Time from receiving TransferInitiated to acknowledging it"
        ).buckets(exponential_buckets(0.001, 2.0, 15).expect("valid buckets"))
    ).expect("metric creation failed");

    /// Relayer delivery attempts by outcome
    pub static ref RELAY_ATTEMPTS: CounterVec = CounterVec::new(
        Opts::new("cb_relayer_attempts_total", "Relayer delivery attempts"),
        &["outcome"]  // outcome: completed/duplicate/failed
    ).expect("metric creation failed");

    // =========================================================================
    // ERROR METRICS
    // =========================================================================

    /// Rejected operations by operation and error kind
    pub static ref REJECTED_OPERATIONS: CounterVec = CounterVec::new(
        Opts::new("cb_rejected_operations_total", "Rejected custody operations"),
        &["operation", "kind"]
    ).expect("metric creation failed");

    /// Events published, by name
    pub static ref EVENTS_EMITTED: CounterVec = CounterVec::new(
        Opts::new("cb_events_emitted_total", "Custody events published"),
        &["event"]
    ).expect("metric creation failed");
}

/// Register all metrics with the global registry. Safe to call repeatedly.
pub fn register_metrics() -> Result<(), TelemetryError> {
    let metrics: Vec<Box<dyn prometheus::core::Collector>> = vec![
        // Ledger
        Box::new(DEPOSITS.clone()),
        Box::new(WITHDRAWALS.clone()),
        // Transfers
        Box::new(TRANSFERS_INITIATED.clone()),
        Box::new(TRANSFERS_COMPLETED.clone()),
        Box::new(TRANSFERS_PENDING.clone()),
        // Relayer
        Box::new(RELAY_DURATION.clone()),
        Box::new(RELAY_ATTEMPTS.clone()),
        // Errors
        Box::new(REJECTED_OPERATIONS.clone()),
        Box::new(EVENTS_EMITTED.clone()),
    ];

    for metric in metrics {
        match REGISTRY.register(metric) {
            Ok(()) | Err(prometheus::Error::AlreadyReg) => {}
            Err(e) => return Err(TelemetryError::MetricsInit(e.to_string())),
        }
    }
    Ok(())
}

/// Record a rejected operation.
pub fn record_rejection(operation: &str, kind: &str) {
    REJECTED_OPERATIONS
        .with_label_values(&[operation, kind])
        .inc();
}

/// Encode all registered metrics as Prometheus text format.
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
        let duration = self.start.elapsed().as_secs_f64();
        self.histogram.observe(duration);
    }
}

/// Start timing for a histogram. Observation happens on drop.
#[macro_export]
macro_rules! time_histogram {
    ($histogram:expr) => {
        $crate::metrics::HistogramTimer::new(&$histogram)
    };
}
