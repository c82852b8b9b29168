//! # Custody Telemetry
//!
//! Structured logging and Prometheus metrics for the custody node.
//!
//! ## Components
//!
//! - **Logs**: `tracing-subscriber` with an `EnvFilter` and pretty or JSON output
//! - **Metrics**: Prometheus counters for ledger and transfer activity
//!
//! ## Usage
//!
//! ```rust,ignore
//! use custody_telemetry::{init_telemetry, TelemetryConfig};
//!
//! fn main() {
//!     let config = TelemetryConfig::from_env();
//!     init_telemetry(&config).expect("Failed to init telemetry");
//! }
//! ```
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `CB_SERVICE_NAME` | `custody-node` | Service name in the startup log |
//! | `CB_LOG_LEVEL` | `info` | Log filter (falls back to `RUST_LOG`) |
//! | `CB_JSON_LOGS` | `false` | JSON log output (`true` inside containers) |
//! | `CB_CONSOLE_OUTPUT` | `true` | Write logs to stdout |

#![warn(missing_docs)]

mod config;
pub mod metrics;
mod tracing_setup;

pub use config::{is_truthy, TelemetryConfig};
pub use metrics::{
    gather_metrics, record_rejection, register_metrics, DEPOSITS, EVENTS_EMITTED, RELAY_ATTEMPTS,
    RELAY_DURATION, REJECTED_OPERATIONS, TRANSFERS_COMPLETED, TRANSFERS_INITIATED,
    TRANSFERS_PENDING, WITHDRAWALS,
};
pub use tracing_setup::{build_filter, init_tracing};

use thiserror::Error;

/// Telemetry initialization errors
#[derive(Error, Debug)]
pub enum TelemetryError {
    /// The subscriber or its filter could not be installed.
    #[error("Failed to initialize tracing: {0}")]
    TracerInit(String),

    /// A metric could not be registered or encoded.
    #[error("Failed to initialize Prometheus metrics: {0}")]
    MetricsInit(String),
}

/// Register metrics and install the tracing subscriber.
pub fn init_telemetry(config: &TelemetryConfig) -> Result<(), TelemetryError> {
    register_metrics()?;
    init_tracing(config)
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
