//! Telemetry configuration from environment variables.

use std::env;

/// Configuration for logging and metrics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TelemetryConfig {
    /// Service name attached to the startup log line
    pub service_name: String,

    /// Log filter directive (trace, debug, info, warn, error, or a full
    /// `EnvFilter` expression)
    pub log_level: String,

    /// Whether to write logs to stdout
    pub console_output: bool,

    /// Whether to format logs as JSON
    pub json_logs: bool,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            service_name: "custody-node".to_string(),
            log_level: "info".to_string(),
            console_output: true,
            json_logs: false,
        }
    }
}

impl TelemetryConfig {
    /// Create configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `CB_SERVICE_NAME`: Service name (default: custody-node)
    /// - `CB_LOG_LEVEL` or `RUST_LOG`: Log filter (default: info)
    /// - `CB_CONSOLE_OUTPUT`: Enable console output (default: true)
    /// - `CB_JSON_LOGS`: Enable JSON logs (default: false in dev, true in containers)
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let is_container =
            lookup("KUBERNETES_SERVICE_HOST").is_some() || lookup("DOCKER_CONTAINER").is_some();

        Self {
            service_name: lookup("CB_SERVICE_NAME").unwrap_or_else(|| "custody-node".to_string()),

            log_level: lookup("CB_LOG_LEVEL")
                .or_else(|| lookup("RUST_LOG"))
                .unwrap_or_else(|| "info".to_string()),

            console_output: lookup("CB_CONSOLE_OUTPUT")
                .map(|v| !is_falsy(&v))
                .unwrap_or(true),

            json_logs: lookup("CB_JSON_LOGS")
                .map(|v| is_truthy(&v))
                .unwrap_or(is_container),
        }
    }
}

/// `true`/`1`/`yes`, case-insensitive.
pub fn is_truthy(value: &str) -> bool {
    matches!(value.trim().to_lowercase().as_str(), "true" | "1" | "yes")
}

fn is_falsy(value: &str) -> bool {
    matches!(value.trim().to_lowercase().as_str(), "false" | "0" | "no")
}
