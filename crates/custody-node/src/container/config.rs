//! # Node Configuration
//!
//! Runtime configuration for the custody node, loaded from `CB_*`
//! environment variables.
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `CB_OWNER` | `admin` | Access-control owner and relayer principal |
//! | `CB_SUPPORTED_CHAINS` | (none) | Comma-separated destination chain ids |
//! | `CB_EVENT_CAPACITY` | `1024` | Broadcast buffer per subscriber |
//! | `CB_RELAYER_ENABLED` | `true` | Run the in-process relayer |
//! | `CB_RELAYER_ACK_DELAY_MS` | `0` | Delay before acknowledging a transfer |
//! | `CB_RELAYER_RETRY_MS` | `1000` | Interval between redelivery attempts |

use custody_core::{ChainId, CustodyConfig, Principal};
use custody_telemetry::{is_truthy, TelemetryConfig};
use std::env;
use std::str::FromStr;
use thiserror::Error;

/// Complete node configuration.
#[derive(Debug, Clone, Default)]
pub struct NodeConfig {
    /// Custody core configuration.
    pub custody: CustodyConfig,
    /// Relayer configuration.
    pub relayer: RelayerConfig,
    /// Logging configuration.
    pub telemetry: TelemetryConfig,
}

/// In-process relayer configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelayerConfig {
    /// Whether the relayer task is spawned.
    pub enabled: bool,
    /// Delay before each acknowledgment, in milliseconds.
    pub ack_delay_ms: u64,
    /// Interval between redeliveries of transiently failed transfers, in
    /// milliseconds.
    pub retry_interval_ms: u64,
}

/// Default redelivery interval.
pub const DEFAULT_RETRY_INTERVAL_MS: u64 = 1_000;

impl Default for RelayerConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            ack_delay_ms: 0,
            retry_interval_ms: DEFAULT_RETRY_INTERVAL_MS,
        }
    }
}

/// Configuration errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// Owner principal is empty.
    #[error("CB_OWNER must not be empty")]
    EmptyOwner,

    /// Event channel would hold nothing.
    #[error("CB_EVENT_CAPACITY must be greater than zero")]
    ZeroCapacity,

    /// Relayer would redeliver in a busy loop.
    #[error("CB_RELAYER_RETRY_MS must be greater than zero")]
    ZeroRetryInterval,

    /// A variable could not be parsed.
    #[error("invalid value for {key}: {value:?}")]
    InvalidValue {
        /// Variable name
        key: &'static str,
        /// Raw value
        value: String,
    },
}

impl NodeConfig {
    /// Load configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self {
            telemetry: TelemetryConfig::from_lookup(&lookup),
            ..Self::default()
        };

        if let Some(owner) = lookup("CB_OWNER") {
            config.custody.owner = Principal::new(owner.trim());
        }
        if let Some(chains) = lookup("CB_SUPPORTED_CHAINS") {
            config.custody.supported_chains = parse_chains(&chains)?;
        }
        if let Some(capacity) = lookup("CB_EVENT_CAPACITY") {
            config.custody.event_channel_capacity = parse("CB_EVENT_CAPACITY", &capacity)?;
        }
        if let Some(enabled) = lookup("CB_RELAYER_ENABLED") {
            config.relayer.enabled = is_truthy(&enabled);
        }
        if let Some(delay) = lookup("CB_RELAYER_ACK_DELAY_MS") {
            config.relayer.ack_delay_ms = parse("CB_RELAYER_ACK_DELAY_MS", &delay)?;
        }
        if let Some(retry) = lookup("CB_RELAYER_RETRY_MS") {
            config.relayer.retry_interval_ms = parse("CB_RELAYER_RETRY_MS", &retry)?;
        }

        Ok(config)
    }

    /// Reject configurations the node cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.custody.owner.as_str().is_empty() {
            return Err(ConfigError::EmptyOwner);
        }
        if self.custody.event_channel_capacity == 0 {
            return Err(ConfigError::ZeroCapacity);
        }
        if self.relayer.retry_interval_ms == 0 {
            return Err(ConfigError::ZeroRetryInterval);
        }
        Ok(())
    }
}

fn parse<T: FromStr>(key: &'static str, raw: &str) -> Result<T, ConfigError> {
    raw.trim().parse().map_err(|_| ConfigError::InvalidValue {
        key,
        value: raw.to_string(),
    })
}

fn parse_chains(raw: &str) -> Result<Vec<ChainId>, ConfigError> {
    raw.split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(|part| parse("CB_SUPPORTED_CHAINS", part).map(ChainId))
        .collect()
}
