use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

pub const INSTRUMENTATION_ENV: &str = "STAGESCOPE_INSTRUMENTATION";
pub const LOG_FILTER_ENV: &str = "STAGESCOPE_LOG";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value for {key}: {value:?}")]
    InvalidFlag { key: String, value: String },
    #[error("malformed telemetry config: {0}")]
    Malformed(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TelemetryConfig {
    /// Gates counters, phases and structured events. Trace lines for elapsed
    /// durations and log calls are written regardless.
    pub instrumentation: bool,
    pub log_filter: String,
    pub record_capacity: usize,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            instrumentation: false,
            log_filter: "info".to_string(),
            record_capacity: 10_000,
        }
    }
}

impl TelemetryConfig {
    pub fn instrumented() -> Self {
        Self { instrumentation: true, ..Self::default() }
    }

    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from any key lookup; unknown flag values keep the default.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        if let Some(raw) = lookup(INSTRUMENTATION_ENV) {
            match parse_flag(INSTRUMENTATION_ENV, &raw) {
                Ok(flag) => config.instrumentation = flag,
                Err(e) => warn!("{}; keeping instrumentation={}", e, config.instrumentation),
            }
        }
        if let Some(filter) = lookup(LOG_FILTER_ENV) {
            if !filter.trim().is_empty() {
                config.log_filter = filter;
            }
        }
        config
    }

    pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(raw).map_err(|e| ConfigError::Malformed(e.to_string()))
    }
}

pub fn parse_flag(key: &str, raw: &str) -> Result<bool, ConfigError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        _ => Err(ConfigError::InvalidFlag {
            key: key.to_string(),
            value: raw.to_string(),
        }),
    }
}

/// Installs the global fmt subscriber. Later calls leave the first one in place.
pub fn init_tracing(config: &TelemetryConfig) {
    let filter = EnvFilter::try_new(&config.log_filter).unwrap_or_else(|_| EnvFilter::new("info"));
    if let Err(e) = tracing_subscriber::fmt().with_env_filter(filter).try_init() {
        debug!("Global subscriber already installed: {}", e);
    }
}
