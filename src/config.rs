//! Server configuration from the environment

use std::env;
use std::net::SocketAddr;
use std::time::Duration;

use thiserror::Error;

use crate::pipeline::PipelineConfig;

pub const BIND_ADDR_VAR: &str = "TELEMETRY_BIND_ADDR";
pub const TICK_MS_VAR: &str = "TELEMETRY_TICK_MS";
pub const HISTORY_LIMIT_VAR: &str = "TELEMETRY_HISTORY_LIMIT";
pub const BROADCAST_CAPACITY_VAR: &str = "TELEMETRY_BROADCAST_CAPACITY";

const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3030";
const DEFAULT_BROADCAST_CAPACITY: usize = 1024;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("{var}={value} is invalid: {reason}")]
    Invalid {
        var: &'static str,
        value: String,
        reason: String,
    },
}

/// Settings of the `telemetry-server` binary
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,

    /// Capacity of the observer broadcast channel; slow clients miss older messages
    pub broadcast_capacity: usize,

    pub pipeline: PipelineConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 3030)),
            broadcast_capacity: DEFAULT_BROADCAST_CAPACITY,
            pipeline: PipelineConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Read settings from `TELEMETRY_*` variables, falling back to defaults
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| env::var(var).ok())
    }

    /// Read settings through an arbitrary variable lookup
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        let bind = lookup(BIND_ADDR_VAR).unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        config.bind_addr = bind.parse().map_err(|e: std::net::AddrParseError| ConfigError::Invalid {
            var: BIND_ADDR_VAR,
            value: bind.clone(),
            reason: e.to_string(),
        })?;

        if let Some(ms) = parse_positive(&lookup, TICK_MS_VAR)? {
            config.pipeline.tick_interval = Duration::from_millis(ms as u64);
        }
        if let Some(limit) = parse_positive(&lookup, HISTORY_LIMIT_VAR)? {
            config.pipeline.history_limit = limit;
        }
        if let Some(capacity) = parse_positive(&lookup, BROADCAST_CAPACITY_VAR)? {
            config.broadcast_capacity = capacity;
        }

        Ok(config)
    }
}

fn parse_positive(
    lookup: &impl Fn(&str) -> Option<String>,
    var: &'static str,
) -> Result<Option<usize>, ConfigError> {
    let Some(raw) = lookup(var) else {
        return Ok(None);
    };

    let invalid = |reason: &str| ConfigError::Invalid {
        var,
        value: raw.clone(),
        reason: reason.to_string(),
    };
    match raw.trim().parse::<usize>() {
        Ok(0) => Err(invalid("must be greater than zero")),
        Ok(v) => Ok(Some(v)),
        Err(e) => Err(invalid(&e.to_string())),
    }
}
