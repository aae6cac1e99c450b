// Copyright (c) 2025 - Cowboy AI, Inc.
//! Resolution configuration

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

use crate::domain::FAN_INTERFACE_PREFIX;
use crate::errors::{NetworkInfoError, NetworkResult};
use crate::retry::{
    Clock, RetryFactory, RetryPolicy, WallClock, DEFAULT_RETRY_DELAY, DEFAULT_RETRY_MAX_DURATION,
};

/// Configuration for network info resolution
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkInfoConfig {
    /// Delay between address polling attempts
    pub retry_delay: Duration,
    /// Upper bound on total polling time
    pub retry_max_duration: Duration,
    /// Interface name prefix identifying fan overlay devices
    pub fan_interface_prefix: String,
}

impl Default for NetworkInfoConfig {
    fn default() -> Self {
        Self {
            retry_delay: DEFAULT_RETRY_DELAY,
            retry_max_duration: DEFAULT_RETRY_MAX_DURATION,
            fan_interface_prefix: FAN_INTERFACE_PREFIX.to_string(),
        }
    }
}

impl NetworkInfoConfig {
    /// Load configuration from environment variables
    ///
    /// - `NETWORK_INFO_RETRY_DELAY_SECS`
    /// - `NETWORK_INFO_RETRY_MAX_SECS`
    /// - `NETWORK_INFO_FAN_PREFIX`
    pub fn from_env() -> NetworkResult<Self> {
        let defaults = Self::default();

        let retry_delay = env_secs("NETWORK_INFO_RETRY_DELAY_SECS")?.unwrap_or(defaults.retry_delay);
        let retry_max_duration =
            env_secs("NETWORK_INFO_RETRY_MAX_SECS")?.unwrap_or(defaults.retry_max_duration);
        let fan_interface_prefix = std::env::var("NETWORK_INFO_FAN_PREFIX")
            .unwrap_or(defaults.fan_interface_prefix);

        let config = Self {
            retry_delay,
            retry_max_duration,
            fan_interface_prefix,
        };
        config.validate()?;
        Ok(config)
    }

    /// Parse a JSON document; absent fields take their defaults
    pub fn from_json(raw: &str) -> NetworkResult<Self> {
        let config: Self = serde_json::from_str(raw)
            .map_err(|e| NetworkInfoError::Configuration(format!("invalid config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> NetworkResult<()> {
        if self.retry_delay.is_zero() {
            return Err(NetworkInfoError::Configuration(
                "retry delay must be greater than zero".to_string(),
            ));
        }
        if self.retry_max_duration < self.retry_delay {
            return Err(NetworkInfoError::Configuration(format!(
                "retry max duration {:?} is shorter than the delay {:?}",
                self.retry_max_duration, self.retry_delay
            )));
        }
        if self.fan_interface_prefix.is_empty() {
            return Err(NetworkInfoError::Configuration(
                "fan interface prefix is empty".to_string(),
            ));
        }
        Ok(())
    }

    /// Retry factory on the wall clock
    pub fn retry_factory(&self) -> RetryFactory {
        self.retry_factory_with_clock(Arc::new(WallClock))
    }

    /// Retry factory on an injected clock
    pub fn retry_factory_with_clock(&self, clock: Arc<dyn Clock>) -> RetryFactory {
        let delay = self.retry_delay;
        let max_duration = self.retry_max_duration;
        Arc::new(move || RetryPolicy::new(Arc::clone(&clock), delay, max_duration))
    }
}

fn env_secs(name: &str) -> NetworkResult<Option<Duration>> {
    match std::env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse::<u64>()
            .map(|secs| Some(Duration::from_secs(secs)))
            .map_err(|_| NetworkInfoError::Configuration(format!("{name}={raw:?} is not a number of seconds"))),
        Err(_) => Ok(None),
    }
}
