use dotenv::dotenv;
use std::env;
use thiserror::Error;
use tracing::info;

const HISTORY_CAPACITY: &str = "TOPIC_BUS_HISTORY_CAPACITY";
const CACHE_LIMIT: &str = "TOPIC_BUS_CACHE_LIMIT";

/// Default number of emissions retained for `history` queries
pub const DEFAULT_HISTORY_CAPACITY: usize = 9999;

/// Default number of topics kept in the match cache
pub const DEFAULT_CACHE_LIMIT: usize = 4096;

/// Errors raised while building a bus configuration
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// An environment variable held something other than a non-negative integer
    #[error("failed to parse environment variable {name}: '{value}'")]
    InvalidNumber { name: &'static str, value: String },

    /// The match cache must be able to hold at least one topic
    #[error("cache limit must be at least 1")]
    ZeroCacheLimit,
}

/// Construction-time settings of an event bus
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BusConfig {
    /// Number of emissions retained for history queries, zero disables recording
    pub history_capacity: usize,
    /// Number of distinct topics the match cache holds before it is reset
    pub cache_limit: usize,
}

impl Default for BusConfig {
    fn default() -> Self {
        Self {
            history_capacity: DEFAULT_HISTORY_CAPACITY,
            cache_limit: DEFAULT_CACHE_LIMIT,
        }
    }
}

impl BusConfig {
    /// Sets the history capacity
    pub fn with_history_capacity(mut self, history_capacity: usize) -> Self {
        self.history_capacity = history_capacity;
        self
    }

    /// Sets the match cache limit
    pub fn with_cache_limit(mut self, cache_limit: usize) -> Self {
        self.cache_limit = cache_limit;
        self
    }

    /// Checks the settings are usable
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.cache_limit == 0 {
            return Err(ConfigError::ZeroCacheLimit);
        }
        Ok(())
    }

    /// Loads settings from the environment (and a `.env` file if present),
    /// falling back to the defaults for unset variables.
    pub fn try_from_env() -> Result<BusConfig, ConfigError> {
        dotenv().ok();

        let defaults = Self::default();
        let config = BusConfig {
            history_capacity: read_usize(HISTORY_CAPACITY)?.unwrap_or(defaults.history_capacity),
            cache_limit: read_usize(CACHE_LIMIT)?.unwrap_or(defaults.cache_limit),
        };
        config.validate()?;

        info!(
            history_capacity = config.history_capacity,
            cache_limit = config.cache_limit,
            "Loaded bus configuration"
        );

        Ok(config)
    }
}

fn read_usize(name: &'static str) -> Result<Option<usize>, ConfigError> {
    match env::var(name) {
        Ok(value) => {
            let parsed = value.trim().parse::<usize>();
            parsed
                .map(Some)
                .map_err(|_| ConfigError::InvalidNumber { name, value })
        }
        Err(_) => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = BusConfig::default();
        assert_eq!(config.history_capacity, 9999);
        assert_eq!(config.cache_limit, 4096);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder() {
        let config = BusConfig::default()
            .with_history_capacity(0)
            .with_cache_limit(8);

        assert_eq!(config.history_capacity, 0);
        assert_eq!(config.cache_limit, 8);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_cache_limit_rejected() {
        let config = BusConfig::default().with_cache_limit(0);
        assert_eq!(config.validate(), Err(ConfigError::ZeroCacheLimit));
    }
}
