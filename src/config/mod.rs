//! Configuration module - environment variable parsing

use std::env;

/// Application configuration loaded from environment variables
#[derive(Clone, Debug)]
pub struct Config {
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
    /// Side length of the square battle map, in cells
    pub map_size: i32,
    /// Seed for the battle's deterministic random generator
    pub seed: u64,
    /// Optional cap on simulation ticks for headless runs
    pub max_ticks: Option<u64>,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        let log_level = env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let map_size = match env::var("MAP_SIZE") {
            Ok(raw) => raw
                .parse::<i32>()
                .map_err(|_| ConfigError::Invalid("MAP_SIZE"))?,
            Err(_) => 20,
        };
        if map_size < 1 {
            return Err(ConfigError::Invalid("MAP_SIZE"));
        }

        let seed = match env::var("BATTLE_SEED") {
            Ok(raw) => raw
                .parse::<u64>()
                .map_err(|_| ConfigError::Invalid("BATTLE_SEED"))?,
            Err(_) => crate::util::time::unix_millis(),
        };

        let max_ticks = match env::var("MAX_TICKS") {
            Ok(raw) => Some(
                raw.parse::<u64>()
                    .map_err(|_| ConfigError::Invalid("MAX_TICKS"))?,
            ),
            Err(_) => None,
        };

        Ok(Self {
            log_level,
            map_size,
            seed,
            max_ticks,
        })
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for environment variable: {0}")]
    Invalid(&'static str),
}
