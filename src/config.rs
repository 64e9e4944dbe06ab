//! Runtime configuration, read from the environment.
//!
//! | Variable | Default |
//! |----------|---------|
//! | `INVENTORY_API_URL` | `http://localhost:5000` |
//! | `INVENTORY_API_TIMEOUT_SECS` | `30` |
//! | `INVENTORY_CHANNEL_CAPACITY` | `32` |
//!
//! A `.env` file in the working directory is loaded first when present.

use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_API_URL: &str = "http://localhost:5000";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_CHANNEL_CAPACITY: usize = 32;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{name} must be a positive integer, got {value:?}")]
    InvalidNumber { name: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InventoryConfig {
    /// Base URL of the backend; the collection lives at `{api_url}/api/products`.
    pub api_url: String,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
    /// Capacity of the controller's request channel.
    pub channel_capacity: usize,
}

impl Default for InventoryConfig {
    fn default() -> Self {
        Self::new(DEFAULT_API_URL)
    }
}

impl InventoryConfig {
    pub fn new(api_url: impl Into<String>) -> Self {
        Self {
            api_url: api_url.into(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            channel_capacity: DEFAULT_CHANNEL_CAPACITY,
        }
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds a config from any variable source. `from_env` passes `std::env::var`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::new(
            lookup("INVENTORY_API_URL").unwrap_or_else(|| DEFAULT_API_URL.to_string()),
        );
        if let Some(value) = lookup("INVENTORY_API_TIMEOUT_SECS") {
            config.timeout_secs = parse_positive("INVENTORY_API_TIMEOUT_SECS", &value)?;
        }
        if let Some(value) = lookup("INVENTORY_CHANNEL_CAPACITY") {
            config.channel_capacity =
                parse_positive("INVENTORY_CHANNEL_CAPACITY", &value)? as usize;
        }
        Ok(config)
    }

    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

fn parse_positive(name: &'static str, value: &str) -> Result<u64, ConfigError> {
    match value.trim().parse::<u64>() {
        Ok(number) if number > 0 => Ok(number),
        _ => Err(ConfigError::InvalidNumber {
            name,
            value: value.to_string(),
        }),
    }
}
