//! Client configuration module
//!
//! This module provides type-safe configuration loading from environment
//! variables using the `config` and `dotenvy` crates. Configuration is loaded
//! with the `SECUREPAY` prefix and nested values use double underscores as
//! separators.
//!
//! # Example
//!
//! ```no_run
//! use securepay::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//!
//! println!("Gateway: {}", config.gateway.resolve().base_url);
//! ```

mod cache;
mod error;
mod gateway;
mod redis;

pub use cache::CacheConfig;
pub use error::{ConfigError, ValidationError};
pub use gateway::{
    Credentials, Environment, EnvironmentCredentials, EnvironmentUrls, GatewayConfig,
    ResolvedGateway,
};
pub use redis::RedisConfig;

use serde::Deserialize;

/// Root configuration for the SecurePay client.
///
/// Load using [`AppConfig::load()`] which reads from environment variables.
/// Loaded once at startup and immutable thereafter; the resolved gateway
/// settings are the sole source of credentials for the process's lifetime.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Gateway configuration (environment, credentials, URLs)
    #[serde(default)]
    pub gateway: GatewayConfig,

    /// Token cache configuration (key prefix, TTL buffer)
    #[serde(default)]
    pub cache: CacheConfig,

    /// Redis configuration, required only when the Redis token cache is used
    #[serde(default)]
    pub redis: Option<RedisConfig>,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `SECUREPAY` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    /// 4. Deserializes into typed configuration structs
    ///
    /// # Environment Variable Format
    ///
    /// - `SECUREPAY__GATEWAY__ENVIRONMENT=sandbox` -> `gateway.environment`
    /// - `SECUREPAY__GATEWAY__CREDENTIALS__SANDBOX__CLIENT_ID=...`
    /// - `SECUREPAY__CACHE__KEY_PREFIX=securepay_` -> `cache.key_prefix`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if values cannot be parsed into expected types.
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present (development)
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("SECUREPAY")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if any configuration value is invalid.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.gateway.validate()?;
        self.cache.validate()?;
        if let Some(redis) = &self.redis {
            redis.validate()?;
        }
        Ok(())
    }

    /// Check if running against the production gateway
    pub fn is_production(&self) -> bool {
        self.gateway.environment == Environment::Production
    }
}
