//! Token cache configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// Token cache configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CacheConfig {
    /// Prefix for cache keys. The auth token lives at `{prefix}auth_token`.
    #[serde(default = "default_key_prefix")]
    pub key_prefix: String,

    /// Seconds subtracted from the token's reported expiry so the cache
    /// entry lapses before the token actually does.
    #[serde(default = "default_ttl_buffer")]
    pub ttl_buffer_secs: u64,
}

impl CacheConfig {
    /// Cache key for the auth token.
    pub fn token_key(&self) -> String {
        format!("{}auth_token", self.key_prefix)
    }

    /// Get the TTL buffer as a Duration.
    pub fn ttl_buffer(&self) -> Duration {
        Duration::from_secs(self.ttl_buffer_secs)
    }

    /// Validate cache configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.key_prefix.is_empty() {
            return Err(ValidationError::EmptyCachePrefix);
        }
        Ok(())
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            key_prefix: default_key_prefix(),
            ttl_buffer_secs: default_ttl_buffer(),
        }
    }
}

fn default_key_prefix() -> String {
    "securepay_".to_string()
}

fn default_ttl_buffer() -> u64 {
    60
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_config_defaults() {
        let config = CacheConfig::default();
        assert_eq!(config.key_prefix, "securepay_");
        assert_eq!(config.ttl_buffer_secs, 60);
    }

    #[test]
    fn test_token_key_uses_prefix() {
        let config = CacheConfig {
            key_prefix: "myapp_".to_string(),
            ..Default::default()
        };
        assert_eq!(config.token_key(), "myapp_auth_token");
    }

    #[test]
    fn test_ttl_buffer_duration() {
        let config = CacheConfig {
            ttl_buffer_secs: 120,
            ..Default::default()
        };
        assert_eq!(config.ttl_buffer(), Duration::from_secs(120));
    }

    #[test]
    fn test_validation_empty_prefix() {
        let config = CacheConfig {
            key_prefix: String::new(),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_valid_config() {
        assert!(CacheConfig::default().validate().is_ok());
    }
}
