//! Redis settings for the shared token cache.
//!
//! Read only when the host selects the Redis-backed token cache so every
//! server in a fleet reuses one bearer token; single-process deployments on
//! the in-memory cache leave this section unset.

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// Connection settings consumed by
/// [`crate::adapters::cache::RedisTokenCache::connect`].
#[derive(Debug, Clone, Deserialize)]
pub struct RedisConfig {
    /// Connection URL, `redis://` or `rediss://` for TLS.
    #[serde(default)]
    pub url: String,

    /// Seconds to wait for the initial connection before giving up.
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl RedisConfig {
    /// Connection timeout as a `Duration`.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Check that a URL is present and carries a Redis scheme.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.url.is_empty() {
            return Err(ValidationError::MissingRequired("redis url"));
        }
        if !self.url.starts_with("redis://") && !self.url.starts_with("rediss://") {
            return Err(ValidationError::InvalidRedisUrl);
        }
        Ok(())
    }
}

impl Default for RedisConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            timeout_secs: default_timeout(),
        }
    }
}

fn default_timeout() -> u64 {
    5
}
