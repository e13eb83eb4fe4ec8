//! Redis-backed token cache for multi-server deployments.
//!
//! Stores the bearer token under a single key with `SET ... EX`, leaving
//! expiry entirely to Redis. Any server in the fleet can read the token any
//! other server minted.

use async_trait::async_trait;
use redis::aio::MultiplexedConnection;
use redis::AsyncCommands;
use std::time::Duration;

use crate::config::RedisConfig;
use crate::ports::{CacheError, TokenCache};

/// Redis-backed `TokenCache` implementation.
#[derive(Clone)]
pub struct RedisTokenCache {
    conn: MultiplexedConnection,
}

impl RedisTokenCache {
    /// Create a cache over an existing multiplexed connection.
    pub fn new(conn: MultiplexedConnection) -> Self {
        Self { conn }
    }

    /// Connect to Redis using the given configuration.
    pub async fn connect(config: &RedisConfig) -> Result<Self, CacheError> {
        let client = redis::Client::open(config.url.as_str())
            .map_err(|e| CacheError::Unavailable(e.to_string()))?;

        let conn = tokio::time::timeout(config.timeout(), client.get_multiplexed_async_connection())
            .await
            .map_err(|_| CacheError::Unavailable("Redis connection timed out".to_string()))?
            .map_err(|e| CacheError::Unavailable(e.to_string()))?;

        Ok(Self::new(conn))
    }
}

#[async_trait]
impl TokenCache for RedisTokenCache {
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        let mut conn = self.conn.clone();
        conn.get(key)
            .await
            .map_err(|e: redis::RedisError| CacheError::Unavailable(e.to_string()))
    }

    async fn put(&self, key: &str, value: &str, ttl: Duration) -> Result<(), CacheError> {
        let mut conn = self.conn.clone();
        // SET key value EX ttl; floor to one second, redis rejects EX 0
        let ttl_secs = ttl.as_secs().max(1);
        redis::cmd("SET")
            .arg(key)
            .arg(value)
            .arg("EX")
            .arg(ttl_secs)
            .query_async::<_, ()>(&mut conn)
            .await
            .map_err(|e: redis::RedisError| CacheError::Unavailable(e.to_string()))
    }

    async fn delete(&self, key: &str) -> Result<(), CacheError> {
        let mut conn = self.conn.clone();
        // DEL on an absent key is a no-op
        conn.del::<_, ()>(key)
            .await
            .map_err(|e: redis::RedisError| CacheError::Unavailable(e.to_string()))
    }
}
