//! Token cache port.
//!
//! The client stores one bearer token in an external key-value store with a
//! per-key TTL. The store is the sole authority on expiry: a hit is assumed
//! unexpired at the time of read and the client never re-validates locally.

use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

/// Errors from the token cache store.
#[derive(Debug, Clone, Error)]
pub enum CacheError {
    /// The backing store could not be reached or refused the operation.
    #[error("cache store unavailable: {0}")]
    Unavailable(String),
}

/// Port for the token cache store.
///
/// Implementations must make `delete` idempotent: deleting an absent key is
/// a no-op, not an error.
#[async_trait]
pub trait TokenCache: Send + Sync {
    /// Read a value. `None` means absent or expired.
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError>;

    /// Store a value with a TTL, replacing any existing entry wholesale.
    async fn put(&self, key: &str, value: &str, ttl: Duration) -> Result<(), CacheError>;

    /// Remove a value if present.
    async fn delete(&self, key: &str) -> Result<(), CacheError>;
}
