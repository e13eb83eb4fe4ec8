//! In-memory token cache.
//!
//! Process-local store for single-server deployments and tests. Entries
//! expire lazily on read; there is no background sweeper because the cache
//! holds at most a handful of keys.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use crate::ports::{CacheError, TokenCache};

struct Entry {
    value: String,
    expires_at: Instant,
    ttl: Duration,
}

/// In-memory `TokenCache` implementation.
#[derive(Default)]
pub struct InMemoryTokenCache {
    entries: Mutex<HashMap<String, Entry>>,
}

impl InMemoryTokenCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// The TTL an entry was stored with, in seconds. Test hook.
    pub fn ttl_secs(&self, key: &str) -> Option<u64> {
        self.entries
            .lock()
            .expect("cache mutex poisoned")
            .get(key)
            .map(|entry| entry.ttl.as_secs())
    }
}

#[async_trait]
impl TokenCache for InMemoryTokenCache {
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        let mut entries = self.entries.lock().expect("cache mutex poisoned");

        match entries.get(key) {
            Some(entry) if entry.expires_at > Instant::now() => Ok(Some(entry.value.clone())),
            Some(_) => {
                entries.remove(key);
                Ok(None)
            }
            None => Ok(None),
        }
    }

    async fn put(&self, key: &str, value: &str, ttl: Duration) -> Result<(), CacheError> {
        let mut entries = self.entries.lock().expect("cache mutex poisoned");
        entries.insert(
            key.to_string(),
            Entry {
                value: value.to_string(),
                expires_at: Instant::now() + ttl,
                ttl,
            },
        );
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), CacheError> {
        self.entries
            .lock()
            .expect("cache mutex poisoned")
            .remove(key);
        Ok(())
    }
}
