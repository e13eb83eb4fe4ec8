//! Token cache adapters.

mod memory;
mod redis;

pub use memory::InMemoryTokenCache;
pub use redis::RedisTokenCache;
