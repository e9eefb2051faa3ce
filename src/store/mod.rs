//! Cache store adapters: get / set-with-expiry over a TTL key/value store.
//!
//! [`RedisStore`] is the production backend; [`MemoryStore`] is the in-process
//! fallback used when Redis is unreachable at startup, so a store outage costs
//! only cache effectiveness, never availability.

pub mod memory;
pub mod redis;

pub use memory::MemoryStore;
pub use redis::RedisStore;

use async_trait::async_trait;

use crate::error::Result;

/// A TTL-expiring key/value store holding serialized query results.
///
/// Absence of a key is `Ok(None)`, never an error; `Err` means the store
/// itself is unavailable (connection failure, operation timeout). Callers are
/// expected to treat a read error as a miss and a write error as non-fatal.
#[async_trait]
pub trait CacheStore: Send + Sync {
    /// Return the stored value for `key` if present and not expired.
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Store `value` under `key`, replacing any prior value, expiring after
    /// `ttl_secs` seconds. `ttl_secs` must be positive.
    async fn set_with_expiry(&self, key: &str, value: &str, ttl_secs: u64) -> Result<()>;
}
