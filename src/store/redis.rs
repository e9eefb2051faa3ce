//! Redis-backed cache store.
//!
//! Uses `GET` / `SET key value EX ttl` through an auto-reconnecting
//! [`ConnectionManager`]. Every operation is wrapped in an explicit timeout so
//! a wedged store degrades the request to a miss instead of hanging it.

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::AsyncCommands;
use tracing::info;

use super::CacheStore;
use crate::error::{ProxyError, Result};

/// Cache store adapter speaking to a Redis server.
#[derive(Clone)]
pub struct RedisStore {
    manager: ConnectionManager,
    op_timeout: Duration,
}

impl RedisStore {
    /// Connect to Redis at `url` and return a store with the given per-call
    /// operation timeout.
    ///
    /// Fails only when the initial connection cannot be established; the
    /// connection manager reconnects on its own afterwards.
    pub async fn connect(url: &str, op_timeout: Duration) -> Result<Self> {
        let client = redis::Client::open(url)
            .map_err(|e| ProxyError::Store(format!("invalid Redis URL: {}", e)))?;
        let manager = client
            .get_connection_manager()
            .await
            .map_err(|e| ProxyError::Store(format!("Redis connection failed: {}", e)))?;
        info!("Connected to Redis at {}", url);
        Ok(Self {
            manager,
            op_timeout,
        })
    }

    /// Bound a store operation by the configured timeout.
    async fn bounded<T>(
        &self,
        fut: impl Future<Output = std::result::Result<T, redis::RedisError>>,
    ) -> Result<T> {
        match tokio::time::timeout(self.op_timeout, fut).await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(e)) => Err(ProxyError::Store(e.to_string())),
            Err(_) => Err(ProxyError::Store(format!(
                "operation timed out after {:?}",
                self.op_timeout
            ))),
        }
    }
}

#[async_trait]
impl CacheStore for RedisStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        // ConnectionManager is a cheap clonable handle over one multiplexed
        // connection.
        let mut conn = self.manager.clone();
        self.bounded(async move { conn.get::<_, Option<String>>(key).await })
            .await
    }

    async fn set_with_expiry(&self, key: &str, value: &str, ttl_secs: u64) -> Result<()> {
        let mut conn = self.manager.clone();
        let key = key.to_string();
        let value = value.to_string();
        self.bounded(async move { conn.set_ex::<_, _, ()>(key, value, ttl_secs).await })
            .await
    }
}

impl std::fmt::Debug for RedisStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisStore")
            .field("op_timeout", &self.op_timeout)
            .finish()
    }
}
