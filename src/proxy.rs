//! Cache proxy orchestration: lookup → hit/miss → forward → populate → respond.
//!
//! Per-request protocol over a shared store and forwarder. Cache failures are
//! never fatal: a read error is treated as a miss and a write error is logged
//! and swallowed, so a store outage only costs latency. The sole fatal path is
//! an upstream failure on a cold key. Two concurrent misses for the same key
//! may both forward and both populate; last write wins, which is consistent
//! with entries being immutable-by-replacement.

use std::sync::Arc;

use serde_json::Value;
use tracing::{info, warn};

use crate::error::{ProxyError, Result};
use crate::keys;
use crate::store::CacheStore;
use crate::upstream::QueryForwarder;

/// Composes the key deriver, cache store, and upstream forwarder into the
/// request-handling protocol. No cross-request state beyond the shared store.
pub struct QueryProxy {
    store: Arc<dyn CacheStore>,
    forwarder: Arc<dyn QueryForwarder>,
    ttl_secs: u64,
}

impl QueryProxy {
    pub fn new(store: Arc<dyn CacheStore>, forwarder: Arc<dyn QueryForwarder>, ttl_secs: u64) -> Self {
        Self {
            store,
            forwarder,
            ttl_secs,
        }
    }

    /// Answer `query`, from cache when possible.
    ///
    /// Returns [`ProxyError::EmptyQuery`] for an empty query (no side effects)
    /// and [`ProxyError::Upstream`] when the endpoint fails on a cold key.
    pub async fn submit(&self, query: &str) -> Result<Value> {
        if query.is_empty() {
            return Err(ProxyError::EmptyQuery);
        }

        let key = keys::derive(query);

        match self.store.get(&key).await {
            Ok(Some(cached)) => match serde_json::from_str::<Value>(&cached) {
                Ok(value) => {
                    info!(key = %&key[..8], "Cache hit");
                    return Ok(value);
                }
                Err(e) => {
                    // An undecodable entry is as useless as an absent one.
                    warn!(key = %&key[..8], "Cached entry is corrupt, refetching: {}", e);
                }
            },
            Ok(None) => {
                info!(key = %&key[..8], "Cache miss");
            }
            Err(e) => {
                warn!(key = %&key[..8], "Cache read failed, treating as miss: {}", e);
            }
        }

        let result = self.forwarder.forward(query).await?;
        self.populate(&key, &result).await;
        Ok(result)
    }

    /// Write-through after a successful upstream call. Decoupled from the
    /// response path: any failure is logged, never propagated.
    async fn populate(&self, key: &str, result: &Value) {
        let serialized = match serde_json::to_string(result) {
            Ok(s) => s,
            Err(e) => {
                warn!(key = %&key[..8], "Failed to serialize result for caching: {}", e);
                return;
            }
        };
        if let Err(e) = self
            .store
            .set_with_expiry(key, &serialized, self.ttl_secs)
            .await
        {
            warn!(key = %&key[..8], "Cache write failed: {}", e);
        }
    }
}

impl std::fmt::Debug for QueryProxy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueryProxy")
            .field("ttl_secs", &self.ttl_secs)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Forwarder returning a fixed result and counting invocations.
    struct CountingForwarder {
        calls: AtomicUsize,
        fail: bool,
    }

    impl CountingForwarder {
        fn ok() -> Self {
            Self {
                calls: AtomicUsize::new(0),
                fail: false,
            }
        }

        fn failing() -> Self {
            Self {
                calls: AtomicUsize::new(0),
                fail: true,
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl QueryForwarder for CountingForwarder {
        async fn forward(&self, query: &str) -> Result<Value> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                Err(ProxyError::Upstream("simulated endpoint failure".into()))
            } else {
                Ok(json!({ "results": { "bindings": [{ "q": query }] } }))
            }
        }
    }

    /// Store where every operation fails, counting attempts.
    #[derive(Default)]
    struct UnavailableStore {
        reads: AtomicUsize,
        writes: AtomicUsize,
    }

    #[async_trait]
    impl CacheStore for UnavailableStore {
        async fn get(&self, _key: &str) -> Result<Option<String>> {
            self.reads.fetch_add(1, Ordering::SeqCst);
            Err(ProxyError::Store("connection refused".into()))
        }

        async fn set_with_expiry(&self, _key: &str, _value: &str, _ttl: u64) -> Result<()> {
            self.writes.fetch_add(1, Ordering::SeqCst);
            Err(ProxyError::Store("connection refused".into()))
        }
    }

    const QUERY: &str = "SELECT * WHERE { ?s ?p ?o }";

    fn proxy_with(
        store: Arc<dyn CacheStore>,
        forwarder: Arc<dyn QueryForwarder>,
    ) -> QueryProxy {
        QueryProxy::new(store, forwarder, 3600)
    }

    #[tokio::test]
    async fn test_empty_query_rejected_without_side_effects() {
        let store = Arc::new(UnavailableStore::default());
        let forwarder = Arc::new(CountingForwarder::ok());
        let proxy = proxy_with(store.clone(), forwarder.clone());

        let err = proxy.submit("").await.unwrap_err();
        assert!(matches!(err, ProxyError::EmptyQuery));
        assert_eq!(store.reads.load(Ordering::SeqCst), 0);
        assert_eq!(store.writes.load(Ordering::SeqCst), 0);
        assert_eq!(forwarder.calls(), 0);
    }

    #[tokio::test]
    async fn test_warm_cache_skips_upstream() {
        let store = Arc::new(MemoryStore::new());
        let forwarder = Arc::new(CountingForwarder::ok());
        let proxy = proxy_with(store, forwarder.clone());

        let first = proxy.submit(QUERY).await.unwrap();
        let second = proxy.submit(QUERY).await.unwrap();

        assert_eq!(first, second, "hit must round-trip to the same structure");
        assert_eq!(forwarder.calls(), 1, "second call must be served from cache");
    }

    #[tokio::test]
    async fn test_distinct_queries_each_forward() {
        let store = Arc::new(MemoryStore::new());
        let forwarder = Arc::new(CountingForwarder::ok());
        let proxy = proxy_with(store, forwarder.clone());

        proxy.submit("SELECT ?a WHERE {}").await.unwrap();
        proxy.submit("SELECT ?b WHERE {}").await.unwrap();
        assert_eq!(forwarder.calls(), 2);
    }

    #[tokio::test]
    async fn test_expired_entry_forwards_again() {
        let store = Arc::new(MemoryStore::new());
        let forwarder = Arc::new(CountingForwarder::ok());
        let proxy = proxy_with(store.clone(), forwarder.clone());

        proxy.submit(QUERY).await.unwrap();
        store.force_expire(&keys::derive(QUERY));
        proxy.submit(QUERY).await.unwrap();

        assert_eq!(forwarder.calls(), 2, "expired entry must trigger a re-forward");
    }

    #[tokio::test]
    async fn test_upstream_failure_writes_nothing() {
        let store = Arc::new(MemoryStore::new());
        let forwarder = Arc::new(CountingForwarder::failing());
        let proxy = proxy_with(store.clone(), forwarder);

        let err = proxy.submit(QUERY).await.unwrap_err();
        assert!(matches!(err, ProxyError::Upstream(_)));
        assert_eq!(
            store.get(&keys::derive(QUERY)).await.unwrap(),
            None,
            "no cache entry may be written on upstream failure"
        );
    }

    #[tokio::test]
    async fn test_store_outage_degrades_to_upstream() {
        let store = Arc::new(UnavailableStore::default());
        let forwarder = Arc::new(CountingForwarder::ok());
        let proxy = proxy_with(store.clone(), forwarder.clone());

        let result = proxy.submit(QUERY).await.unwrap();
        assert!(result["results"]["bindings"].is_array());
        assert_eq!(forwarder.calls(), 1);
        assert_eq!(
            store.writes.load(Ordering::SeqCst),
            1,
            "a populate attempt is still made; its failure is swallowed"
        );
    }

    #[tokio::test]
    async fn test_corrupt_cached_entry_refetched_and_replaced() {
        let store = Arc::new(MemoryStore::new());
        let key = keys::derive(QUERY);
        store.set_with_expiry(&key, "not json", 3600).await.unwrap();

        let forwarder = Arc::new(CountingForwarder::ok());
        let proxy = proxy_with(store.clone(), forwarder.clone());

        let result = proxy.submit(QUERY).await.unwrap();
        assert_eq!(forwarder.calls(), 1);

        let cached: Value =
            serde_json::from_str(&store.get(&key).await.unwrap().unwrap()).unwrap();
        assert_eq!(cached, result, "corrupt entry must be replaced by the fresh result");
    }

    #[tokio::test]
    async fn test_whitespace_variant_is_a_different_entry() {
        let store = Arc::new(MemoryStore::new());
        let forwarder = Arc::new(CountingForwarder::ok());
        let proxy = proxy_with(store, forwarder.clone());

        proxy.submit(QUERY).await.unwrap();
        proxy.submit(&format!("{} ", QUERY)).await.unwrap();
        assert_eq!(forwarder.calls(), 2, "byte-exact keys: no whitespace folding");
    }
}
