//! Binary entry point: wire config, store, forwarder, and server together.

use std::sync::Arc;

use anyhow::Result;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use sparql_proxy::api::server::{start_server, AppState};
use sparql_proxy::config::Config;
use sparql_proxy::proxy::QueryProxy;
use sparql_proxy::store::{CacheStore, MemoryStore, RedisStore};
use sparql_proxy::upstream::SparqlForwarder;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env();
    info!("Upstream SPARQL endpoint: {}", config.sparql_endpoint);

    // A dead Redis never blocks startup: fall back to the in-process store so
    // the proxy still answers queries, just with a per-process cache.
    let store: Arc<dyn CacheStore> =
        match RedisStore::connect(&config.redis_url, config.store_timeout()).await {
            Ok(store) => Arc::new(store),
            Err(e) => {
                warn!("{}; falling back to in-memory cache", e);
                Arc::new(MemoryStore::new())
            }
        };

    let forwarder = SparqlForwarder::new(&config.sparql_endpoint, config.upstream_timeout())?;
    let proxy = QueryProxy::new(store, Arc::new(forwarder), config.cache_ttl_secs);
    let state = AppState::new(Arc::new(proxy), config.model_file.clone());

    start_server(&config.listen_addr(), state, config.static_dir.clone())
        .await
        .map_err(|e| anyhow::anyhow!(e))?;
    Ok(())
}
