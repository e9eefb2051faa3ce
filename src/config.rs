//! Process configuration.
//!
//! Everything comes from environment variables (a `.env` file is honored via
//! dotenvy in `main`) with defaults suitable for a local GraphDB + Redis
//! setup. Invalid numeric values fall back to the default rather than
//! aborting startup.

use std::path::PathBuf;
use std::time::Duration;

/// Runtime configuration for the proxy process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Bind address for the HTTP server.
    pub bind: String,
    /// Port for the HTTP server.
    pub port: u16,
    /// Upstream SPARQL endpoint URL.
    pub sparql_endpoint: String,
    /// Redis connection URL.
    pub redis_url: String,
    /// Fixed TTL applied to every cache entry, in seconds.
    pub cache_ttl_secs: u64,
    /// Per-request timeout for the upstream call, in seconds.
    pub upstream_timeout_secs: u64,
    /// Per-operation timeout for cache store calls, in seconds.
    pub store_timeout_secs: u64,
    /// Directory served as the static frontend, if any.
    pub static_dir: Option<PathBuf>,
    /// RDF mapping file offered for download at `GET /model`, if any.
    pub model_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0".to_string(),
            port: 3000,
            sparql_endpoint: "http://localhost:7200/repositories/test-repo".to_string(),
            redis_url: "redis://127.0.0.1:6379".to_string(),
            cache_ttl_secs: 3600,
            upstream_timeout_secs: 30,
            store_timeout_secs: 2,
            static_dir: None,
            model_file: None,
        }
    }
}

impl Config {
    /// Load configuration from the environment, falling back to defaults for
    /// unset or unparseable values.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            bind: env_or("BIND", defaults.bind),
            port: env_parse("PORT", defaults.port),
            sparql_endpoint: env_or("SPARQL_ENDPOINT", defaults.sparql_endpoint),
            redis_url: env_or("REDIS_URL", defaults.redis_url),
            cache_ttl_secs: env_parse("CACHE_TTL_SECS", defaults.cache_ttl_secs).max(1),
            upstream_timeout_secs: env_parse("UPSTREAM_TIMEOUT_SECS", defaults.upstream_timeout_secs)
                .max(1),
            store_timeout_secs: env_parse("STORE_TIMEOUT_SECS", defaults.store_timeout_secs).max(1),
            static_dir: std::env::var("STATIC_DIR").ok().map(PathBuf::from),
            model_file: std::env::var("MODEL_FILE").ok().map(PathBuf::from),
        }
    }

    pub fn upstream_timeout(&self) -> Duration {
        Duration::from_secs(self.upstream_timeout_secs)
    }

    pub fn store_timeout(&self) -> Duration {
        Duration::from_secs(self.store_timeout_secs)
    }

    /// Socket address string the server binds to.
    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.bind, self.port)
    }
}

fn env_or(name: &str, default: String) -> String {
    std::env::var(name)
        .ok()
        .filter(|v| !v.is_empty())
        .unwrap_or(default)
}

fn env_parse<T: std::str::FromStr>(name: &str, default: T) -> T {
    std::env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
