//! Crate-wide error type and `Result` alias.
//!
//! Only [`ProxyError::Upstream`] ever reaches a caller as a failure; the
//! cache-layer variants are recovered internally (a read error degrades to a
//! miss, a write error is logged and swallowed).

use thiserror::Error;

/// Errors produced by the proxy core.
#[derive(Debug, Error)]
pub enum ProxyError {
    /// The caller supplied no query, or an empty one. Rejected before any
    /// key derivation, store access, or upstream call.
    #[error("missing or empty query")]
    EmptyQuery,

    /// The cache store could not be reached or timed out. Never surfaced to
    /// the caller; the proxy falls through to the upstream endpoint.
    #[error("cache store unavailable: {0}")]
    Store(String),

    /// The upstream SPARQL endpoint failed: network error, non-success
    /// status, unparseable body, or timeout. The single fatal path.
    #[error("upstream query failed: {0}")]
    Upstream(String),

    /// A result could not be serialized for caching or deserialized on a hit.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ProxyError>;
