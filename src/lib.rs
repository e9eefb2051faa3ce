//! Caching SPARQL query proxy.
//!
//! Accepts a SPARQL query over HTTP, derives a SHA-256 cache key from the
//! exact query bytes, serves a cached result when one exists, and otherwise
//! forwards the query to the upstream endpoint and stores the result under a
//! fixed TTL. Cache failures degrade to upstream forwarding; only an upstream
//! failure is visible to callers.

pub mod api;
pub mod config;
pub mod error;
pub mod keys;
pub mod proxy;
pub mod store;
pub mod upstream;
