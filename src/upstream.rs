//! Upstream SPARQL endpoint client.
//!
//! Forwards a raw query as `GET <endpoint>?query=<q>` with
//! `Accept: application/sparql-results+json` and returns the parsed JSON
//! result body. All failure modes (network, non-success status, unparseable
//! body, timeout) collapse into [`ProxyError::Upstream`]; retry policy, if
//! any, belongs to a layer above.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use tracing::debug;

use crate::error::{ProxyError, Result};

/// Media type requested from the SPARQL endpoint.
const SPARQL_RESULTS_JSON: &str = "application/sparql-results+json";

/// Issues a query to the upstream answering service.
#[async_trait]
pub trait QueryForwarder: Send + Sync {
    /// Forward `query` upstream and return its structured result.
    async fn forward(&self, query: &str) -> Result<Value>;
}

/// Production forwarder speaking SPARQL-over-HTTP to a fixed endpoint.
#[derive(Debug, Clone)]
pub struct SparqlForwarder {
    endpoint: String,
    client: Client,
}

impl SparqlForwarder {
    /// Build a forwarder for `endpoint` with an explicit request timeout.
    pub fn new(endpoint: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ProxyError::Upstream(format!("failed to build HTTP client: {}", e)))?;
        Ok(Self {
            endpoint: endpoint.to_string(),
            client,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl QueryForwarder for SparqlForwarder {
    async fn forward(&self, query: &str) -> Result<Value> {
        debug!("Forwarding query to {}", self.endpoint);

        let response = self
            .client
            .get(&self.endpoint)
            .query(&[("query", query)])
            .header("Accept", SPARQL_RESULTS_JSON)
            .send()
            .await
            .map_err(|e| ProxyError::Upstream(format!("request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ProxyError::Upstream(format!(
                "endpoint returned {}: {}",
                status,
                body.chars().take(200).collect::<String>()
            )));
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| ProxyError::Upstream(format!("failed to parse result body: {}", e)))
    }
}
