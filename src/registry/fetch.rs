// src/registry/fetch.rs
// =============================================================================
// Fetching pages from the registry.
//
// The crawler only ever needs "give me the body of this URL", so that is all
// the PageFetcher trait asks for. HttpFetcher is the real implementation on
// top of reqwest; tests plug in an in-memory fetcher instead.
//
// No retries: a failed request is reported to the caller, which aborts the
// crawl.
// =============================================================================

use crate::config::RegistrySettings;
use crate::error::{DepGraphError, Result};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

/// Something that can turn a URL into page content
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<String>;
}

/// Fetches pages over HTTP(S) with a single shared connection pool
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    // Builds the HTTP client from the registry settings
    //
    // verify_tls = false accepts any certificate, which is what the first
    // versions of this tool did unconditionally.
    pub fn new(settings: &RegistrySettings) -> Result<Self> {
        let mut builder = Client::builder()
            .user_agent(concat!("npm-depgraph/", env!("CARGO_PKG_VERSION")))
            .danger_accept_invalid_certs(!settings.verify_tls);

        if settings.timeout_secs > 0 {
            builder = builder.timeout(Duration::from_secs(settings.timeout_secs));
        }

        let client = builder
            .build()
            .map_err(|e| DepGraphError::Config(format!("cannot build HTTP client: {}", e)))?;

        Ok(Self { client })
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<String> {
        let network = |source| DepGraphError::Network {
            url: url.to_string(),
            source,
        };

        let response = self.client.get(url).send().await.map_err(network)?;

        if !response.status().is_success() {
            return Err(DepGraphError::HttpStatus {
                url: url.to_string(),
                status: response.status().as_u16(),
            });
        }

        response.text().await.map_err(network)
    }
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why #[async_trait]?
//    - Traits with async methods are easiest to use as `dyn PageFetcher`
//      through the async-trait crate, which boxes the returned future
//
// 2. Why Send + Sync on the trait?
//    - The crawler holds a `&dyn PageFetcher` while running several fetches
//      at once, so implementations must be safe to share
//
// 3. Why one Client for every request?
//    - reqwest::Client keeps a connection pool; creating one per request
//      would open a new connection for every page
// -----------------------------------------------------------------------------
