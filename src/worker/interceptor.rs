//! Request Interceptor
//!
//! Cache-then-network resolution of every proxied request.

use tokio::task::JoinHandle;
use tracing::{debug, warn};
use url::Url;

use super::Worker;
use crate::cache::{StoredResponse, API_PATH_MARKER};
use crate::error::{CacheError, Result};
use crate::models::OfflineResponse;
use crate::network::NetworkRequest;
use crate::tasks::spawn_cache_write;

/// Where an intercepted response came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    Cache,
    Network,
    Offline,
}

impl Source {
    pub fn as_str(&self) -> &'static str {
        match self {
            Source::Cache => "cache",
            Source::Network => "network",
            Source::Offline => "offline",
        }
    }
}

// == Interception ==
/// Result of intercepting one request.
///
/// `cache_write` is the pending write-back, if any. The response is usable
/// before it completes; await it to extend the request's lifetime until the
/// cache is updated.
#[derive(Debug)]
pub struct Interception {
    pub response: StoredResponse,
    pub source: Source,
    pub cache_write: Option<JoinHandle<()>>,
}

impl Interception {
    fn from_cache(response: StoredResponse) -> Self {
        Self {
            response,
            source: Source::Cache,
            cache_write: None,
        }
    }

    fn offline() -> Result<Self> {
        let body = serde_json::to_vec(&OfflineResponse::no_connection())
            .map_err(|e| CacheError::Internal(e.to_string()))?;

        Ok(Self {
            response: StoredResponse::new(
                200,
                vec![("content-type".to_string(), "application/json".to_string())],
                body,
            ),
            source: Source::Offline,
            cache_write: None,
        })
    }

    /// Waits for the write-back to land, if one was scheduled.
    pub async fn settle(&mut self) {
        if let Some(handle) = self.cache_write.take() {
            if let Err(e) = handle.await {
                warn!("Cache write task failed: {}", e);
            }
        }
    }
}

/// True if the request path carries the API marker.
pub fn is_api_request(url: &Url) -> bool {
    url.path().contains(API_PATH_MARKER)
}

impl Worker {
    // == Intercept ==
    /// Resolves a request against the current generation, then the network.
    ///
    /// - Cache hit: returned as-is, no network call.
    /// - Network success: returned; cacheable GET responses are written back
    ///   in a background task.
    /// - Network failure on an API path: synthesized offline JSON payload.
    /// - Network failure elsewhere: `CacheError::Upstream`.
    pub async fn intercept(&self, request: NetworkRequest) -> Result<Interception> {
        let key = request.key();
        let generation = self.current_generation().await;

        let cached = self.cache.write().await.lookup(&generation, &key);
        if let Some(response) = cached {
            debug!("Cache hit: {} in {}", key, generation);
            return Ok(Interception::from_cache(response));
        }

        debug!("Cache miss: {}, going to network", key);
        self.cache.write().await.stats_mut().record_network_fetch();

        match self.fetcher.fetch(&request).await {
            Ok(network) => {
                let cache_write = if request.is_get() && network.is_cacheable() {
                    Some(spawn_cache_write(
                        self.cache.clone(),
                        generation,
                        key,
                        network.response.clone(),
                    ))
                } else {
                    debug!(
                        "Not caching {} (status {}, {:?})",
                        key,
                        network.status(),
                        network.kind
                    );
                    None
                };

                Ok(Interception {
                    response: network.response,
                    source: Source::Network,
                    cache_write,
                })
            }
            Err(err) => {
                warn!("Network request failed for {}: {}", key, err);
                let mut cache = self.cache.write().await;
                cache.stats_mut().record_network_failure();

                if is_api_request(&request.url) {
                    cache.stats_mut().record_offline_fallback();
                    Interception::offline()
                } else {
                    Err(CacheError::Upstream(err.to_string()))
                }
            }
        }
    }
}
