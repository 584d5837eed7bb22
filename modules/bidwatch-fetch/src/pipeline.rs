//! The fetch pipeline: cache, adapter dispatch, rate limiting, retried
//! network fetch, validation, extraction.
//!
//! One `FetchPipeline` is built at startup and shared by `Arc`. It owns the
//! item cache and the per-adapter rate-limit windows.

use std::sync::Arc;
use std::time::Duration;

use bidwatch_common::Item;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::cache::ItemCache;
use crate::error::{FetchError, Result, TransportError};
use crate::rate_limit::RateLimiter;
use crate::retry::{retry_with_backoff, RetryError, RetryPolicy};
use crate::router::AdapterRegistry;
use crate::transport::{HttpTransport, TransportResponse};

/// Upper bound on the response body kept in a `TransportError::Status`.
const ERROR_BODY_LIMIT: usize = 512;

#[derive(Debug, Clone, Copy)]
pub struct PipelineSettings {
    pub cache_ttl: Duration,
    pub request_timeout: Duration,
    pub retry: RetryPolicy,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            cache_ttl: Duration::from_secs(5 * 60),
            request_timeout: Duration::from_secs(5),
            retry: RetryPolicy::default(),
        }
    }
}

pub struct FetchPipeline {
    registry: AdapterRegistry,
    transport: Arc<dyn HttpTransport>,
    cache: ItemCache,
    limiter: RateLimiter,
    settings: PipelineSettings,
}

impl FetchPipeline {
    pub fn new(registry: AdapterRegistry, transport: Arc<dyn HttpTransport>) -> Self {
        Self::with_settings(registry, transport, PipelineSettings::default())
    }

    pub fn with_settings(
        registry: AdapterRegistry,
        transport: Arc<dyn HttpTransport>,
        settings: PipelineSettings,
    ) -> Self {
        Self {
            registry,
            transport,
            cache: ItemCache::new(settings.cache_ttl),
            limiter: RateLimiter::new(),
            settings,
        }
    }

    /// Fetch and normalize the listing at `url`. The returned item has no id.
    pub async fn fetch_item(&self, url: &str) -> Result<Item> {
        let url = url.trim();

        if let Some(item) = self.cache.get(url) {
            debug!(url, "Cache hit");
            return Ok(item);
        }

        let adapter = self.registry.resolve(url)?;
        let request = adapter.build_request(url)?;
        let adapter_name = adapter.name();
        let rate_limit = adapter.rate_limit();
        let timeout = self.settings.request_timeout;

        info!(url, adapter = adapter_name, "Fetching listing");

        let response = retry_with_backoff(
            self.settings.retry,
            |err: &TransportError| !err.is_not_found(),
            |attempt| {
                let request = &request;
                async move {
                    if let Some(limit) = rate_limit {
                        self.limiter.acquire(adapter_name, limit).await;
                    }
                    debug!(url, adapter = adapter_name, attempt, "Sending request");

                    let response =
                        tokio::time::timeout(timeout, self.transport.execute(request, timeout))
                            .await
                            .map_err(|_| TransportError::Timeout(timeout))??;
                    ensure_success(response)
                }
            },
        )
        .await
        .map_err(|err| match err {
            RetryError::Aborted { error, .. } if error.is_not_found() => FetchError::NotFound {
                url: url.to_string(),
            },
            RetryError::Aborted { attempt, error } => FetchError::Exhausted {
                attempts: attempt,
                source: error,
            },
            RetryError::Exhausted { attempts, error } => FetchError::Exhausted {
                attempts,
                source: error,
            },
        })
        .inspect_err(|e| warn!(url, adapter = adapter_name, error = %e, "Fetch failed"))?;

        let payload: Value =
            serde_json::from_str(&response.body).map_err(|e| FetchError::Validation {
                adapter: adapter_name.to_string(),
                reason: format!("response is not JSON: {e}"),
            })?;

        adapter
            .validate(&payload)
            .map_err(|reason| FetchError::Validation {
                adapter: adapter_name.to_string(),
                reason,
            })
            .inspect_err(|e| warn!(url, adapter = adapter_name, error = %e, "Payload rejected"))?;

        let item = adapter.extract(url, &payload)?;
        self.cache.insert(url, item.clone());

        info!(
            url,
            adapter = adapter_name,
            name = item.name.as_str(),
            current_bid = item.current_bid,
            "Listing fetched"
        );
        Ok(item)
    }

    /// Invalidate one URL, or the whole cache when `url` is `None`.
    pub fn clear_cache(&self, url: Option<&str>) -> usize {
        let removed = self.cache.clear(url.map(str::trim));
        info!(url = url.unwrap_or("*"), removed, "Cache cleared");
        removed
    }

    /// Drop expired cache entries.
    pub fn evict_expired(&self) -> usize {
        self.cache.evict_expired()
    }

    pub fn cached_items(&self) -> usize {
        self.cache.len()
    }
}

fn ensure_success(response: TransportResponse) -> std::result::Result<TransportResponse, TransportError> {
    if response.is_success() {
        return Ok(response);
    }
    let body: String = response.body.chars().take(ERROR_BODY_LIMIT).collect();
    Err(TransportError::Status {
        status: response.status,
        body,
    })
}
