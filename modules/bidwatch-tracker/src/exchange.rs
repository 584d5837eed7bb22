//! CAD to USD conversion rate, cached for an hour.
//!
//! Never fails: when no source is configured or the source errors, the last
//! known rate is returned (initially `FALLBACK_USD_PER_CAD`).

use std::time::Duration;

use async_trait::async_trait;
use exchange_rate_client::{ExchangeRateClient, DEFAULT_BASE_URL};
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::{info, warn};

pub const FALLBACK_USD_PER_CAD: f64 = 0.74;
const CACHE_TTL: Duration = Duration::from_secs(60 * 60);

#[async_trait]
pub trait RateSource: Send + Sync {
    async fn usd_per_cad(&self) -> exchange_rate_client::Result<f64>;
}

#[async_trait]
impl RateSource for ExchangeRateClient {
    async fn usd_per_cad(&self) -> exchange_rate_client::Result<f64> {
        self.rate("CAD", "USD").await
    }
}

struct CachedRate {
    rate: f64,
    fetched_at: Option<Instant>,
}

pub struct ExchangeRateService {
    source: Option<Box<dyn RateSource>>,
    state: Mutex<CachedRate>,
}

impl ExchangeRateService {
    pub fn new(source: Option<Box<dyn RateSource>>) -> Self {
        Self {
            source,
            state: Mutex::new(CachedRate {
                rate: FALLBACK_USD_PER_CAD,
                fetched_at: None,
            }),
        }
    }

    /// Service backed by ExchangeRate-API when a key is configured.
    pub fn from_config(base_url: Option<&str>, api_key: Option<&str>) -> Self {
        let base_url = base_url.unwrap_or(DEFAULT_BASE_URL);
        let source = api_key.map(|key| {
            Box::new(ExchangeRateClient::new(base_url, key.to_string())) as Box<dyn RateSource>
        });
        if source.is_none() {
            warn!("EXCHANGE_RATE_API_KEY not set, using fallback CAD/USD rate");
        }
        Self::new(source)
    }

    pub async fn usd_per_cad(&self) -> f64 {
        let mut state = self.state.lock().await;
        if state
            .fetched_at
            .is_some_and(|at| at.elapsed() < CACHE_TTL)
        {
            return state.rate;
        }

        let Some(source) = &self.source else {
            return state.rate;
        };

        match source.usd_per_cad().await {
            Ok(rate) => {
                info!(rate, "Exchange rate updated");
                state.rate = rate;
                state.fetched_at = Some(Instant::now());
            }
            Err(e) => warn!(error = %e, rate = state.rate, "Exchange rate fetch failed, using last known"),
        }
        state.rate
    }
}
