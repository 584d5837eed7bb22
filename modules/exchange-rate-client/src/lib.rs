pub mod error;
pub mod types;

pub use error::{ExchangeRateError, Result};
pub use types::LatestRates;

pub const DEFAULT_BASE_URL: &str = "https://v6.exchangerate-api.com/v6";

pub struct ExchangeRateClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl ExchangeRateClient {
    pub fn new(base_url: &str, api_key: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
        }
    }

    /// Latest conversion rates from `base` (e.g. "CAD") to every supported currency.
    pub async fn latest(&self, base: &str) -> Result<LatestRates> {
        let url = format!("{}/{}/latest/{}", self.base_url, self.api_key, base);
        let resp = self.client.get(&url).send().await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(ExchangeRateError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let body = resp.text().await?;
        let rates = parse_latest(&body)?;
        tracing::debug!(
            base = %rates.base_code,
            currencies = rates.conversion_rates.len(),
            "Fetched latest exchange rates"
        );
        Ok(rates)
    }

    /// Units of `quote` per one `base`.
    pub async fn rate(&self, base: &str, quote: &str) -> Result<f64> {
        let rates = self.latest(base).await?;
        rates
            .rate(quote)
            .ok_or_else(|| ExchangeRateError::Parse(format!("no {quote} rate in response")))
    }
}

fn parse_latest(body: &str) -> Result<LatestRates> {
    let rates: LatestRates = serde_json::from_str(body)?;
    if !rates.is_success() {
        let reason = rates.error_type.clone().unwrap_or_else(|| rates.result.clone());
        return Err(ExchangeRateError::Unsuccessful(reason));
    }
    Ok(rates)
}
