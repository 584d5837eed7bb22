use std::collections::HashMap;

use serde::Deserialize;

/// Body of `GET /{key}/latest/{base}`.
#[derive(Debug, Clone, Deserialize)]
pub struct LatestRates {
    pub result: String,
    #[serde(default)]
    pub base_code: String,
    #[serde(default)]
    pub conversion_rates: HashMap<String, f64>,
    #[serde(rename = "error-type", default)]
    pub error_type: Option<String>,
    #[serde(default)]
    pub time_last_update_utc: Option<String>,
}

impl LatestRates {
    pub fn is_success(&self) -> bool {
        self.result == "success"
    }

    /// Units of `quote` per one unit of the base currency.
    pub fn rate(&self, quote: &str) -> Option<f64> {
        self.conversion_rates.get(quote).copied()
    }
}
