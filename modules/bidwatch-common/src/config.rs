use std::env;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    // Storage
    pub data_path: PathBuf,

    // Web server
    pub api_host: String,
    pub api_port: u16,

    // Background refresh; zero disables the timer.
    pub refresh_interval: Duration,

    // Exchange rates
    pub exchange_rate_api_key: Option<String>,
    /// Overrides the client's default endpoint.
    pub exchange_rate_base_url: Option<String>,

    // Card Hobby reports closing times shifted by this many hours.
    pub cardhobby_close_offset_hours: i64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from("data/items.json"),
            api_host: "0.0.0.0".to_string(),
            api_port: 3000,
            refresh_interval: Duration::from_secs(300),
            exchange_rate_api_key: None,
            exchange_rate_base_url: None,
            cardhobby_close_offset_hours: 24,
        }
    }
}

impl Config {
    /// Load configuration from the environment (and `.env` if present).
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a config from any key lookup. Unset keys fall back to defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = Self::default();

        let config = Self {
            data_path: lookup("BIDWATCH_DATA_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.data_path),
            api_host: lookup("API_HOST").unwrap_or(defaults.api_host),
            api_port: parse_or("API_PORT", lookup("API_PORT"), defaults.api_port)?,
            refresh_interval: Duration::from_secs(parse_or(
                "REFRESH_INTERVAL_SECS",
                lookup("REFRESH_INTERVAL_SECS"),
                defaults.refresh_interval.as_secs(),
            )?),
            exchange_rate_api_key: lookup("EXCHANGE_RATE_API_KEY").filter(|k| !k.is_empty()),
            exchange_rate_base_url: lookup("EXCHANGE_RATE_BASE_URL").filter(|u| !u.is_empty()),
            cardhobby_close_offset_hours: parse_or(
                "CARDHOBBY_CLOSE_OFFSET_HOURS",
                lookup("CARDHOBBY_CLOSE_OFFSET_HOURS"),
                defaults.cardhobby_close_offset_hours,
            )?,
        };

        Ok(config)
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.api_host, self.api_port)
    }

    /// Log the loaded config with secrets truncated.
    pub fn log_redacted(&self) {
        fn preview_opt(val: &Option<String>) -> String {
            match val {
                Some(v) if !v.is_empty() => {
                    let head: String = v.chars().take(5).collect();
                    format!("{}...({} chars)", head, v.len())
                }
                _ => "<not set>".to_string(),
            }
        }

        tracing::info!("Config loaded:");
        tracing::info!("  BIDWATCH_DATA_PATH: {}", self.data_path.display());
        tracing::info!("  API: {}", self.bind_addr());
        tracing::info!("  REFRESH_INTERVAL_SECS: {}", self.refresh_interval.as_secs());
        tracing::info!("  EXCHANGE_RATE_API_KEY: {}", preview_opt(&self.exchange_rate_api_key));
        tracing::info!(
            "  CARDHOBBY_CLOSE_OFFSET_HOURS: {}",
            self.cardhobby_close_offset_hours
        );
    }
}

fn parse_or<T>(key: &str, raw: Option<String>, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match raw {
        Some(value) => value
            .trim()
            .parse()
            .with_context(|| format!("{key} must be a number, got {value:?}")),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_when_unset() {
        let config = Config::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.api_port, 3000);
        assert_eq!(config.data_path, PathBuf::from("data/items.json"));
        assert_eq!(config.refresh_interval, Duration::from_secs(300));
        assert_eq!(config.cardhobby_close_offset_hours, 24);
        assert!(config.exchange_rate_api_key.is_none());
        assert!(config.exchange_rate_base_url.is_none());
    }

    #[test]
    fn overrides_from_lookup() {
        let config = Config::from_lookup(lookup(&[
            ("API_PORT", "8080"),
            ("REFRESH_INTERVAL_SECS", "0"),
            ("CARDHOBBY_CLOSE_OFFSET_HOURS", "12"),
            ("EXCHANGE_RATE_API_KEY", "abcdef123"),
            ("EXCHANGE_RATE_BASE_URL", "http://localhost:9000/v6"),
        ]))
        .unwrap();
        assert_eq!(config.bind_addr(), "0.0.0.0:8080");
        assert_eq!(config.refresh_interval, Duration::ZERO);
        assert_eq!(config.cardhobby_close_offset_hours, 12);
        assert_eq!(config.exchange_rate_api_key.as_deref(), Some("abcdef123"));
        assert_eq!(
            config.exchange_rate_base_url.as_deref(),
            Some("http://localhost:9000/v6")
        );
    }

    #[test]
    fn empty_api_key_is_unset() {
        let config = Config::from_lookup(lookup(&[("EXCHANGE_RATE_API_KEY", "")])).unwrap();
        assert!(config.exchange_rate_api_key.is_none());
    }

    #[test]
    fn invalid_port_is_an_error() {
        let err = Config::from_lookup(lookup(&[("API_PORT", "eighty")])).unwrap_err();
        assert!(err.to_string().contains("API_PORT"));
    }
}
