use thiserror::Error;

pub type Result<T> = std::result::Result<T, ExchangeRateError>;

#[derive(Debug, Error)]
pub enum ExchangeRateError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Request unsuccessful: {0}")]
    Unsuccessful(String),
}

impl From<reqwest::Error> for ExchangeRateError {
    fn from(err: reqwest::Error) -> Self {
        ExchangeRateError::Network(err.to_string())
    }
}

impl From<serde_json::Error> for ExchangeRateError {
    fn from(err: serde_json::Error) -> Self {
        ExchangeRateError::Parse(err.to_string())
    }
}
