use std::time::Duration;

use thiserror::Error;

/// Result type alias for fetch pipeline operations.
pub type Result<T> = std::result::Result<T, FetchError>;

#[derive(Debug, Error)]
pub enum FetchError {
    /// No registered adapter handles this URL. Raised before any network call.
    #[error("No adapter available for url: {url}")]
    NoAdapter { url: String },

    /// The URL matched an adapter but the adapter could not build a request from it.
    #[error("Invalid source url {url}: {reason}")]
    InvalidUrl { url: String, reason: String },

    /// The upstream payload did not have the shape the adapter expects.
    #[error("Invalid payload from {adapter}: {reason}")]
    Validation { adapter: String, reason: String },

    /// The source answered 404. Not retried.
    #[error("Listing not found: {url}")]
    NotFound { url: String },

    /// Every attempt failed with a retryable error; carries the last one.
    #[error("Fetch failed after {attempts} attempts: {source}")]
    Exhausted {
        attempts: u32,
        #[source]
        source: TransportError,
    },
}

impl FetchError {
    /// Short machine-readable kind, used in logs and API error bodies.
    pub fn kind(&self) -> &'static str {
        match self {
            FetchError::NoAdapter { .. } => "no_adapter",
            FetchError::InvalidUrl { .. } => "invalid_url",
            FetchError::Validation { .. } => "validation",
            FetchError::NotFound { .. } => "not_found",
            FetchError::Exhausted { .. } => "fetch_failed",
        }
    }
}

/// Failure of a single HTTP attempt.
#[derive(Debug, Clone, Error)]
pub enum TransportError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    #[error("HTTP error (status {status}): {body}")]
    Status { status: u16, body: String },
}

impl TransportError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, TransportError::Status { status: 404, .. })
    }
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            // reqwest does not expose the configured duration on the error
            return TransportError::Timeout(Duration::ZERO);
        }
        TransportError::Network(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn exhausted_keeps_last_cause_as_source() {
        let err = FetchError::Exhausted {
            attempts: 3,
            source: TransportError::Timeout(Duration::from_secs(5)),
        };
        assert_eq!(err.kind(), "fetch_failed");
        assert!(err.to_string().contains("3 attempts"));
        let source = err.source().unwrap().to_string();
        assert!(source.contains("timed out"));
    }

    #[test]
    fn only_404_is_not_found() {
        let not_found = TransportError::Status {
            status: 404,
            body: String::new(),
        };
        let server_error = TransportError::Status {
            status: 503,
            body: String::new(),
        };
        assert!(not_found.is_not_found());
        assert!(!server_error.is_not_found());
        assert!(!TransportError::Network("reset".into()).is_not_found());
    }
}
