// Source adapters. Each adapter knows how to recognise one marketplace's
// listing URLs, turn them into an API request, check the payload shape, and
// extract a normalized Item. The pipeline owns everything else.

pub mod cardhobby;

use std::time::Duration;

use bidwatch_common::Item;
use regex::Regex;
use serde_json::Value;

use crate::error::Result;
use crate::transport::FetchRequest;

/// Request ceiling for one adapter: at most `max_requests` per `time_window`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimit {
    pub max_requests: usize,
    pub time_window: Duration,
}

pub trait SourceAdapter: Send + Sync {
    /// Stable key used for logging and rate-limit bookkeeping.
    fn name(&self) -> &str;

    /// Listing URLs this adapter handles.
    fn pattern(&self) -> &Regex;

    fn rate_limit(&self) -> Option<RateLimit> {
        None
    }

    /// Build the upstream request for a listing URL.
    fn build_request(&self, url: &str) -> Result<FetchRequest>;

    /// Shape check on the decoded payload. `Err` carries the reason.
    fn validate(&self, payload: &Value) -> std::result::Result<(), String>;

    /// Produce an unpersisted item. Only called on payloads that passed `validate`.
    fn extract(&self, url: &str, payload: &Value) -> Result<Item>;

    fn matches(&self, url: &str) -> bool {
        self.pattern().is_match(url)
    }
}
