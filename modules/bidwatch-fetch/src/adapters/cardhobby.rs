// Card Hobby adapter.
//
// Listing URLs look like https://www.cardhobby.com/#/carddetails/67180979; the
// SPA route carries no data, so the card id is sent to the gateway JSON API.

use std::sync::LazyLock;
use std::time::Duration;

use bidwatch_common::Item;
use chrono::{DateTime, NaiveDateTime, Utc};
use regex::Regex;
use serde_json::Value;

use super::{RateLimit, SourceAdapter};
use crate::error::{FetchError, Result};
use crate::text::clean_title;
use crate::transport::FetchRequest;

const NAME: &str = "cardhobby";
const API_BASE: &str = "https://gatewayapi.cardhobby.com/card/NewMyCommodity/GetCardDetail";
const SELLER_URL_PREFIX: &str = "https://www.cardhobby.com/#/seller/detail/";
const USER_AGENT: &str =
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10.15; rv:139.0) Gecko/20100101 Firefox/139.0";
const UNKNOWN_ITEM: &str = "Unknown Item";

/// Card Hobby reports end times a fixed amount ahead of the real close.
const DEFAULT_CLOSE_OFFSET_HOURS: i64 = 24;
/// Closing time assumed when the payload has no end time: one day out.
const DEFAULT_OPEN_FOR_HOURS: i64 = 24;

static DETAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"cardhobby\.com/#/carddetails/(\d+)").expect("valid regex"));

const NAIVE_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y/%m/%d %H:%M:%S"];

pub struct CardHobbyAdapter {
    rate_limit: RateLimit,
    close_offset: chrono::Duration,
}

impl CardHobbyAdapter {
    pub fn new() -> Self {
        Self {
            rate_limit: RateLimit {
                max_requests: 10,
                time_window: Duration::from_secs(60),
            },
            close_offset: chrono::Duration::hours(DEFAULT_CLOSE_OFFSET_HOURS),
        }
    }

    /// Hours subtracted from the payload's end time.
    pub fn with_close_offset_hours(mut self, hours: i64) -> Self {
        self.close_offset = chrono::Duration::hours(hours);
        self
    }

    pub fn with_rate_limit(mut self, rate_limit: RateLimit) -> Self {
        self.rate_limit = rate_limit;
        self
    }

    fn closes_at(&self, data: &Value) -> Result<DateTime<Utc>> {
        let raw = &data["endTime"];
        if raw.is_null() {
            return Ok(Utc::now() + chrono::Duration::hours(DEFAULT_OPEN_FOR_HOURS));
        }

        let parsed = match raw {
            Value::String(s) => parse_source_time(s),
            Value::Number(n) => n.as_i64().and_then(DateTime::from_timestamp_millis),
            _ => None,
        };

        parsed
            .map(|at| at - self.close_offset)
            .ok_or_else(|| FetchError::Validation {
                adapter: NAME.to_string(),
                reason: format!("unparseable endTime: {raw}"),
            })
    }
}

impl Default for CardHobbyAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl SourceAdapter for CardHobbyAdapter {
    fn name(&self) -> &str {
        NAME
    }

    fn pattern(&self) -> &Regex {
        &DETAIL_RE
    }

    fn rate_limit(&self) -> Option<RateLimit> {
        Some(self.rate_limit)
    }

    fn build_request(&self, url: &str) -> Result<FetchRequest> {
        let card_id = card_id(url).ok_or_else(|| FetchError::InvalidUrl {
            url: url.to_string(),
            reason: "no card id in url".to_string(),
        })?;

        let api_url = format!(
            "{API_BASE}?cardId={card_id}&lag=en&device=Web&version=1&appname=Card+Hobby"
        );

        Ok(FetchRequest::get(api_url)
            .header("Accept", "*/*")
            .header("Content-Type", "application/json")
            .header("User-Agent", USER_AGENT)
            .header("Accept-Language", "en-CA,en-US;q=0.7,en;q=0.3"))
    }

    fn validate(&self, payload: &Value) -> std::result::Result<(), String> {
        let data = payload
            .get("data")
            .filter(|d| d.is_object())
            .ok_or("missing data object")?;

        if data.get("imageUrl").is_none_or(Value::is_null) {
            return Err("data.imageUrl is missing".into());
        }
        if !data.get("price").is_some_and(Value::is_number) {
            return Err("data.price is not a number".into());
        }
        if !data.get("title").is_some_and(Value::is_string) {
            return Err("data.title is not a string".into());
        }
        Ok(())
    }

    fn extract(&self, url: &str, payload: &Value) -> Result<Item> {
        let data = &payload["data"];

        let name = match clean_title(data["title"].as_str().unwrap_or_default()) {
            cleaned if cleaned.is_empty() => UNKNOWN_ITEM.to_string(),
            cleaned => cleaned,
        };

        Ok(Item {
            id: None,
            name,
            source_url: url.to_string(),
            image_url: data["imageUrl"].as_str().unwrap_or_default().to_string(),
            seller_ref: seller_ref(data),
            my_bid: 0.0,
            current_bid: data["price"].as_f64().unwrap_or(0.0),
            reference_value: 0.0,
            closes_at: self.closes_at(data)?,
            archived: false,
        })
    }
}

/// Card id from a listing URL.
pub fn card_id(url: &str) -> Option<&str> {
    DETAIL_RE
        .captures(url)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str())
}

fn seller_ref(data: &Value) -> String {
    if let Some(url) = data["sellerUrl"].as_str().filter(|s| !s.is_empty()) {
        return url.to_string();
    }
    match &data["sellerId"] {
        Value::String(id) if !id.is_empty() => format!("{SELLER_URL_PREFIX}{id}"),
        Value::Number(id) => format!("{SELLER_URL_PREFIX}{id}"),
        _ => String::new(),
    }
}

fn parse_source_time(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .map(|naive| naive.and_utc())
}
