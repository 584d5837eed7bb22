// Test doubles for the fetch pipeline.
//
// - MockTransport (HttpTransport): scripted responses, records every call
// - cardhobby_url / cardhobby_payload: listing URLs and gateway bodies

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::json;
use tokio::time::Instant;

use crate::error::TransportError;
use crate::transport::{FetchRequest, HttpTransport, TransportResponse};

/// One scripted outcome of `HttpTransport::execute`.
#[derive(Debug, Clone)]
pub enum MockReply {
    Respond(TransportResponse),
    Fail(TransportError),
    /// Never answers; the caller's timeout fires.
    Hang,
}

impl MockReply {
    pub fn ok(body: impl Into<String>) -> Self {
        MockReply::Respond(TransportResponse::new(200, body))
    }

    pub fn status(status: u16) -> Self {
        MockReply::Respond(TransportResponse::new(status, format!("status {status}")))
    }

    pub fn network(message: &str) -> Self {
        MockReply::Fail(TransportError::Network(message.to_string()))
    }
}

/// Scripted transport. Replies are taken from the queue first, then from
/// per-card routes, then the fallback (404 unless overridden).
/// Builder pattern: `.then()`, `.on_card()`, `.otherwise()`.
pub struct MockTransport {
    queue: Mutex<VecDeque<MockReply>>,
    cards: HashMap<String, MockReply>,
    fallback: MockReply,
    calls: Mutex<Vec<(String, Instant)>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self {
            queue: Mutex::new(VecDeque::new()),
            cards: HashMap::new(),
            fallback: MockReply::status(404),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Queue a one-shot reply.
    pub fn then(self, reply: MockReply) -> Self {
        self.queue.lock().unwrap().push_back(reply);
        self
    }

    /// Reply for every request carrying `cardId={card_id}` once the queue is empty.
    pub fn on_card(mut self, card_id: &str, reply: MockReply) -> Self {
        self.cards.insert(card_id.to_string(), reply);
        self
    }

    pub fn otherwise(mut self, reply: MockReply) -> Self {
        self.fallback = reply;
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn requested_urls(&self) -> Vec<String> {
        self.calls.lock().unwrap().iter().map(|(u, _)| u.clone()).collect()
    }

    pub fn call_instants(&self) -> Vec<Instant> {
        self.calls.lock().unwrap().iter().map(|(_, at)| *at).collect()
    }

    fn next_reply(&self, url: &str) -> MockReply {
        if let Some(reply) = self.queue.lock().unwrap().pop_front() {
            return reply;
        }
        self.cards
            .iter()
            .find(|(id, _)| card_param_matches(url, id))
            .map(|(_, reply)| reply.clone())
            .unwrap_or_else(|| self.fallback.clone())
    }
}

impl Default for MockTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HttpTransport for MockTransport {
    async fn execute(
        &self,
        request: &FetchRequest,
        _timeout: Duration,
    ) -> Result<TransportResponse, TransportError> {
        self.calls
            .lock()
            .unwrap()
            .push((request.url.clone(), Instant::now()));

        match self.next_reply(&request.url) {
            MockReply::Respond(resp) => Ok(resp),
            MockReply::Fail(err) => Err(err),
            MockReply::Hang => std::future::pending().await,
        }
    }
}

fn card_param_matches(url: &str, card_id: &str) -> bool {
    let needle = format!("cardId={card_id}");
    url.split(['?', '&']).any(|part| part == needle)
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

pub fn cardhobby_url(card_id: &str) -> String {
    format!("https://www.cardhobby.com/#/carddetails/{card_id}")
}

/// A gateway body that passes validation.
pub fn cardhobby_payload(title: &str, price: f64, seller_id: u64, end_time: &str) -> String {
    json!({
        "code": 0,
        "data": {
            "title": title,
            "imageUrl": "https://img.cardhobby.com/card.jpg",
            "price": price,
            "sellerId": seller_id,
            "endTime": end_time
        }
    })
    .to_string()
}
