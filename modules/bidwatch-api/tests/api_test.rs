//! REST routes exercised in-process against a scripted transport.

use std::sync::Arc;

use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
    Router,
};
use bidwatch_api::{build_router, AppState};
use bidwatch_fetch::testing::{cardhobby_payload, cardhobby_url, MockReply, MockTransport};
use bidwatch_fetch::{AdapterRegistry, FetchPipeline};
use bidwatch_store::{ItemStore, MemoryStore};
use bidwatch_tracker::{ExchangeRateService, Tracker, FALLBACK_USD_PER_CAD};
use serde_json::{json, Value};
use tower::ServiceExt;

fn app_with(transport: MockTransport) -> (Router, Arc<MockTransport>) {
    let transport = Arc::new(transport);
    let pipeline = Arc::new(FetchPipeline::new(
        AdapterRegistry::with_defaults(),
        transport.clone(),
    ));
    let store: Arc<dyn ItemStore> = Arc::new(MemoryStore::new());
    let state = AppState {
        tracker: Arc::new(Tracker::new(pipeline, store.clone())),
        store,
        rates: ExchangeRateService::new(None),
    };
    (build_router(Arc::new(state)), transport)
}

fn app() -> Router {
    let transport = MockTransport::new()
        .on_card(
            "1",
            MockReply::ok(cardhobby_payload("Luka Doncic", 12.0, 973, "2025-01-03 20:00:00")),
        )
        .on_card(
            "2",
            MockReply::ok(cardhobby_payload("Jalen Brunson", 8.0, 973, "2025-01-02 20:00:00")),
        )
        .on_card("5", MockReply::status(500));
    app_with(transport).0
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(v) => {
            builder = builder.header("content-type", "application/json");
            Body::from(v.to_string())
        }
        None => Body::empty(),
    };
    let response = app
        .clone()
        .oneshot(builder.body(body).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into()))
    };
    (status, value)
}

fn manual_item(name: &str, seller: &str, reference_value: f64) -> Value {
    json!({
        "name": name,
        "sourceUrl": format!("https://example.com/{name}"),
        "imageUrl": "",
        "sellerRef": seller,
        "myBid": 0,
        "currentBid": 1,
        "referenceValue": reference_value,
        "closesAt": "2025-01-02T00:00:00Z"
    })
}

#[tokio::test]
async fn health_check() {
    let (status, body) = send(&app(), Method::GET, "/", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, Value::String("ok".into()));
}

#[tokio::test]
async fn item_crud_round() {
    let app = app();

    let (status, body) = send(&app, Method::POST, "/api/items", Some(manual_item("a", "s1", 5.0))).await;
    assert_eq!(status, StatusCode::OK);
    let id = body["id"].as_i64().unwrap();

    let (_, items) = send(&app, Method::GET, "/api/items", None).await;
    assert_eq!(items.as_array().unwrap().len(), 1);
    assert_eq!(items[0]["id"], id);
    assert_eq!(items[0]["sellerRef"], "s1");

    let mut updated = items[0].clone();
    updated["myBid"] = json!(42.0);
    let (status, body) = send(&app, Method::PUT, "/api/items", Some(updated)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "success": true }));

    let (status, _) = send(&app, Method::DELETE, "/api/items", Some(json!({ "id": id }))).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(&app, Method::DELETE, "/api/items", Some(json!({ "id": id }))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].as_str().unwrap().contains("not found"));
}

#[tokio::test]
async fn update_unknown_item_is_404() {
    let mut item = manual_item("ghost", "s1", 1.0);
    item["id"] = json!(77);
    let (status, _) = send(&app(), Method::PUT, "/api/items", Some(item)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn archive_and_restore_move_items_between_lists() {
    let app = app();
    let (_, body) = send(&app, Method::POST, "/api/items", Some(manual_item("a", "s1", 5.0))).await;
    let id = body["id"].as_i64().unwrap();

    let (status, _) = send(&app, Method::POST, &format!("/api/items/{id}/archive"), None).await;
    assert_eq!(status, StatusCode::OK);
    let (_, active) = send(&app, Method::GET, "/api/items", None).await;
    let (_, archived) = send(&app, Method::GET, "/api/items?archived=true", None).await;
    assert!(active.as_array().unwrap().is_empty());
    assert_eq!(archived[0]["archived"], true);

    send(&app, Method::POST, &format!("/api/items/{id}/restore"), None).await;
    let (_, active) = send(&app, Method::GET, "/api/items", None).await;
    assert_eq!(active.as_array().unwrap().len(), 1);

    let (status, _) = send(&app, Method::POST, "/api/items/999/archive", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn grouped_view_nests_secondaries() {
    let app = app();
    send(&app, Method::POST, "/api/items", Some(manual_item("low", "s1", 10.0))).await;
    send(&app, Method::POST, "/api/items", Some(manual_item("high", "s1", 20.0))).await;
    send(&app, Method::POST, "/api/items", Some(manual_item("solo", "s2", 5.0))).await;

    let (status, groups) = send(&app, Method::GET, "/api/items/grouped", None).await;

    assert_eq!(status, StatusCode::OK);
    let groups = groups.as_array().unwrap();
    assert_eq!(groups.len(), 2);
    assert_eq!(groups[0]["name"], "high");
    assert_eq!(groups[0]["secondaryItems"][0]["name"], "low");
    assert_eq!(groups[1]["name"], "solo");
    assert!(groups[1].get("secondaryItems").is_none());
}

#[tokio::test]
async fn track_then_refresh() {
    let app = app();

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/items/track",
        Some(json!({ "url": cardhobby_url("1"), "myBid": 20, "referenceValue": 50 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let id = body["id"].as_i64().unwrap();

    let (status, item) = send(&app, Method::POST, &format!("/api/items/{id}/refresh"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(item["name"], "Luka Doncic");
    assert_eq!(item["myBid"], 20.0);
    assert_eq!(item["referenceValue"], 50.0);
    assert_eq!(item["closesAt"], "2025-01-02T20:00:00Z");

    let (status, summary) = send(&app, Method::POST, "/api/items/refresh", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(summary, json!({ "refreshed": 1, "failed": [] }));
}

#[tokio::test]
async fn track_unsupported_url_is_422() {
    let (status, body) = send(
        &app(),
        Method::POST,
        "/api/items/track",
        Some(json!({ "url": "https://www.ebay.com/itm/1" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["error"].as_str().unwrap().contains("No adapter"));
}

#[tokio::test]
async fn refresh_unknown_item_is_404() {
    let (status, _) = send(&app(), Method::POST, "/api/items/12/refresh", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn scrape_previews_without_persisting() {
    let app = app();
    let (status, item) = send(
        &app,
        Method::POST,
        "/api/scrape",
        Some(json!({ "url": cardhobby_url("2") })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(item["name"], "Jalen Brunson");
    assert!(item.get("id").is_none());
    let (_, items) = send(&app, Method::GET, "/api/items", None).await;
    assert!(items.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn scrape_missing_listing_is_404() {
    let (status, _) = send(
        &app(),
        Method::POST,
        "/api/scrape",
        Some(json!({ "url": cardhobby_url("404") })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test(start_paused = true)]
async fn scrape_failing_upstream_is_502() {
    let (status, body) = send(
        &app(),
        Method::POST,
        "/api/scrape",
        Some(json!({ "url": cardhobby_url("5") })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert!(body["error"].as_str().unwrap().contains("3 attempts"));
}

#[tokio::test]
async fn clearing_scrape_cache_forces_refetch() {
    let (app, transport) = app_with(MockTransport::new().otherwise(MockReply::ok(
        cardhobby_payload("Card", 1.0, 973, "2025-01-03 20:00:00"),
    )));
    let scrape = || json!({ "url": cardhobby_url("9") });

    send(&app, Method::POST, "/api/scrape", Some(scrape())).await;
    send(&app, Method::POST, "/api/scrape", Some(scrape())).await;
    assert_eq!(transport.call_count(), 1);

    let (status, body) = send(&app, Method::DELETE, "/api/scrape/cache", Some(scrape())).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "cleared": 1 }));

    send(&app, Method::POST, "/api/scrape", Some(scrape())).await;
    assert_eq!(transport.call_count(), 2);

    let (_, body) = send(&app, Method::DELETE, "/api/scrape/cache", None).await;
    assert_eq!(body, json!({ "cleared": 1 }));
}

#[tokio::test]
async fn sellers_and_exchange_rate() {
    let app = app();

    let (status, sellers) = send(&app, Method::GET, "/api/sellers", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(sellers
        .as_array()
        .unwrap()
        .iter()
        .any(|s| s["name"] == "Trac"));

    let (status, rate) = send(&app, Method::GET, "/api/exchange-rate", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        rate,
        json!({ "base": "CAD", "quote": "USD", "rate": FALLBACK_USD_PER_CAD })
    );
}
